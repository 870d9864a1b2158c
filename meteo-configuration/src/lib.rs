#![doc = include_str!("../README.md")]

pub mod cors;
pub mod env;
pub mod error;
pub mod server;
pub mod upstream;

pub use cors::CorsConfig;
pub use error::ConfigError;
pub use server::{DEFAULT_LISTEN, ServerConfig};
pub use upstream::UpstreamConfig;
