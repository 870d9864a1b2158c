#![doc = include_str!("../README.md")]

mod app;
pub mod handlers;
mod state;

pub use app::{cors_layer, router};
pub use handlers::{HEALTH_MESSAGE, WeatherParams};
pub use state::AppState;
