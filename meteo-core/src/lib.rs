#![warn(missing_docs)]
//! # meteo-core
//!
//! Core types for the meteo weather proxy.
//!
//! This crate is **transport-agnostic**: it knows nothing about the HTTP
//! server or about the HTTP client used to reach the weather provider. It
//! defines the pieces both sides agree on:
//!
//! - **Validate** the caller's city ([`WeatherQuery`])
//! - **Fetch** a raw provider body ([`WeatherUpstream`])
//! - **Interpret** that body ([`interpret`]) into a [`WeatherResult`]
//!   or an [`UpstreamError`]
//!
//! [`lookup`] glues the last two together and is what the HTTP endpoint calls.

pub mod error;
pub mod interpret;
pub mod query;
pub mod upstream;
pub mod weather;

pub use error::{TransportError, UpstreamError};
pub use interpret::{PROVIDER_OK, interpret};
pub use query::{ValidationError, WeatherQuery};
pub use upstream::{WeatherUpstream, lookup};
pub use weather::WeatherResult;
