#![doc = include_str!("../README.md")]

mod client;
mod error;

pub use client::{
    ApiKey, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_UNITS, NotSet, OpenWeatherMapClient,
    OpenWeatherMapClientBuilder, WEATHER_PATH,
};
pub use error::BuildError;

/// Re-export of the reqwest version this crate is built against.
pub use reqwest;

// Re-export core types for convenience
pub use meteo_core::{TransportError, WeatherQuery, WeatherUpstream};
