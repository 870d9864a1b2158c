//! Errors raised while constructing an [`OpenWeatherMapClient`](crate::OpenWeatherMapClient).

use thiserror::Error;

/// Error type for [`OpenWeatherMapClientBuilder::build`](crate::OpenWeatherMapClientBuilder::build).
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configured base URL cannot be parsed or cannot carry a path.
    #[error("invalid upstream base url {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The underlying reqwest client could not be created (TLS backend init).
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
