use std::path::PathBuf;

use meteo_reqwest::BuildError;
use thiserror::Error;

/// Errors raised while loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`ServerConfig`](crate::ServerConfig).
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// No provider API key in the file nor in `OPENWEATHERMAP_API_KEY`.
    #[error("missing upstream api key: set upstream.api_key or OPENWEATHERMAP_API_KEY")]
    MissingApiKey,

    /// An upstream timeout of zero would fail every request.
    #[error("upstream timeout must be greater than zero")]
    ZeroTimeout,

    /// A CORS origin is not a valid header value or not an http(s) origin.
    #[error("invalid CORS origin {0:?}")]
    InvalidOrigin(String),

    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value for {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    /// The upstream client could not be built from this configuration.
    #[error(transparent)]
    Client(#[from] BuildError),
}
