//! Environment variable overrides.
//!
//! Lookups go through a closure so tests can supply a fixed environment
//! instead of mutating the process one.

use std::net::SocketAddr;

use humantime_serde::re::humantime;

use crate::error::ConfigError;
use crate::server::ServerConfig;

pub const API_KEY: &str = "OPENWEATHERMAP_API_KEY";
pub const LISTEN: &str = "METEO_LISTEN";
pub const UPSTREAM_URL: &str = "METEO_UPSTREAM_URL";
pub const UPSTREAM_TIMEOUT: &str = "METEO_UPSTREAM_TIMEOUT";
pub const CORS_ORIGINS: &str = "METEO_CORS_ORIGINS";

/// Reads a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Applies every override found through `lookup` to `config`.
///
/// Empty values are ignored so that `FOO=` in a dotenv file does not wipe
/// a value set in the YAML file.
pub fn apply<F>(config: &mut ServerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(key) = get(API_KEY) {
        config.upstream.api_key = Some(key);
    }

    if let Some(listen) = get(LISTEN) {
        config.listen = listen
            .trim()
            .parse::<SocketAddr>()
            .map_err(|error| ConfigError::InvalidEnv {
                name: LISTEN,
                reason: error.to_string(),
            })?;
    }

    if let Some(url) = get(UPSTREAM_URL) {
        config.upstream.base_url = url.trim().to_string();
    }

    if let Some(timeout) = get(UPSTREAM_TIMEOUT) {
        config.upstream.timeout =
            humantime::parse_duration(timeout.trim()).map_err(|error| ConfigError::InvalidEnv {
                name: UPSTREAM_TIMEOUT,
                reason: error.to_string(),
            })?;
    }

    if let Some(origins) = get(CORS_ORIGINS) {
        config.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
    }

    Ok(())
}
