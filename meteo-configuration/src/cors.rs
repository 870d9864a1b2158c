use http::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Origin of the reference web frontend during development.
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Cross-origin settings for the public endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Exact origins allowed to call `/weather` and `/health`.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_FRONTEND_ORIGIN.to_string()],
        }
    }
}

impl CorsConfig {
    /// Parses the configured origins into header values.
    pub fn origins(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.allowed_origins
            .iter()
            .map(|origin| parse_origin(origin))
            .collect()
    }
}

fn parse_origin(origin: &str) -> Result<HeaderValue, ConfigError> {
    let trimmed = origin.trim().trim_end_matches('/');
    let is_http = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    if !is_http || trimmed.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidOrigin(origin.to_string()));
    }
    HeaderValue::from_str(trimmed).map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
}
