use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cors::CorsConfig;
use crate::env;
use crate::error::ConfigError;
use crate::upstream::UpstreamConfig;

/// Address the service binds when nothing else is configured.
pub const DEFAULT_LISTEN: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));

/// Top-level service configuration.
///
/// Every section is optional in YAML; missing fields take their defaults.
///
/// ```
/// use meteo_configuration::ServerConfig;
///
/// let config = ServerConfig::from_yaml("upstream:\n  api_key: abc\n").unwrap();
/// assert_eq!(config.upstream.api_key(), Some("abc"));
/// assert_eq!(config.listen.port(), 8080);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub upstream: UpstreamConfig,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN,
            upstream: UpstreamConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parses a YAML document without consulting the environment.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(yaml).map_err(|error| ConfigError::Parse(error.to_string()))
    }

    /// Loads the file at `path` (or the defaults) and applies process
    /// environment overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, env::process_env)
    }

    /// Like [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_yaml(&raw)?
            }
            None => Self::default(),
        };
        env::apply(&mut config, lookup)?;
        tracing::debug!(
            path = ?path,
            listen = %config.listen,
            base_url = %config.upstream.base_url,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Checks everything that can be checked before the server starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upstream.validate()?;
        self.cors.origins()?;
        Ok(())
    }
}
