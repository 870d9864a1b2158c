use std::fmt;
use std::time::Duration;

use meteo_reqwest::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_UNITS, OpenWeatherMapClient,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Weather provider settings.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Provider root, e.g. `http://api.openweathermap.org`.
    pub base_url: String,
    /// Provider API key. Usually supplied through the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-request timeout (e.g. "5s", "1500ms").
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Unit system requested from the provider.
    pub units: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            units: DEFAULT_UNITS.to_string(),
        }
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .field("units", &self.units)
            .finish()
    }
}

impl UpstreamConfig {
    /// The API key, if one is configured and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key().is_none() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Builds the provider client, optionally sharing an existing reqwest client.
    pub fn into_client(
        self,
        http: Option<meteo_reqwest::reqwest::Client>,
    ) -> Result<OpenWeatherMapClient, ConfigError> {
        let api_key = self.api_key().ok_or(ConfigError::MissingApiKey)?.to_string();

        let mut builder = OpenWeatherMapClient::builder()
            .api_key(api_key)
            .base_url(self.base_url)
            .units(self.units)
            .timeout(self.timeout);

        if let Some(http) = http {
            builder = builder.client(http);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = UpstreamConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_key(), None);
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn debug_hides_api_key() {
        let config = UpstreamConfig {
            api_key: Some("top-secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret"), "{rendered}");
    }

    #[test]
    fn into_client_uses_configured_endpoint() {
        let config = UpstreamConfig {
            base_url: "http://localhost:9999/".to_string(),
            api_key: Some("k".to_string()),
            timeout: Duration::from_millis(1500),
            ..Default::default()
        };
        let client = config.into_client(None).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://localhost:9999/data/2.5/weather"
        );
        assert_eq!(client.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn into_client_accepts_shared_http_client() {
        let config = UpstreamConfig {
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let http = meteo_reqwest::reqwest::Client::new();
        let client = config.into_client(Some(http)).unwrap();
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(
            client.endpoint().as_str(),
            "http://api.openweathermap.org/data/2.5/weather"
        );
    }

    #[test]
    fn into_client_rejects_bad_url() {
        let config = UpstreamConfig {
            base_url: "::::".to_string(),
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.into_client(None),
            Err(ConfigError::Client(_))
        ));
    }
}
