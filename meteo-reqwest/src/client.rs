//! OpenWeatherMap client implementing [`WeatherUpstream`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use meteo_core::{TransportError, WeatherQuery, WeatherUpstream};
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::error::BuildError;

/// Default provider root.
pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org";
/// Path of the current-weather-by-name endpoint, relative to the base URL.
pub const WEATHER_PATH: &str = "data/2.5/weather";
/// Unit system requested from the provider; `metric` yields Celsius.
pub const DEFAULT_UNITS: &str = "metric";
/// Upper bound on a single upstream exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Provider API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for building the request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Upstream client for the OpenWeatherMap current-weather API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is reference counted and
/// shares its connection pool between clones.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use meteo_reqwest::OpenWeatherMapClient;
///
/// let client = OpenWeatherMapClient::builder()
///     .api_key("dummy")
///     .timeout(Duration::from_secs(3))
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     client.endpoint().as_str(),
///     "http://api.openweathermap.org/data/2.5/weather"
/// );
/// ```
#[derive(Clone)]
pub struct OpenWeatherMapClient {
    http: Client,
    endpoint: Url,
    api_key: ApiKey,
    units: String,
    timeout: Duration,
}

impl OpenWeatherMapClient {
    /// Creates a new [`OpenWeatherMapClientBuilder`].
    pub fn builder() -> OpenWeatherMapClientBuilder<NotSet> {
        OpenWeatherMapClientBuilder::new()
    }

    /// Fully resolved current-weather endpoint (without query string).
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Timeout applied to every upstream request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the request URL for `city`, query string included.
    ///
    /// The city is percent-encoded, so names like "São Paulo" or "St. John's"
    /// reach the provider intact.
    pub fn request_url(&self, city: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", city)
            .append_pair("appid", self.api_key.expose())
            .append_pair("units", &self.units);
        url
    }
}

impl fmt::Debug for OpenWeatherMapClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherMapClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key)
            .field("units", &self.units)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl WeatherUpstream for OpenWeatherMapClient {
    async fn fetch_raw(&self, query: &WeatherQuery) -> Result<String, TransportError> {
        let city = query.city();
        debug!(city, endpoint = %self.endpoint, "requesting current weather");

        let response = self
            .http
            .get(self.request_url(city))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|error| transport_error(city, error))?;

        // The provider reports lookup failures both in the HTTP status and in
        // the body's `cod`; only the body is authoritative here.
        let status = response.status();
        if !status.is_success() {
            debug!(city, %status, "weather provider answered with non-success status");
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| transport_error(city, error))?;

        // Invalid UTF-8 is a body failure, never a lossy decode.
        std::str::from_utf8(&body).map(str::to_owned).map_err(|error| {
            warn!(city, %error, "weather provider body is not valid UTF-8");
            TransportError::Body(Box::new(error))
        })
    }
}

/// Classifies a reqwest failure. The URL (which carries the API key) is
/// stripped before the error is logged or stored.
fn transport_error(city: &str, error: reqwest::Error) -> TransportError {
    let error = error.without_url();
    warn!(city, error = %error, "weather provider request failed");

    if error.is_timeout() {
        TransportError::Timeout(Box::new(error))
    } else if error.is_connect() {
        TransportError::Connect(Box::new(error))
    } else if error.is_body() || error.is_decode() {
        TransportError::Body(Box::new(error))
    } else {
        TransportError::Request(Box::new(error))
    }
}

/// Marker type for unset builder fields.
///
/// When you see `NotSet` in a compiler error, it means [`OpenWeatherMapClientBuilder::api_key`]
/// has not been called yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotSet;

/// Builder for [`OpenWeatherMapClient`].
///
/// The API key is mandatory and tracked in the type: `build()` only exists
/// once [`api_key`](Self::api_key) has been called.
pub struct OpenWeatherMapClientBuilder<K> {
    api_key: K,
    base_url: String,
    units: String,
    timeout: Duration,
    client: Option<Client>,
}

impl OpenWeatherMapClientBuilder<NotSet> {
    /// Creates a builder with the public provider URL, metric units and
    /// the default timeout.
    pub fn new() -> Self {
        Self {
            api_key: NotSet,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: None,
        }
    }
}

impl Default for OpenWeatherMapClientBuilder<NotSet> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> OpenWeatherMapClientBuilder<K> {
    /// Sets the provider API key.
    pub fn api_key(self, api_key: impl Into<ApiKey>) -> OpenWeatherMapClientBuilder<ApiKey> {
        OpenWeatherMapClientBuilder {
            api_key: api_key.into(),
            base_url: self.base_url,
            units: self.units,
            timeout: self.timeout,
            client: self.client,
        }
    }

    /// Overrides the provider root, e.g. to point at a mock server.
    pub fn base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    /// Overrides the unit system (`metric`, `imperial`, `standard`).
    pub fn units(self, units: impl Into<String>) -> Self {
        Self {
            units: units.into(),
            ..self
        }
    }

    /// Sets the per-request timeout.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Reuses an existing reqwest client (and its connection pool).
    pub fn client(self, client: Client) -> Self {
        Self {
            client: Some(client),
            ..self
        }
    }
}

impl OpenWeatherMapClientBuilder<ApiKey> {
    /// Builds the client.
    pub fn build(self) -> Result<OpenWeatherMapClient, BuildError> {
        let endpoint = weather_endpoint(&self.base_url)?;
        let http = match self.client {
            Some(client) => client,
            None => Client::builder().build()?,
        };

        Ok(OpenWeatherMapClient {
            http,
            endpoint,
            api_key: self.api_key,
            units: self.units,
            timeout: self.timeout,
        })
    }
}

fn weather_endpoint(base_url: &str) -> Result<Url, BuildError> {
    let invalid = |reason: String| BuildError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    // A trailing slash makes `join` append instead of replacing the last segment.
    let normalized = format!("{}/", base_url.trim_end_matches('/'));
    let base = Url::parse(&normalized).map_err(|error| invalid(error.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("url cannot carry a path".to_string()));
    }
    base.join(WEATHER_PATH)
        .map_err(|error| invalid(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(base_url: &str) -> OpenWeatherMapClient {
        OpenWeatherMapClient::builder()
            .api_key("secret-key")
            .base_url(base_url)
            .build()
            .unwrap()
    }

    #[test]
    fn default_endpoint_points_at_provider() {
        let client = OpenWeatherMapClient::builder()
            .api_key("k")
            .build()
            .unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://api.openweathermap.org/data/2.5/weather"
        );
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn request_url_carries_city_key_and_units() {
        let url = client("http://localhost:1234").request_url("London");
        assert_eq!(
            url.as_str(),
            "http://localhost:1234/data/2.5/weather?q=London&appid=secret-key&units=metric"
        );
    }

    #[test]
    fn request_url_encodes_city() {
        let url = client("http://localhost:1234").request_url("São Paulo");
        let q = url
            .query_pairs()
            .find(|(name, _)| name == "q")
            .map(|(_, value)| value.into_owned());
        assert_eq!(q.as_deref(), Some("São Paulo"));
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn base_url_with_prefix_and_trailing_slash() {
        let client = client("http://proxy.local/owm/");
        assert_eq!(
            client.endpoint().as_str(),
            "http://proxy.local/owm/data/2.5/weather"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = OpenWeatherMapClient::builder()
            .api_key("k")
            .base_url("not a url")
            .build();
        assert!(matches!(result, Err(BuildError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let rendered = format!("{:?}", client("http://localhost:1234"));
        assert!(!rendered.contains("secret-key"), "{rendered}");
        assert!(rendered.contains("ApiKey(***)"));
    }

    #[test]
    fn builder_overrides_units_and_timeout() {
        let client = OpenWeatherMapClient::builder()
            .timeout(Duration::from_millis(250))
            .units("imperial")
            .api_key("k")
            .base_url("http://localhost:1")
            .build()
            .unwrap();
        assert_eq!(client.timeout(), Duration::from_millis(250));
        assert!(client.request_url("Ames").as_str().ends_with("units=imperial"));
    }
}
