use std::fmt;
use std::time::Duration;

use anyhow::{Error, anyhow};
use axum_test::{TestResponse, TestServer};
use cucumber::World;
use cucumber::gherkin::Step;
use http::{HeaderValue, header};
use meteo_configuration::CorsConfig;
use meteo_reqwest::OpenWeatherMapClient;
use meteo_server::{AppState, cors_layer, router};
use wiremock::MockServer;

/// API key every scenario sends to the mock provider.
pub const TEST_API_KEY: &str = "bdd-test-key";

/// Where the proxy sends its provider calls in a scenario.
#[derive(Default)]
pub enum Provider {
    /// Not set up yet; a mock server is started on first use.
    #[default]
    Pending,
    Mock(MockServer),
    /// An address nothing listens on.
    Unreachable(String),
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Pending => f.write_str("Pending"),
            Provider::Mock(server) => f.debug_tuple("Mock").field(&server.uri()).finish(),
            Provider::Unreachable(url) => f.debug_tuple("Unreachable").field(url).finish(),
        }
    }
}

#[derive(World)]
pub struct MeteoWorld {
    pub provider: Provider,
    pub timeout: Duration,
    pub response: Option<TestResponse>,
}

impl Default for MeteoWorld {
    fn default() -> Self {
        Self {
            provider: Provider::Pending,
            timeout: Duration::from_secs(2),
            response: None,
        }
    }
}

impl fmt::Debug for MeteoWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeteoWorld")
            .field("provider", &self.provider)
            .field("timeout", &self.timeout)
            .field("response", &self.response.as_ref().map(|r| r.status_code()))
            .finish()
    }
}

impl MeteoWorld {
    /// The mock provider, started on first use.
    pub async fn mock(&mut self) -> Result<&MockServer, Error> {
        if matches!(self.provider, Provider::Pending) {
            self.provider = Provider::Mock(MockServer::start().await);
        }
        match &self.provider {
            Provider::Mock(server) => Ok(server),
            other => Err(anyhow!("provider is not a mock server: {other:?}")),
        }
    }

    async fn base_url(&mut self) -> Result<String, Error> {
        if let Provider::Unreachable(url) = &self.provider {
            return Ok(url.clone());
        }
        Ok(self.mock().await?.uri())
    }

    /// Serves `path` through the full application stack.
    pub async fn execute_request(
        &mut self,
        path: &str,
        origin: Option<&str>,
    ) -> Result<(), Error> {
        let client = OpenWeatherMapClient::builder()
            .api_key(TEST_API_KEY)
            .base_url(self.base_url().await?)
            .timeout(self.timeout)
            .build()?;
        let app = router(AppState::new(client)).layer(cors_layer(&CorsConfig::default())?);
        let server = TestServer::new(app)?;

        let mut request = server.get(path);
        if let Some(origin) = origin {
            request = request.add_header(header::ORIGIN, HeaderValue::from_str(origin)?);
        }
        self.response = Some(request.await);
        Ok(())
    }

    pub fn response(&self) -> Result<&TestResponse, Error> {
        self.response
            .as_ref()
            .ok_or_else(|| anyhow!("no request has been executed"))
    }
}

pub trait StepExt {
    fn docstring_content(&self) -> Option<String>;
}

impl StepExt for Step {
    fn docstring_content(&self) -> Option<String> {
        self.docstring
            .as_deref()
            .map(|docstring| docstring.trim().to_string())
    }
}
