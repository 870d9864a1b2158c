//! The seam between the HTTP endpoint and the weather provider client.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{TransportError, UpstreamError};
use crate::interpret::interpret;
use crate::query::WeatherQuery;
use crate::weather::WeatherResult;

/// Source of raw current-weather bodies.
///
/// Implementations own everything needed to reach the provider (base URL,
/// API key, timeout); the caller only passes the validated city. The body is
/// returned verbatim, including an empty one: deciding what it means is the
/// job of [`interpret`].
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use meteo_core::{TransportError, WeatherQuery, WeatherUpstream, lookup};
///
/// struct Fixed(&'static str);
///
/// #[async_trait]
/// impl WeatherUpstream for Fixed {
///     async fn fetch_raw(&self, _query: &WeatherQuery) -> Result<String, TransportError> {
///         Ok(self.0.to_string())
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let upstream = Fixed(r#"{"main":{"temp":15.0},"weather":[{"description":"clear sky"}]}"#);
/// let query = WeatherQuery::new("London").unwrap();
/// let result = lookup(&upstream, &query).await.unwrap();
/// assert_eq!(result.description, "clear sky");
/// # }
/// ```
#[async_trait]
pub trait WeatherUpstream: Send + Sync {
    /// Fetches the raw provider body for `query`.
    async fn fetch_raw(&self, query: &WeatherQuery) -> Result<String, TransportError>;
}

#[async_trait]
impl<T> WeatherUpstream for Arc<T>
where
    T: WeatherUpstream + ?Sized,
{
    async fn fetch_raw(&self, query: &WeatherQuery) -> Result<String, TransportError> {
        self.as_ref().fetch_raw(query).await
    }
}

/// Fetches and interprets the current weather for `query`.
pub async fn lookup<U>(upstream: &U, query: &WeatherQuery) -> Result<WeatherResult, UpstreamError>
where
    U: WeatherUpstream + ?Sized,
{
    let raw = upstream.fetch_raw(query).await?;
    interpret(&raw)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Scripted {
        body: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(body: Option<&'static str>) -> Self {
            Self {
                body,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WeatherUpstream for Scripted {
        async fn fetch_raw(&self, _query: &WeatherQuery) -> Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.body {
                Some(body) => Ok(body.to_string()),
                None => Err(TransportError::Connect("connection refused".into())),
            }
        }
    }

    #[tokio::test]
    async fn lookup_interprets_fetched_body() {
        let upstream = Scripted::new(Some(
            r#"{"main":{"temp":15.0},"weather":[{"description":"clear sky"}],"cod":200}"#,
        ));
        let query = WeatherQuery::new("London").unwrap();

        let result = lookup(&upstream, &query).await.unwrap();

        assert_eq!(result, WeatherResult::new(15.0, "clear sky"));
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lookup_propagates_transport_failure() {
        let upstream = Scripted::new(None);
        let query = WeatherQuery::new("London").unwrap();

        let error = lookup(&upstream, &query).await.unwrap_err();

        assert!(matches!(error, UpstreamError::Transport(_)));
    }

    #[tokio::test]
    async fn lookup_through_trait_object() {
        let upstream: Arc<dyn WeatherUpstream> = Arc::new(Scripted::new(Some("")));
        let query = WeatherQuery::new("London").unwrap();

        let error = lookup(&upstream, &query).await.unwrap_err();

        assert!(matches!(error, UpstreamError::EmptyResponse));
    }
}
