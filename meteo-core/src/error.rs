//! Error types for a single weather lookup.
//!
//! Every variant is terminal for the request that produced it. The HTTP
//! endpoint collapses all of them into the same caller-visible response, so
//! the distinctions here exist for logging and for tests.

use thiserror::Error;

/// Boxed source error carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to complete the HTTP exchange with the weather provider.
///
/// Produced by [`WeatherUpstream`](crate::WeatherUpstream) implementations.
/// The underlying client error is kept as the source so it shows up in logs.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The provider did not answer within the configured timeout.
    #[error("upstream request timed out")]
    Timeout(#[source] BoxError),

    /// The provider could not be reached (DNS, refused connection, TLS).
    #[error("failed to connect to upstream")]
    Connect(#[source] BoxError),

    /// The response body could not be read or decoded as text.
    #[error("failed to read upstream response body")]
    Body(#[source] BoxError),

    /// Any other failure raised while building or sending the request.
    #[error("upstream request failed")]
    Request(#[source] BoxError),
}

/// Outcome of a lookup that did not yield a [`WeatherResult`](crate::WeatherResult).
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network-level failure talking to the provider.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The provider answered with an empty body.
    #[error("empty response from weather provider")]
    EmptyResponse,

    /// The body is not a JSON object.
    #[error("malformed response from weather provider: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The provider embedded a non-success `cod` in its reply,
    /// typically because the city does not exist.
    #[error(
        "weather provider returned cod {code}: {}",
        .message.as_deref().unwrap_or("no message")
    )]
    NotFound {
        /// Raw `cod` value as sent by the provider.
        code: String,
        /// Provider's `message` field, when present.
        message: Option<String>,
    },
}

impl UpstreamError {
    /// Short, stable label for the error kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport(_) => "transport",
            UpstreamError::EmptyResponse => "empty_response",
            UpstreamError::Malformed(_) => "malformed",
            UpstreamError::NotFound { .. } => "not_found",
        }
    }
}
