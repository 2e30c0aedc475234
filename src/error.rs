//! Error types for query building and request dispatch.

use thiserror::Error;

/// Errors that can occur while building or dispatching a resource request.
#[derive(Debug, Error)]
pub enum RqError {
    /// A builder setter was called with malformed input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Serialization was attempted without a resource name.
    #[error("Please set the resource type for your model")]
    MissingResource,

    /// Configuration is missing or incomplete.
    #[error("Configuration required: {0}")]
    ConfigMissing(String),

    /// Configuration value could not be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// API request failed with a non-success status.
    #[error("API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl RqError {
    /// Shorthand for [`RqError::InvalidArgument`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns true for failures that came from the HTTP transport.
    ///
    /// These are surfaced unchanged from the transport; the builder never
    /// interprets or retries them.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ApiError { .. } | Self::HttpError(_) | Self::UrlError(_) | Self::RateLimited { .. }
        )
    }

    /// HTTP status code of the failed response, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => *status_code,
            Self::RateLimited { .. } => Some(429),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for builder operations.
pub type Result<T> = core::result::Result<T, RqError>;
