//! Error types for the libhub client.
//!
//! Every failure a request can hit is represented by [`Error`]: transport
//! failures, non-success statuses, cache backend failures and malformed
//! pagination metadata.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for libhub operations.
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP status used by servers to answer a conditional request whose
/// validator still matches.
pub const NOT_MODIFIED: u16 = 304;

/// The main error type for all libhub operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a status was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with a non-success status.
    ///
    /// A `304 Not Modified` is reported this way by transports; the
    /// cache-aware fetcher resolves it before callers ever see it.
    #[error("API error: status={status}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// The cache backend failed to read or write an entry
    #[error("Cache error: {0}")]
    Cache(String),

    /// The server answered 304 but the cache no longer holds the entry
    #[error("Stale cache: server returned 304 but no entry exists for {key}")]
    StaleCache {
        /// Cache key that was expected to be present
        key: String,
    },

    /// The `Link` header could not be parsed
    #[error("Pagination error: {0}")]
    Pagination(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the HTTP status code carried by this error, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use libhub::Error;
    ///
    /// let err = Error::from_api_response(404, serde_json::json!({"message": "Not Found"}));
    /// assert_eq!(err.status(), Some(404));
    /// ```
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this error is a `304 Not Modified` answer.
    pub fn is_not_modified(&self) -> bool {
        self.status() == Some(NOT_MODIFIED)
    }

    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried by the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::Timeout => true,
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => (400..500).contains(status),
            Error::InvalidInput(_) | Error::Config(_) | Error::UrlParse(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an API error from a response status and body.
    pub fn from_api_response(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| default_message(status).to_string());

        Error::Api {
            status,
            message,
            body,
        }
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        NOT_MODIFIED => "Not Modified",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Unknown API error",
    }
}
