//! Fetch error types.

use std::fmt;

/// Errors from resolving a search query into a raw payload.
#[derive(Debug)]
pub enum FetchError {
    /// HTTP request failed (network error, connection reset, etc.)
    Http(reqwest::Error),

    /// The request did not complete within its deadline
    Timeout,

    /// Site returned an error status code
    Status { status: u16, message: String },

    /// Site throttled the request
    RateLimited,

    /// Response contained no search data event
    NoData,

    /// Search data event was not valid JSON
    Json {
        message: String,
        body: Option<String>,
    },

    /// Query could not be turned into a request URL
    InvalidUrl(String),

    /// No recorded payload for the query
    NotFound(String),

    /// Recorded payloads could not be loaded
    Io(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "HTTP error: {e}"),
            FetchError::Timeout => write!(f, "request timed out"),
            FetchError::Status { status, message } => {
                write!(f, "site error {status}: {message}")
            }
            FetchError::RateLimited => write!(f, "rate limited by site"),
            FetchError::NoData => write!(f, "response carried no search data"),
            FetchError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            FetchError::InvalidUrl(msg) => write!(f, "invalid request URL: {msg}"),
            FetchError::NotFound(key) => write!(f, "no recorded payload for {key}"),
            FetchError::Io(msg) => write!(f, "failed to load payloads: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Http(err)
        }
    }
}
