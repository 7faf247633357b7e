//! Error types used throughout the client
//!
//! Provides the classified error taxonomy for API operations together with
//! category metadata callers can use to drive their own retry decisions.

use thiserror::Error;

/// Categories of client errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityPermitErrorCategory {
    /// Authentication errors (login failure, or 401/403 after the retry)
    Authentication,
    /// Rate limiting errors (429) - retry is the caller's decision
    RateLimit,
    /// Response decoding errors (malformed JSON, unexpected payload shape)
    Parse,
    /// Network/connection errors
    Network,
    /// Any other non-2xx HTTP status, surfaced unmodified
    Http,
    /// Configuration errors - non-retryable
    Config,
}

/// Main error type for CityPermit operations
#[derive(Error, Debug)]
pub enum CityPermitError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limit exceeded")]
    RateLimit {
        /// Parsed `Retry-After` header, in seconds; `None` when the header
        /// was absent or not an integer.
        retry_after: Option<u64>,
    },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl CityPermitError {
    /// Get the error category for this error
    pub fn category(&self) -> CityPermitErrorCategory {
        match self {
            Self::Auth(_) => CityPermitErrorCategory::Authentication,
            Self::RateLimit { .. } => CityPermitErrorCategory::RateLimit,
            Self::Parse(_) => CityPermitErrorCategory::Parse,
            Self::Network(_) => CityPermitErrorCategory::Network,
            Self::Http { .. } => CityPermitErrorCategory::Http,
            Self::Config(_) => CityPermitErrorCategory::Config,
        }
    }

    /// Server-suggested delay before retrying, if the service sent one
    ///
    /// Only `RateLimit` errors carry a hint; every other category returns
    /// `None`.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for CityPermit operations
pub type Result<T> = std::result::Result<T, CityPermitError>;
