//! Arrivals feed error types.

use crate::domain::TimeError;

/// Errors that abort a whole refresh.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status code
    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON shape
    #[error("malformed feed: {message}")]
    Malformed { message: String },

    /// Feed reported an error in its own payload
    #[error("feed error {code}: {message}")]
    Api { code: String, message: String },

    /// Client could not be built from its configuration
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl FeedError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        FeedError::Malformed {
            message: message.into(),
        }
    }
}

/// Errors scoped to one feed record. The record is skipped; the rest of the
/// feed is still used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A required field is absent or empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Record is not an object with string fields
    #[error("malformed record: {0}")]
    Malformed(String),

    /// Arrival time could not be parsed or resolved
    #[error("bad arrival time {value:?}: {source}")]
    InvalidTime {
        value: String,
        #[source]
        source: TimeError,
    },

    /// Route code is not a known line
    #[error("unknown route code: {0}")]
    UnknownRoute(String),

    /// Record does not belong to any direction of the station
    #[error("no direction for {route} to {destination:?}")]
    Unrouted { route: String, destination: String },
}

impl RecordError {
    /// Whether this is an ordinary record the station simply does not show,
    /// as opposed to a broken one.
    pub fn is_unrouted(&self) -> bool {
        matches!(
            self,
            RecordError::UnknownRoute(_) | RecordError::Unrouted { .. }
        )
    }
}
