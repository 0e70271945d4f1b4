//! Error types for OMDB search aggregation.

use thiserror::Error;

/// Boxed cause for transport-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure talking to the remote movie database.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: BoxError,
    },

    /// The remote answered with a non-success status code.
    #[error("{endpoint} returned error status: {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    /// The response body could not be decoded.
    #[error("failed to parse response from {endpoint}: {source}")]
    Malformed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The remote reported an application-level error (`"Response": "False"`).
    #[error("remote rejected the request: {0}")]
    Rejected(String),
}

impl RemoteError {
    /// Wrap any transport error for the given endpoint.
    pub fn transport(endpoint: impl Into<String>, source: impl Into<BoxError>) -> Self {
        RemoteError::Transport {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }
}

/// Failure of the cache backend itself.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Error returned by [`MovieSearchAggregator::search`](crate::MovieSearchAggregator::search).
#[derive(Error, Debug)]
pub enum SearchError {
    /// Caller supplied an unusable argument (e.g. an empty title).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote movie database failed during paging or enrichment.
    #[error("remote service failure: {0}")]
    RemoteService(#[from] RemoteError),
}

impl SearchError {
    /// Whether this error was caused by the caller rather than the remote service.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SearchError::InvalidArgument(_))
    }
}

/// Result alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
