//! Relay result types and error definitions.

use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned to the caller of the relay endpoint.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The `url` query parameter is absent or empty.
    #[error("Missing url parameter")]
    MissingParameter,

    /// Every strategy failed. `details` carries the last failure's message.
    #[error("All proxies failed")]
    AllStrategiesExhausted { details: Option<String> },
}

/// Why a single upstream attempt failed. Recovered by trying the next strategy.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The URL built for this strategy does not parse.
    #[error("invalid upstream url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection, DNS, TLS or body read failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("upstream responded with status {0}")]
    Status(StatusCode),

    /// Attempt exceeded its deadline.
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Upstream body is larger than the relay will buffer.
    #[error("upstream body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// A fully buffered upstream success, ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    /// Upstream `Content-Type`, or the strategy's default.
    pub content_type: String,

    /// `max-age` for a `Cache-Control: public` directive, if any.
    pub cache_max_age: Option<u64>,

    /// Strategy that produced the body, e.g. `pool[2]`.
    pub served_by: String,

    pub body: Bytes,
}
