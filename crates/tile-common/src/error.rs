//! Error types for the radar tile proxy.

use thiserror::Error;

/// Result type alias using ProxyError.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Coarse classification of a failure, used for status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is malformed; nothing was sent upstream.
    Client,
    /// The upstream map service failed or returned something unusable.
    Upstream,
    /// No frame timestamp could be resolved for the request.
    CacheMiss,
}

/// Primary error type for proxy operations.
#[derive(Debug, Error)]
pub enum ProxyError {
    // === Client Errors ===
    #[error("invalid tile path")]
    InvalidTilePath,

    #[error("invalid zoom: {0} is outside 0-22")]
    InvalidZoom(i64),

    #[error("invalid area: {0}")]
    InvalidArea(String),

    // === Upstream Errors ===
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("upstream returned status {code}: {body}")]
    UpstreamStatus { code: u16, body: String },

    #[error("failed to decode upstream image: {0}")]
    Decode(String),

    #[error("failed to parse capabilities: {0}")]
    CapabilitiesParse(String),

    #[error("failed to encode tile: {0}")]
    Encode(String),

    // === Timestamp Resolution ===
    #[error("no timestamp available")]
    NoTimestamp,
}

impl ProxyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::InvalidTilePath
            | ProxyError::InvalidZoom(_)
            | ProxyError::InvalidArea(_) => ErrorKind::Client,
            ProxyError::NoTimestamp => ErrorKind::CacheMiss,
            _ => ErrorKind::Upstream,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Client => 400,
            ErrorKind::Upstream | ErrorKind::CacheMiss => 500,
        }
    }
}
