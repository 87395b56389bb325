use thiserror::Error;

/// Failure modes of the device position source, mirroring the platform
/// geolocation error codes. All of them are non-fatal: the resolver falls
/// back to IP geolocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("device position unavailable")]
    PositionUnavailable,

    #[error("device position request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Failure modes of the HTTP-based geolocation collaborators (IP lookup and
/// reverse geocoding).
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("malformed response from {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
