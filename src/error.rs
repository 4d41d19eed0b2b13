//! Error types for DefectDojo API operations.

use thiserror::Error;

/// Errors that can occur while constructing a client or handling local
/// resources.
///
/// HTTP and transport failures never surface here: the dispatcher reports
/// them through [`DojoResponse`](crate::DojoResponse) instead.
#[derive(Debug, Error)]
pub enum DojoError {
    /// Configuration is missing or incomplete.
    #[error("DefectDojo configuration required: {0}")]
    ConfigMissing(String),

    /// HTTP client could not be constructed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("Failed to serialize payload: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Base URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Local file access failed (scan uploads).
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The remote service rejected a creation request; the serialized
    /// error payload is carried verbatim.
    #[error("Object not created: {0}")]
    ObjectNotCreated(String),

    /// The response payload carries no integer `id`.
    #[error("Response payload has no id")]
    MissingId,
}

/// Result type alias for DefectDojo operations.
pub type Result<T> = core::result::Result<T, DojoError>;
