/// Unified error types for the gallery server
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the gallery
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Container provisioning errors
    #[error("Provisioning error: {0}")]
    Provisioning(String),

    /// Object storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// User-visible error payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    pub trace: String,
}

/// Convert GalleryError to an HTTP response
///
/// Every failure is converted exactly once, here, into a `{message, trace}`
/// payload. Configuration, provisioning, and transient storage errors all
/// render the same way.
impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        let status = match self {
            GalleryError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorPayload {
            message: self.to_string(),
            trace: format!("{:?}", self),
        });

        (status, body).into_response()
    }
}

/// Result type alias for gallery operations
pub type GalleryResult<T> = Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_fields_populated() {
        let err = GalleryError::Storage("list failed: connection reset".to_string());

        let payload = ErrorPayload {
            message: err.to_string(),
            trace: format!("{:?}", err),
        };

        assert!(!payload.message.is_empty());
        assert!(payload.message.contains("connection reset"));
        assert!(payload.trace.contains("Storage"));
    }

    #[test]
    fn test_payload_round_trips_as_json() {
        let payload = ErrorPayload {
            message: "Storage error: boom".to_string(),
            trace: "Storage(\"boom\")".to_string(),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["message"], "Storage error: boom");
        assert!(json["trace"].as_str().unwrap().contains("boom"));
    }
}
