//! Error handling module for Easel
//!
//! This module defines the error types used throughout the application,
//! providing a unified error handling strategy with proper error context
//! and HTTP response mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for Easel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Easel
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested room token is not in the configured valid set
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// Validation errors for incoming payloads
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A transform exceeded its execution budget
    #[error("Transform timed out: {0}")]
    TransformTimeout(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a room-not-found error
    pub fn room_not_found<S: Into<String>>(room: S) -> Self {
        Error::RoomNotFound(room.into())
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a transform timeout error
    pub fn transform_timeout<S: Into<String>>(name: S) -> Self {
        Error::TransformTimeout(name.into())
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::RoomNotFound(_) => StatusCode::NOT_FOUND,
            Error::TransformTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::Config(_) | Error::Serialization(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

/// Implement IntoResponse for automatic error responses in Axum
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Create error response body
        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": error_type(&self),
                "status": status.as_u16(),
            }
        }));

        // Log error based on severity
        match status {
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::GATEWAY_TIMEOUT => {
                tracing::error!(error = ?self, "Internal server error");
            },
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                tracing::warn!(error = ?self, "Client error");
            },
            _ => {
                tracing::info!(error = ?self, "Request error");
            },
        }

        (status, body).into_response()
    }
}

/// Get a string representation of the error type
fn error_type(error: &Error) -> &'static str {
    match error {
        Error::Config(_) => "configuration_error",
        Error::RoomNotFound(_) => "room_not_found",
        Error::Validation(_) => "validation_error",
        Error::Serialization(_) => "serialization_error",
        Error::Io(_) => "io_error",
        Error::TransformTimeout(_) => "transform_timeout",
        Error::Internal(_) => "internal_error",
    }
}

/// Convert from anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

/// Convert from envconfig::Error to our Error type
impl From<envconfig::Error> for Error {
    fn from(err: envconfig::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            Error::validation("test").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::room_not_found("room_1").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::transform_timeout("blur").status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            Error::internal("test").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_type_strings() {
        assert_eq!(error_type(&Error::room_not_found("r")), "room_not_found");
        assert_eq!(error_type(&Error::validation("v")), "validation_error");
        assert_eq!(
            error_type(&Error::transform_timeout("blur")),
            "transform_timeout"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::room_not_found("room_99");
        assert_eq!(err.to_string(), "Room not found: room_99");

        let err = Error::transform_timeout("blur");
        assert!(err.to_string().contains("blur"));
    }
}
