//! Error codes shared by every error response.
//!
//! Each code has a string form for clients (e.g. `"VALIDATION_ERROR"`), an
//! integer for log correlation (e.g. `1001`) and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1099)
    /// Request validation failed
    ValidationError,
    /// Request body is not valid JSON for the endpoint
    JsonExtraction,
    /// Requested resource was not found
    NotFound,
    /// Request conflicts with existing state
    Conflict,
    /// The resource is busy with another request
    Busy,

    // Server errors (1100-1199)
    /// Unexpected internal failure
    InternalError,
    /// An upstream service (embeddings, vector store) failed
    UpstreamError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::JsonExtraction => "JSON_EXTRACTION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::Busy => "BUSY",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
        }
    }

    pub const fn code(&self) -> i32 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::JsonExtraction => 1003,
            ErrorCode::NotFound => 1004,
            ErrorCode::Conflict => 1008,
            ErrorCode::Busy => 1009,
            ErrorCode::InternalError => 1100,
            ErrorCode::UpstreamError => 1102,
        }
    }

    pub const fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Request validation failed",
            ErrorCode::JsonExtraction => "Invalid JSON request body",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::Conflict => "Resource already exists",
            ErrorCode::Busy => "Another change is still in progress",
            ErrorCode::InternalError => "An internal server error occurred",
            ErrorCode::UpstreamError => "An upstream service failed",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
