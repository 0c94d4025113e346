//! Error codes attached to error logs.
//!
//! Clients only see the message; the integer code is emitted as the
//! `error_code` field of every error log so dashboards can group failures.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::ValidationError.code(), 1001);
//! assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
//! ```

use super::messages;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    ValidationError,
    InvalidObjectId,
    JsonExtraction,
    NotFound,
    InternalError,
    Unauthorized,
    BadRequest,
    RouteNotFound,
    MethodNotAllowed,
    QueryExtraction,

    // Database errors (2000-2999)
    DatabaseValidation,
    DuplicateKey,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidObjectId => "INVALID_OBJECT_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::BadRequest => "BAD_REQUEST",
            Self::RouteNotFound => "ROUTE_NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::QueryExtraction => "QUERY_EXTRACTION",
            Self::DatabaseValidation => "DATABASE_VALIDATION",
            Self::DuplicateKey => "DUPLICATE_KEY",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Integer code for logs: 1xxx client errors, 2xxx database errors.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidObjectId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Unauthorized => 1006,
            Self::BadRequest => 1007,
            Self::RouteNotFound => 1008,
            Self::MethodNotAllowed => 1009,
            Self::QueryExtraction => 1010,

            Self::DatabaseValidation => 2001,
            Self::DuplicateKey => 2002,
            Self::DatabaseError => 2003,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => messages::VALIDATION_FAILED,
            Self::InvalidObjectId => messages::INVALID_ID,
            Self::JsonExtraction => messages::INVALID_JSON,
            Self::NotFound | Self::RouteNotFound => messages::NOT_FOUND_RESOURCE,
            Self::InternalError | Self::DatabaseError => messages::INTERNAL_ERROR,
            Self::Unauthorized => messages::API_KEY_REQUIRED,
            Self::BadRequest => "Bad request",
            Self::MethodNotAllowed => messages::METHOD_NOT_ALLOWED,
            Self::QueryExtraction => messages::INVALID_QUERY,
            Self::DatabaseValidation => messages::DB_VALIDATION,
            Self::DuplicateKey => messages::DUPLICATE_KEY,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::InvalidObjectId.as_str(), "INVALID_OBJECT_ID");
        assert_eq!(ErrorCode::DuplicateKey.to_string(), "DUPLICATE_KEY");
    }

    #[test]
    fn test_error_code_ranges() {
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::MethodNotAllowed.code(), 1009);
        assert_eq!(ErrorCode::DatabaseError.code(), 2003);
    }

    #[test]
    fn test_error_code_messages() {
        assert_eq!(ErrorCode::InvalidObjectId.default_message(), "Invalid ID format");
        assert_eq!(
            ErrorCode::DuplicateKey.default_message(),
            "Duplicate field value entered"
        );
        assert_eq!(
            ErrorCode::DatabaseError.default_message(),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::DatabaseValidation).unwrap();
        assert_eq!(json, "\"DATABASE_VALIDATION\"");
        let code: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, ErrorCode::DatabaseValidation);
    }
}
