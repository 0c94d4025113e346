pub mod codes;
pub mod handlers;
pub mod messages;
pub mod responses;
pub mod stack;

pub use codes::ErrorCode;
pub use stack::{ErrorReport, ExposeStackTraces, error_stack_middleware};

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use thiserror::Error;
use tracing_error::SpanTrace;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "success": false,
///   "message": "Validation failed",
///   "details": ["Product name is required"]
/// }
/// ```
///
/// `stack` is only filled in by [`error_stack_middleware`] when stack traces
/// are exposed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub message: String,
    /// Individual rule violations, when there are any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    /// Debug rendering of the error and the span trace it was raised in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, details: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details,
            stack: None,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<Vec<String>>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// Validation failure with a single message and no rule details.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Validation failure listing every violated rule.
    pub fn validation_with_details(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Some(details),
        }
    }

    fn parts(&self) -> (StatusCode, String, Option<Vec<String>>, ErrorCode) {
        match self {
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg.clone(), None, ErrorCode::NotFound)
            }
            AppError::Validation { message, details } => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    ?details,
                    "Validation error: {}",
                    message
                );
                (
                    StatusCode::BAD_REQUEST,
                    message.clone(),
                    details.clone(),
                    ErrorCode::ValidationError,
                )
            }
            AppError::Unauthorized(msg) => {
                tracing::info!(
                    error_code = ErrorCode::Unauthorized.code(),
                    "Unauthorized: {}",
                    msg
                );
                (
                    StatusCode::UNAUTHORIZED,
                    msg.clone(),
                    None,
                    ErrorCode::Unauthorized,
                )
            }
            AppError::InvalidId(raw) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidObjectId.code(),
                    id = %raw,
                    "Invalid object id"
                );
                (
                    StatusCode::BAD_REQUEST,
                    messages::INVALID_ID.to_string(),
                    None,
                    ErrorCode::InvalidObjectId,
                )
            }
            AppError::Database(e) => map_mongo_error(e),
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (e.status(), e.body_text(), None, ErrorCode::JsonExtraction)
            }
            AppError::QueryExtractorRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::QueryExtraction.code(),
                    "Query extraction error: {}",
                    e
                );
                (e.status(), e.body_text(), None, ErrorCode::QueryExtraction)
            }
            AppError::BadRequest(msg) => {
                tracing::info!(
                    error_code = ErrorCode::BadRequest.code(),
                    "Bad request: {}",
                    msg
                );
                (
                    StatusCode::BAD_REQUEST,
                    msg.clone(),
                    None,
                    ErrorCode::BadRequest,
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::INTERNAL_ERROR.to_string(),
                    None,
                    ErrorCode::InternalError,
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, _code) = self.parts();
        let body = ErrorResponse::new(message, details);

        let report = ErrorReport {
            body: body.clone(),
            stack: format!("{:?}\n{}", self, SpanTrace::capture()),
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

/// Collects every field violation into a flat, field-ordered list.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let details = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid ({})", field, err.code),
                })
            })
            .collect();

        AppError::validation_with_details(messages::VALIDATION_FAILED, details)
    }
}

/// How a MongoDB failure should be reported to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MongoFailure {
    /// Rejected by the collection's `$jsonSchema` validator
    DocumentValidation(String),
    /// Unique index violation
    DuplicateKey,
    Other,
}

/// Server error code carried by a command or write failure.
fn server_code(error: &mongodb::error::Error) -> Option<(i32, String)> {
    match error.kind.as_ref() {
        ErrorKind::Command(e) => Some((e.code, e.message.clone())),
        ErrorKind::Write(WriteFailure::WriteError(e)) => Some((e.code, e.message.clone())),
        _ => None,
    }
}

pub fn classify_mongo_error(error: &mongodb::error::Error) -> MongoFailure {
    match server_code(error) {
        Some((messages::MONGO_DOCUMENT_VALIDATION, message)) => {
            MongoFailure::DocumentValidation(message)
        }
        Some((messages::MONGO_DUPLICATE_KEY, _)) => MongoFailure::DuplicateKey,
        _ => MongoFailure::Other,
    }
}

/// Maps a MongoDB error to response components.
fn map_mongo_error(error: &mongodb::error::Error) -> (StatusCode, String, Option<Vec<String>>, ErrorCode) {
    match classify_mongo_error(error) {
        MongoFailure::DocumentValidation(reason) => {
            tracing::warn!(
                error_code = ErrorCode::DatabaseValidation.code(),
                "Document failed collection validation: {:?}",
                error
            );
            (
                StatusCode::BAD_REQUEST,
                messages::DB_VALIDATION.to_string(),
                Some(vec![reason]),
                ErrorCode::DatabaseValidation,
            )
        }
        MongoFailure::DuplicateKey => {
            tracing::warn!(
                error_code = ErrorCode::DuplicateKey.code(),
                "Duplicate key: {:?}",
                error
            );
            (
                StatusCode::BAD_REQUEST,
                messages::DUPLICATE_KEY.to_string(),
                None,
                ErrorCode::DuplicateKey,
            )
        }
        MongoFailure::Other => {
            tracing::error!(
                error_code = ErrorCode::DatabaseError.code(),
                "Database error: {:?}",
                error
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                messages::INTERNAL_ERROR.to_string(),
                None,
                ErrorCode::DatabaseError,
            )
        }
    }
}

/// Build an error response outside of [`AppError`], e.g. in fallbacks.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message, None))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use mongodb::bson::{doc, from_document};
    use mongodb::error::CommandError;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn command_error(code: i32, message: &str) -> mongodb::error::Error {
        let err: CommandError = from_document(doc! {
            "code": code,
            "codeName": "Test",
            "errmsg": message,
        })
        .unwrap();
        ErrorKind::Command(err).into()
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = AppError::NotFound("Product not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Product not found");
        assert!(body.get("details").is_none());
        assert!(body.get("stack").is_none());
    }

    #[tokio::test]
    async fn test_validation_response_with_details() {
        let response = AppError::validation_with_details(
            "Validation failed",
            vec!["Product name is required".into()],
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["details"][0], "Product name is required");
    }

    #[tokio::test]
    async fn test_invalid_id_response() {
        let response = AppError::InvalidId("abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid ID format");
    }

    #[tokio::test]
    async fn test_unauthorized_response() {
        let response = AppError::Unauthorized(messages::API_KEY_REQUIRED.into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], messages::API_KEY_REQUIRED);
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let response = AppError::InternalServerError("pool exhausted".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_query_rejection_uses_error_envelope() {
        use axum::extract::{FromRequestParts, Query};

        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Filter {
            category: Option<String>,
        }

        let (mut parts, _) = axum::http::Request::get("/?category=animal&category=food")
            .body(())
            .unwrap()
            .into_parts();
        let rejection = Query::<Filter>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        let response = AppError::from(rejection).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("duplicate field"));
    }

    #[tokio::test]
    async fn test_response_carries_error_report() {
        let response = AppError::BadRequest("nope".into()).into_response();
        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert_eq!(report.body.message, "nope");
        assert!(report.stack.contains("BadRequest"));
    }

    #[tokio::test]
    async fn test_duplicate_key_maps_to_400() {
        let response = AppError::from(command_error(11000, "E11000 duplicate key")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Duplicate field value entered"
        );
    }

    #[tokio::test]
    async fn test_document_validation_maps_to_400_with_details() {
        let response =
            AppError::from(command_error(121, "Document failed validation")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Validation Error");
        assert_eq!(body["details"][0], "Document failed validation");
    }

    #[tokio::test]
    async fn test_other_database_errors_map_to_500() {
        let response = AppError::from(command_error(8000, "boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "Internal Server Error");
    }

    #[test]
    fn test_classify_mongo_error() {
        assert_eq!(
            classify_mongo_error(&command_error(11000, "dup")),
            MongoFailure::DuplicateKey
        );
        assert_eq!(
            classify_mongo_error(&command_error(121, "bad doc")),
            MongoFailure::DocumentValidation("bad doc".into())
        );
        assert_eq!(
            classify_mongo_error(&command_error(13, "unauthorized")),
            MongoFailure::Other
        );
    }

    #[test]
    fn test_validation_errors_are_flattened() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "price",
            validator::ValidationError::new("range").with_message("Price must be a positive number".into()),
        );
        errors.add(
            "name",
            validator::ValidationError::new("required").with_message("Product name is required".into()),
        );

        match AppError::from(errors) {
            AppError::Validation { message, details } => {
                assert_eq!(message, "Validation failed");
                assert_eq!(
                    details.unwrap(),
                    vec!["Product name is required", "Price must be a positive number"]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
