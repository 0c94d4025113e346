use axum::{extract::OriginalUri, http::StatusCode, response::Response};

use super::{ErrorCode, error_response, messages};

/// Fallback for unmatched routes: `Route <uri> not found`.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    tracing::info!(error_code = ErrorCode::RouteNotFound.code(), %uri, "Route not found");
    error_response(StatusCode::NOT_FOUND, format!("Route {} not found", uri))
}

/// Fallback for a known path called with an unsupported method.
pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, messages::METHOD_NOT_ALLOWED)
}
