//! Opt-in stack traces on error responses.
//!
//! [`AppError`](super::AppError) attaches an [`ErrorReport`] to every error
//! response. [`error_stack_middleware`] consumes it and, when enabled,
//! re-renders the body with the `stack` field filled in.

use super::ErrorResponse;
use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Response extension describing the error that produced a response
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub body: ErrorResponse,
    /// Debug rendering of the error followed by its span trace
    pub stack: String,
}

/// Whether error responses include the `stack` field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExposeStackTraces(pub bool);

/// Middleware that adds `stack` to error bodies when enabled.
///
/// ```ignore
/// let app = router.layer(axum::middleware::from_fn_with_state(
///     ExposeStackTraces(core_config::is_explicit_development()),
///     error_stack_middleware,
/// ));
/// ```
pub async fn error_stack_middleware(
    State(ExposeStackTraces(expose)): State<ExposeStackTraces>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    if !expose {
        return response;
    }

    let status = response.status();
    let mut body = report.body;
    body.stack = Some(report.stack);
    (status, Json(body)).into_response()
}
