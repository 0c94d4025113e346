use crate::errors::{AppError, messages};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use core_config::api_keys::ApiKeyConfig;
use std::collections::HashSet;
use std::sync::Arc;

/// Header carrying the client's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared, read-only set of accepted API keys
#[derive(Clone, Debug, Default)]
pub struct ApiKeyAuth {
    keys: Arc<HashSet<String>>,
}

impl ApiKeyAuth {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: Arc::new(keys.into_iter().map(Into::into).collect()),
        }
    }

    /// Exact, case-sensitive match against the allow-list.
    pub fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<&ApiKeyConfig> for ApiKeyAuth {
    fn from(config: &ApiKeyConfig) -> Self {
        Self::new(config.keys.iter().cloned())
    }
}

fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

/// Rejects the request with 401 unless `x-api-key` is an accepted key.
///
/// Install with `route_layer` so it runs before body extraction and path
/// parsing of the guarded handlers.
pub async fn api_key_middleware(
    State(auth): State<ApiKeyAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let verdict = extract_api_key(request.headers()).map(|key| auth.is_valid(key));

    match verdict {
        Some(true) => Ok(next.run(request).await),
        Some(false) => {
            tracing::debug!("Rejected request with unknown API key");
            Err(AppError::Unauthorized(messages::API_KEY_REQUIRED.to_string()))
        }
        None => {
            tracing::debug!("No API key in {} header", API_KEY_HEADER);
            Err(AppError::Unauthorized(messages::API_KEY_REQUIRED.to_string()))
        }
    }
}
