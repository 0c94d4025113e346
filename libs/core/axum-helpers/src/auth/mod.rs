//! Request authentication.
//!
//! Write endpoints are guarded by a static API-key allow-list:
//!
//! ```ignore
//! use axum_helpers::auth::{ApiKeyAuth, api_key_middleware};
//! use core_config::{FromEnv, api_keys::ApiKeyConfig};
//!
//! let auth = ApiKeyAuth::from(&ApiKeyConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/", post(create))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, api_key_middleware));
//! ```

pub mod api_key;

pub use api_key::{API_KEY_HEADER, ApiKeyAuth, api_key_middleware};
