//! # Axum Helpers
//!
//! Shared building blocks for the HTTP APIs in this workspace.
//!
//! ## Modules
//!
//! - **[`auth`]**: API-key middleware for write endpoints
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `AppError`, the JSON error envelope and fallbacks
//! - **[`extractors`]**: `ObjectIdPath`, `QueryParams` and `ValidatedJson`
//! - **[`pagination`]**: `page`/`limit` parsing and response metadata
//! - **[`response`]**: `{success, data, message, pagination}` envelope
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{RouterOptions, create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let router = create_router::<ApiDoc>(
//!         Router::new(),
//!         Router::new(),
//!         &RouterOptions::new(&config, false),
//!     )?;
//!
//!     create_app(router, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod pagination;
pub mod response;
pub mod server;

pub use auth::{API_KEY_HEADER, ApiKeyAuth, api_key_middleware};

pub use server::{
    HealthCheckFuture, HealthResponse, RouterOptions, ShutdownCoordinator, create_app,
    create_production_app, create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, create_permissive_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{ObjectIdPath, QueryParams, ValidatedJson};

pub use pagination::{Pagination, PaginationMeta};
pub use response::ApiResponse;
