//! Custom extractors for Axum handlers.
//!
//! All reject with [`AppError`](crate::errors::AppError) so failures share the
//! standard error envelope.

pub mod object_id_path;
pub mod query_params;
pub mod validated_json;

pub use object_id_path::ObjectIdPath;
pub use query_params::QueryParams;
pub use validated_json::ValidatedJson;
