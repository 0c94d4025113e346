//! Products API routes

use axum::Router;
use axum_helpers::ApiKeyAuth;
use domain_products::{MongoProductRepository, ProductService, handlers};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let repository = MongoProductRepository::new(&state.db);
    let service = ProductService::new(repository);
    handlers::router(service, ApiKeyAuth::from(&state.config.api_keys))
}

/// Initialize the products collection
pub async fn init_collection(state: &AppState) -> eyre::Result<()> {
    let repository = MongoProductRepository::new(&state.db);
    repository.init_collection().await?;
    Ok(())
}
