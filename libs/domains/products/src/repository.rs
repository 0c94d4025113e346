use async_trait::async_trait;
use axum_helpers::Pagination;
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::{CategoryStats, OverallStats, Product, ProductFields, ProductFilter};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product
    async fn create(&self, fields: ProductFields) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// One page of products matching the filter, newest first
    async fn list(&self, filter: ProductFilter, pagination: Pagination)
    -> ProductResult<Vec<Product>>;

    /// Count products matching the filter
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64>;

    /// One page of text-search results, most relevant first
    async fn search(&self, query: &str, pagination: Pagination) -> ProductResult<Vec<Product>>;

    /// Count text-search matches
    async fn count_search(&self, query: &str) -> ProductResult<u64>;

    /// Overwrite the given fields. `None` when the product does not exist.
    async fn update(&self, id: ObjectId, fields: ProductFields) -> ProductResult<Option<Product>>;

    /// Delete a product. `false` when nothing was deleted.
    async fn delete(&self, id: ObjectId) -> ProductResult<bool>;

    /// Per-category aggregates, largest category first
    async fn category_stats(&self) -> ProductResult<Vec<CategoryStats>>;

    /// Catalog-wide aggregates
    async fn overall_stats(&self) -> ProductResult<OverallStats>;
}
