//! Product Service - Business logic layer

use axum_helpers::Pagination;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductFields, ProductFilter, ProductPage, ProductStats};
use crate::repository::ProductRepository;

pub const SEARCH_QUERY_REQUIRED: &str = "Search query is required";

/// Product service orchestrating repository operations
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, fields), fields(product_name = %fields.name))]
    pub async fn create_product(&self, fields: ProductFields) -> ProductResult<Product> {
        self.repository.create(fields).await
    }

    /// Get a product by ID
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ObjectId) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// List products; the page and the total are fetched concurrently
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> ProductResult<ProductPage> {
        let (products, total) = tokio::try_join!(
            self.repository.list(filter.clone(), pagination),
            self.repository.count(filter),
        )?;

        Ok(ProductPage {
            products,
            pagination: pagination.meta(total),
        })
    }

    /// Full-text search over name and description
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        query: Option<&str>,
        pagination: Pagination,
    ) -> ProductResult<ProductPage> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ProductError::Validation(SEARCH_QUERY_REQUIRED.to_string()))?;

        let (products, total) = tokio::try_join!(
            self.repository.search(query, pagination),
            self.repository.count_search(query),
        )?;

        Ok(ProductPage {
            products,
            pagination: pagination.meta(total),
        })
    }

    /// Overwrite a product's fields
    #[instrument(skip(self, fields), fields(product_id = %id))]
    pub async fn update_product(&self, id: ObjectId, fields: ProductFields) -> ProductResult<Product> {
        self.repository
            .update(id, fields)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Delete a product
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ObjectId) -> ProductResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(ProductError::NotFound)
        }
    }

    /// Per-category and overall statistics, computed concurrently
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> ProductResult<ProductStats> {
        let (by_category, overall) = tokio::try_join!(
            self.repository.category_stats(),
            self.repository.overall_stats(),
        )?;

        Ok(ProductStats {
            by_category,
            overall,
        })
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryStats, OverallStats, ProductCategory};
    use crate::repository::MockProductRepository;
    use mockall::predicate::{always, eq};

    fn fields() -> ProductFields {
        ProductFields {
            name: "Bear".to_string(),
            description: "soft".to_string(),
            price: 15.0,
            category: ProductCategory::Animal,
            in_stock: None,
        }
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = ObjectId::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let err = service.get_product(id).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
        assert_eq!(err.to_string(), "Product not found");
    }

    #[tokio::test]
    async fn test_list_products_builds_pagination_meta() {
        let mut mock_repo = MockProductRepository::new();
        let pagination = Pagination::new(2, 10).unwrap();
        let filter = ProductFilter {
            category: Some("food".to_string()),
            ..Default::default()
        };

        mock_repo
            .expect_list()
            .with(eq(filter.clone()), eq(pagination))
            .returning(|_, _| Ok(vec![Product::new(fields())]));
        mock_repo
            .expect_count()
            .with(eq(filter.clone()))
            .returning(|_| Ok(25));

        let service = ProductService::new(mock_repo);
        let page = service.list_products(filter, pagination).await.unwrap();

        assert_eq!(page.products.len(), 1);
        assert_eq!(page.pagination.page, 2);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.pages, 3);
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let service = ProductService::new(MockProductRepository::new());

        for query in [None, Some(""), Some("   ")] {
            let err = service
                .search_products(query, Pagination::default())
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), SEARCH_QUERY_REQUIRED);
        }
    }

    #[tokio::test]
    async fn test_search_passes_trimmed_query() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_search()
            .with(eq("unicorn"), always())
            .returning(|_, _| Ok(vec![]));
        mock_repo
            .expect_count_search()
            .with(eq("unicorn"))
            .returning(|_| Ok(0));

        let service = ProductService::new(mock_repo);
        let page = service
            .search_products(Some(" unicorn "), Pagination::default())
            .await
            .unwrap();

        assert!(page.products.is_empty());
        assert_eq!(page.pagination.pages, 0);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_update().returning(|_, _| Ok(None));

        let service = ProductService::new(mock_repo);
        let err = service
            .update_product(ObjectId::new(), fields())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let mut mock_repo = MockProductRepository::new();
        let id = ObjectId::new();

        mock_repo.expect_delete().with(eq(id)).returning(|_| Ok(true));

        let service = ProductService::new(mock_repo);
        assert!(service.delete_product(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        let err = service.delete_product(ObjectId::new()).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_stats_counts_are_consistent() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo.expect_category_stats().returning(|| {
            Ok(vec![
                CategoryStats {
                    category: ProductCategory::Animal,
                    count: 3,
                    avg_price: 12.33,
                    min_price: 5.0,
                    max_price: 20.0,
                    in_stock_count: 2,
                    out_of_stock_count: 1,
                },
                CategoryStats {
                    category: ProductCategory::Food,
                    count: 1,
                    avg_price: 8.0,
                    min_price: 8.0,
                    max_price: 8.0,
                    in_stock_count: 1,
                    out_of_stock_count: 0,
                },
            ])
        });
        mock_repo.expect_overall_stats().returning(|| {
            Ok(OverallStats {
                total_products: 4,
                total_in_stock: 3,
                average_price: Some(11.25),
            })
        });

        let service = ProductService::new(mock_repo);
        let stats = service.get_stats().await.unwrap();

        let per_category: u64 = stats.by_category.iter().map(|c| c.count).sum();
        assert_eq!(per_category, stats.overall.total_products);
        for category in &stats.by_category {
            assert_eq!(
                category.in_stock_count + category.out_of_stock_count,
                category.count
            );
        }
    }

    #[tokio::test]
    async fn test_stats_empty_catalog() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_category_stats().returning(|| Ok(vec![]));
        mock_repo
            .expect_overall_stats()
            .returning(|| Ok(OverallStats::default()));

        let service = ProductService::new(mock_repo);
        let stats = service.get_stats().await.unwrap();

        assert!(stats.by_category.is_empty());
        assert_eq!(stats.overall.average_price, None);
    }
}
