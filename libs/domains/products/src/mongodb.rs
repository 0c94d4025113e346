//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use axum_helpers::Pagination;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, DateTime as BsonDateTime, Document, doc, oid::ObjectId},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use strum::VariantNames;
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{
    CategoryStats, OverallStats, Product, ProductCategory, ProductFields, ProductFilter,
};
use crate::repository::ProductRepository;

pub const PRODUCTS_COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    database: Database,
    collection: Collection<Product>,
}

impl MongoProductRepository {
    /// Create a new MongoProductRepository on the `products` collection
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    /// Create a new MongoProductRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            database: db.clone(),
            collection: db.collection::<Product>(collection_name),
        }
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    /// Install the `$jsonSchema` validator and the indexes.
    pub async fn init_collection(&self) -> ProductResult<()> {
        self.init_validator().await?;
        self.init_indexes().await
    }

    /// Attach the document validator, creating the collection if needed.
    ///
    /// Updates go through the same validator, so a `$set` that breaks the
    /// schema fails with a document validation error.
    pub async fn init_validator(&self) -> ProductResult<()> {
        let name = self.collection.name();
        let validator = Self::schema_validator();

        let existing = self.database.list_collection_names().await?;
        if existing.iter().any(|c| c == name) {
            self.database
                .run_command(doc! {
                    "collMod": name,
                    "validator": validator,
                    "validationLevel": "strict",
                    "validationAction": "error",
                })
                .await?;
        } else {
            self.database
                .create_collection(name)
                .validator(validator)
                .await?;
        }

        tracing::info!(collection = name, "Product schema validator installed");
        Ok(())
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            // Text search on name and description
            IndexModel::builder()
                .keys(doc! { "name": "text", "description": "text" })
                .options(
                    IndexOptions::builder()
                        .name("idx_text_search".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "category": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
            // Default list ordering
            IndexModel::builder()
                .keys(doc! { "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
            // Price range queries
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_price".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    fn schema_validator() -> Document {
        let categories: Vec<Bson> = ProductCategory::VARIANTS
            .iter()
            .map(|c| Bson::from(*c))
            .collect();

        doc! {
            "$jsonSchema": {
                "bsonType": "object",
                "required": ["name", "description", "price", "category"],
                "properties": {
                    "name": { "bsonType": "string", "minLength": 1 },
                    "description": { "bsonType": "string", "minLength": 1 },
                    "price": { "bsonType": ["double", "int", "long", "decimal"], "minimum": 0 },
                    "category": { "enum": categories },
                    "inStock": { "bsonType": "bool" },
                    "createdAt": { "bsonType": "date" },
                    "updatedAt": { "bsonType": "date" },
                }
            }
        }
    }

    /// Build a MongoDB filter document from ProductFilter
    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref category) = filter.category {
            doc.insert("category", category.as_str());
        }

        if let Some(in_stock) = filter.in_stock {
            doc.insert("inStock", in_stock);
        }

        // Price range, both bounds inclusive
        if filter.min_price.is_some() || filter.max_price.is_some() {
            let mut price_filter = doc! {};
            if let Some(min) = filter.min_price {
                price_filter.insert("$gte", min);
            }
            if let Some(max) = filter.max_price {
                price_filter.insert("$lte", max);
            }
            doc.insert("price", price_filter);
        }

        doc
    }

    fn text_filter(query: &str) -> Document {
        doc! { "$text": { "$search": query } }
    }

    /// `$set` document for an update; `inStock` is only touched when given
    fn update_document(fields: &ProductFields) -> Document {
        let mut set = doc! {
            "name": fields.name.as_str(),
            "description": fields.description.as_str(),
            "price": fields.price,
            "category": fields.category.to_string(),
            "updatedAt": BsonDateTime::now(),
        };
        if let Some(in_stock) = fields.in_stock {
            set.insert("inStock", in_stock);
        }
        doc! { "$set": set }
    }

    fn category_stats_pipeline() -> Vec<Document> {
        vec![
            doc! {
                "$group": {
                    "_id": "$category",
                    "count": { "$sum": 1 },
                    "avgPrice": { "$avg": "$price" },
                    "minPrice": { "$min": "$price" },
                    "maxPrice": { "$max": "$price" },
                    "inStockCount": { "$sum": { "$cond": ["$inStock", 1, 0] } },
                }
            },
            doc! {
                "$project": {
                    "_id": 0,
                    "category": "$_id",
                    "count": 1,
                    "avgPrice": { "$round": ["$avgPrice", 2] },
                    "minPrice": 1,
                    "maxPrice": 1,
                    "inStockCount": 1,
                    "outOfStockCount": { "$subtract": ["$count", "$inStockCount"] },
                }
            },
            doc! { "$sort": { "count": -1 } },
        ]
    }

    fn overall_stats_pipeline() -> Vec<Document> {
        vec![doc! {
            "$group": {
                "_id": Bson::Null,
                "totalProducts": { "$sum": 1 },
                "totalInStock": { "$sum": { "$cond": ["$inStock", 1, 0] } },
                "averagePrice": { "$avg": "$price" },
            }
        }]
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, fields), fields(product_name = %fields.name))]
    async fn create(&self, fields: ProductFields) -> ProductResult<Product> {
        let product = Product::new(fields);

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .limit(pagination.limit_i64())
            .skip(pagination.skip)
            .sort(doc! { "createdAt": -1 })
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, pagination: Pagination) -> ProductResult<Vec<Product>> {
        let score = doc! { "score": { "$meta": "textScore" } };

        let options = FindOptions::builder()
            .projection(score.clone())
            .sort(score)
            .limit(pagination.limit_i64())
            .skip(pagination.skip)
            .build();

        let cursor = self
            .collection
            .find(Self::text_filter(query))
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn count_search(&self, query: &str) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(Self::text_filter(query))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, fields), fields(product_id = %id))]
    async fn update(&self, id: ObjectId, fields: ProductFields) -> ProductResult<Option<Product>> {
        let product = self
            .collection
            .find_one_and_update(doc! { "_id": id }, Self::update_document(&fields))
            .return_document(ReturnDocument::After)
            .await?;

        if product.is_some() {
            tracing::info!(product_id = %id, "Product updated successfully");
        }
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        let deleted = result.deleted_count > 0;
        if deleted {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn category_stats(&self) -> ProductResult<Vec<CategoryStats>> {
        let cursor = self
            .collection
            .aggregate(Self::category_stats_pipeline())
            .with_type::<CategoryStats>()
            .await?;
        let stats: Vec<CategoryStats> = cursor.try_collect().await?;

        Ok(stats)
    }

    #[instrument(skip(self))]
    async fn overall_stats(&self) -> ProductResult<OverallStats> {
        let mut cursor = self
            .collection
            .aggregate(Self::overall_stats_pipeline())
            .with_type::<OverallStats>()
            .await?;

        Ok(cursor.try_next().await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_empty() {
        let filter = ProductFilter::default();
        let doc = MongoProductRepository::build_filter(&filter);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_with_category_and_stock() {
        let filter = ProductFilter {
            category: Some("animal".to_string()),
            in_stock: Some(false),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert_eq!(doc, doc! { "category": "animal", "inStock": false });
    }

    #[test]
    fn test_build_filter_with_price_range() {
        let filter = ProductFilter {
            min_price: Some(10.0),
            max_price: Some(50.0),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert_eq!(doc, doc! { "price": { "$gte": 10.0, "$lte": 50.0 } });
    }

    #[test]
    fn test_build_filter_with_min_price_only() {
        let filter = ProductFilter {
            min_price: Some(0.0),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert_eq!(doc, doc! { "price": { "$gte": 0.0 } });
    }

    #[test]
    fn test_update_document_keeps_stock_when_absent() {
        let fields = ProductFields {
            name: "Bear".into(),
            description: "soft".into(),
            price: 12.5,
            category: ProductCategory::Animal,
            in_stock: None,
        };

        let update = MongoProductRepository::update_document(&fields);
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("category").unwrap(), "animal");
        assert!(set.contains_key("updatedAt"));
        assert!(!set.contains_key("inStock"));
        assert!(!set.contains_key("createdAt"));
    }

    #[test]
    fn test_category_stats_pipeline_shape() {
        let pipeline = MongoProductRepository::category_stats_pipeline();
        assert_eq!(pipeline.len(), 3);

        let project = pipeline[1].get_document("$project").unwrap();
        assert_eq!(
            project.get_document("avgPrice").unwrap(),
            &doc! { "$round": ["$avgPrice", 2] }
        );
        assert_eq!(
            project.get_document("outOfStockCount").unwrap(),
            &doc! { "$subtract": ["$count", "$inStockCount"] }
        );
        assert_eq!(pipeline[2], doc! { "$sort": { "count": -1 } });
    }

    #[test]
    fn test_schema_validator_lists_categories() {
        let validator = MongoProductRepository::schema_validator();
        let category = validator
            .get_document("$jsonSchema")
            .and_then(|s| s.get_document("properties"))
            .and_then(|p| p.get_document("category"))
            .unwrap();
        assert_eq!(category.get_array("enum").unwrap().len(), 5);
    }
}
