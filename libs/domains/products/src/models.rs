use axum_helpers::{Pagination, PaginationMeta};
use chrono::{DateTime, Utc};
use bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumString, VariantNames};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::validation;

/// Product category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductCategory {
    Animal,
    Food,
    Item,
    Fantasy,
    Cartoon,
}

/// Product document as stored in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    /// Text-search relevance, only present on search results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    pub fn new(fields: ProductFields) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            in_stock: fields.in_stock.unwrap_or_else(default_in_stock),
            created_at: now,
            updated_at: now,
            score: None,
        }
    }
}

/// Product as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    /// 24-character hex ObjectId
    #[serde(rename = "_id")]
    #[schema(example = "665f1c2e8b3e4a1d2c3b4a59")]
    pub id: String,
    #[schema(example = "Cuddly Bear")]
    pub name: String,
    pub description: String,
    #[schema(example = 19.99)]
    pub price: f64,
    pub category: ProductCategory,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            in_stock: product.in_stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
            score: product.score,
        }
    }
}

/// Keeps an explicit JSON `null` as `Some(Value::Null)` so it is told apart
/// from a missing field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Create/update request body.
///
/// Fields are kept as raw JSON so a wrong type is reported as a rule
/// violation rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "Product name is required"),
        custom(function = "validation::validate_name")
    )]
    #[schema(value_type = String, example = "Cuddly Bear")]
    pub name: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "Product description is required"),
        custom(function = "validation::validate_description")
    )]
    #[schema(value_type = String, example = "A very soft brown bear")]
    pub description: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "Product price is required"),
        custom(function = "validation::validate_price")
    )]
    #[schema(value_type = f64, minimum = 0, example = 19.99)]
    pub price: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "Valid category is required (animal, food, item, fantasy, cartoon)"),
        custom(function = "validation::validate_category")
    )]
    #[schema(value_type = ProductCategory)]
    pub category: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "validation::validate_in_stock"))]
    #[schema(value_type = Option<bool>, example = true)]
    pub in_stock: Option<Value>,
}

/// Typed product fields, produced from a validated [`ProductPayload`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    /// `None` keeps the stored value on update and defaults to `true` on create
    pub in_stock: Option<bool>,
}

impl TryFrom<ProductPayload> for ProductFields {
    type Error = ProductError;

    fn try_from(payload: ProductPayload) -> Result<Self, Self::Error> {
        let text = |value: Option<Value>, message: &str| match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => Err(ProductError::Validation(message.to_string())),
        };

        let name = text(payload.name, validation::NAME_REQUIRED)?;
        let description = text(payload.description, validation::DESCRIPTION_REQUIRED)?;

        let price = payload
            .price
            .as_ref()
            .and_then(Value::as_f64)
            .filter(|p| *p >= 0.0)
            .ok_or_else(|| ProductError::Validation(validation::PRICE_INVALID.to_string()))?;

        let category = payload
            .category
            .as_ref()
            .and_then(validation::parse_category)
            .ok_or_else(|| ProductError::Validation(validation::CATEGORY_INVALID.to_string()))?;

        let in_stock = match payload.in_stock {
            None => None,
            Some(Value::Bool(b)) => Some(b),
            Some(_) => {
                return Err(ProductError::Validation(
                    validation::IN_STOCK_INVALID.to_string(),
                ));
            }
        };

        Ok(Self {
            name,
            description,
            price,
            category,
            in_stock,
        })
    }
}

/// Query parameters for `GET /products`.
///
/// Values stay raw so malformed numbers can be reported precisely.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Exact category match
    pub category: Option<String>,
    /// `true` selects in-stock products, any other value out-of-stock ones
    pub in_stock: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size (default 10)
    pub limit: Option<String>,
}

fn parse_price_bound(raw: Option<&str>, name: &str) -> ProductResult<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| ProductError::Validation(format!("{} must be a number", name))),
    }
}

impl ListQuery {
    pub fn filter(&self) -> ProductResult<ProductFilter> {
        Ok(ProductFilter {
            category: self.category.clone().filter(|c| !c.is_empty()),
            in_stock: self.in_stock.as_deref().map(|v| v == "true"),
            min_price: parse_price_bound(self.min_price.as_deref(), "minPrice")?,
            max_price: parse_price_bound(self.max_price.as_deref(), "maxPrice")?,
        })
    }

    pub fn pagination(&self) -> ProductResult<Pagination> {
        Ok(Pagination::parse(self.page.as_deref(), self.limit.as_deref())?)
    }
}

/// Resolved list filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub in_stock: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Query parameters for `GET /products/search`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text to search for in name and description
    pub q: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size (default 10)
    pub limit: Option<String>,
}

impl SearchQuery {
    pub fn pagination(&self) -> ProductResult<Pagination> {
        Ok(Pagination::parse(self.page.as_deref(), self.limit.as_deref())?)
    }
}

/// One page of products plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: PaginationMeta,
}

/// Aggregate figures for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: ProductCategory,
    pub count: u64,
    /// Rounded to 2 decimals
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub in_stock_count: u64,
    pub out_of_stock_count: u64,
}

/// Aggregate figures across the whole catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_products: u64,
    pub total_in_stock: u64,
    /// `null` when the catalog is empty
    pub average_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub by_category: Vec<CategoryStats>,
    pub overall: OverallStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> ProductPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(ProductCategory::Fantasy.to_string(), "fantasy");
        assert_eq!("cartoon".parse::<ProductCategory>().unwrap(), ProductCategory::Cartoon);
        assert!("Animal".parse::<ProductCategory>().is_err());
        assert_eq!(
            ProductCategory::VARIANTS,
            ["animal", "food", "item", "fantasy", "cartoon"]
        );
    }

    #[test]
    fn test_payload_null_is_not_missing() {
        let p = payload(json!({ "inStock": null }));
        assert_eq!(p.in_stock, Some(Value::Null));
        assert_eq!(p.name, None);
    }

    #[test]
    fn test_payload_into_fields() {
        let fields = ProductFields::try_from(payload(json!({
            "name": "Bear",
            "description": "soft",
            "price": 12,
            "category": "animal"
        })))
        .unwrap();

        assert_eq!(fields.name, "Bear");
        assert_eq!(fields.price, 12.0);
        assert_eq!(fields.category, ProductCategory::Animal);
        assert_eq!(fields.in_stock, None);
    }

    #[test]
    fn test_payload_into_fields_rejects_bad_type() {
        let err = ProductFields::try_from(payload(json!({
            "name": "Bear",
            "description": "soft",
            "price": "12",
            "category": "animal"
        })))
        .unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[test]
    fn test_new_product_defaults_in_stock() {
        let product = Product::new(ProductFields {
            name: "Dragon".into(),
            description: "green".into(),
            price: 30.0,
            category: ProductCategory::Fantasy,
            in_stock: None,
        });
        assert!(product.in_stock);
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn test_response_uses_hex_id() {
        let product = Product::new(ProductFields {
            name: "Sushi".into(),
            description: "salmon nigiri".into(),
            price: 8.5,
            category: ProductCategory::Food,
            in_stock: Some(false),
        });
        let hex = product.id.to_hex();

        let value = serde_json::to_value(ProductResponse::from(product)).unwrap();
        assert_eq!(value["_id"], hex);
        assert_eq!(value["inStock"], false);
        assert!(value.get("score").is_none());
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn test_list_query_filter() {
        let query = ListQuery {
            category: Some("animal".into()),
            in_stock: Some("yes".into()),
            min_price: Some("5".into()),
            max_price: Some("".into()),
            ..Default::default()
        };

        let filter = query.filter().unwrap();
        assert_eq!(filter.category.as_deref(), Some("animal"));
        assert_eq!(filter.in_stock, Some(false));
        assert_eq!(filter.min_price, Some(5.0));
        assert_eq!(filter.max_price, None);
    }

    #[test]
    fn test_list_query_empty_category_ignored() {
        let query = ListQuery {
            category: Some(String::new()),
            in_stock: Some("true".into()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.category, None);
        assert_eq!(filter.in_stock, Some(true));
    }

    #[test]
    fn test_list_query_rejects_non_numeric_price() {
        let query = ListQuery {
            max_price: Some("cheap".into()),
            ..Default::default()
        };
        let err = query.filter().unwrap_err();
        assert_eq!(err.to_string(), "maxPrice must be a number");
    }

    #[test]
    fn test_overall_stats_default() {
        let value = serde_json::to_value(OverallStats::default()).unwrap();
        assert_eq!(
            value,
            json!({ "totalProducts": 0, "totalInStock": 0, "averagePrice": null })
        );
    }
}
