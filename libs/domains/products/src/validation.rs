//! Field rules for [`ProductPayload`](crate::models::ProductPayload).
//!
//! Each rule sees the raw JSON value of a field that is present (possibly
//! `null`); missing fields are handled by `required` on the payload itself.

use serde_json::Value;
use std::borrow::Cow;
use validator::ValidationError;

use crate::models::ProductCategory;

pub const NAME_REQUIRED: &str = "Product name is required";
pub const DESCRIPTION_REQUIRED: &str = "Product description is required";
pub const PRICE_REQUIRED: &str = "Product price is required";
pub const PRICE_INVALID: &str = "Price must be a positive number";
pub const CATEGORY_INVALID: &str = "Valid category is required (animal, food, item, fantasy, cartoon)";
pub const IN_STOCK_INVALID: &str = "inStock must be a boolean value";

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn non_blank_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

pub fn validate_name(value: &Value) -> Result<(), ValidationError> {
    if non_blank_string(value) {
        Ok(())
    } else {
        Err(violation("name", NAME_REQUIRED))
    }
}

pub fn validate_description(value: &Value) -> Result<(), ValidationError> {
    if non_blank_string(value) {
        Ok(())
    } else {
        Err(violation("description", DESCRIPTION_REQUIRED))
    }
}

/// `null` counts as missing; anything else must be a number >= 0.
pub fn validate_price(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Null => Err(violation("price", PRICE_REQUIRED)),
        Value::Number(n) if n.as_f64().is_some_and(|p| p >= 0.0) => Ok(()),
        _ => Err(violation("price", PRICE_INVALID)),
    }
}

pub(crate) fn parse_category(value: &Value) -> Option<ProductCategory> {
    value.as_str().and_then(|s| s.parse().ok())
}

pub fn validate_category(value: &Value) -> Result<(), ValidationError> {
    parse_category(value)
        .map(|_| ())
        .ok_or_else(|| violation("category", CATEGORY_INVALID))
}

/// Optional, but when present (including `null`) it must be a boolean.
pub fn validate_in_stock(value: &Value) -> Result<(), ValidationError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(violation("inStock", IN_STOCK_INVALID))
    }
}
