//! Client-facing error messages shared by the error handler and extractors.

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const INVALID_ID: &str = "Invalid ID format";
pub const DB_VALIDATION: &str = "Validation Error";
pub const DUPLICATE_KEY: &str = "Duplicate field value entered";
pub const INTERNAL_ERROR: &str = "Internal Server Error";
pub const NOT_FOUND_RESOURCE: &str = "Resource not found";
pub const API_KEY_REQUIRED: &str =
    "Valid API key required. Include x-api-key header with valid key.";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const INVALID_JSON: &str = "Failed to parse request body";
pub const INVALID_QUERY: &str = "Failed to parse query string";

/// MongoDB server code for a document rejected by a collection validator
pub const MONGO_DOCUMENT_VALIDATION: i32 = 121;

/// MongoDB server code for a unique index violation
pub const MONGO_DUPLICATE_KEY: i32 = 11000;
