//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Plushies API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Plushies API",
        version = "1.0.0",
        description = "Catalog of plush toys: CRUD, text search and statistics. \
                       Write endpoints require an `x-api-key` header.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Plushie catalog endpoints")
    )
)]
pub struct ApiDoc;
