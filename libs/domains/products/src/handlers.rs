//! HTTP handlers for Products API

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    ApiKeyAuth, ApiResponse, ObjectIdPath, PaginationMeta, QueryParams, ValidatedJson,
    api_key_middleware,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CategoryStats, ListQuery, OverallStats, ProductCategory, ProductFields, ProductPage,
    ProductPayload, ProductResponse, ProductStats, SearchQuery,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        search_products,
        get_stats,
        get_product,
        create_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            ProductResponse, ProductPayload, ProductCategory, ProductStats,
            CategoryStats, OverallStats, PaginationMeta
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Plushie catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router.
///
/// Reads are public. Writes sit behind [`api_key_middleware`], installed with
/// `route_layer` so a bad key is rejected before the body or id is looked at.
pub fn router<R: ProductRepository + 'static>(
    service: ProductService<R>,
    auth: ApiKeyAuth,
) -> Router {
    let shared_service = Arc::new(service);

    let protected = Router::new()
        .route("/", post(create_product))
        .route("/{id}", put(update_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(auth, api_key_middleware));

    Router::new()
        .route("/", get(list_products))
        .route("/search", get(search_products))
        .route("/stats", get(get_stats))
        .route("/{id}", get(get_product))
        .merge(protected)
        .with_state(shared_service)
}

fn page_response(page: ProductPage) -> ApiResponse<Vec<ProductResponse>> {
    let products = page.products.into_iter().map(ProductResponse::from).collect();
    ApiResponse::paginated(products, page.pagination)
}

/// List products with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of products", body = ApiResponse<Vec<ProductResponse>>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    QueryParams(query): QueryParams<ListQuery>,
) -> ProductResult<ApiResponse<Vec<ProductResponse>>> {
    let filter = query.filter()?;
    let pagination = query.pagination()?;

    let page = service.list_products(filter, pagination).await?;
    Ok(page_response(page))
}

/// Search products by name and description
#[utoipa::path(
    get,
    path = "/search",
    tag = "Products",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products, most relevant first", body = ApiResponse<Vec<ProductResponse>>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> ProductResult<ApiResponse<Vec<ProductResponse>>> {
    let pagination = query.pagination()?;

    let page = service
        .search_products(query.q.as_deref(), pagination)
        .await?;
    Ok(page_response(page))
}

/// Catalog statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "Products",
    responses(
        (status = 200, description = "Per-category and overall statistics", body = ApiResponse<ProductStats>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_stats<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<ApiResponse<ProductStats>> {
    let stats = service.get_stats().await?;
    Ok(ApiResponse::success(stats))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ObjectId")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductResponse>),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<ApiResponse<ProductResponse>> {
    let product = service.get_product(id).await?;
    Ok(ApiResponse::success(product.into()))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<ProductResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(payload): ValidatedJson<ProductPayload>,
) -> ProductResult<impl IntoResponse> {
    let product = service
        .create_product(ProductFields::try_from(payload)?)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Product created successfully", ProductResponse::from(product)),
    ))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ObjectId")
    ),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<ProductResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(payload): ValidatedJson<ProductPayload>,
) -> ProductResult<ApiResponse<ProductResponse>> {
    let product = service
        .update_product(id, ProductFields::try_from(payload)?)
        .await?;

    Ok(ApiResponse::with_message(
        "Product updated successfully",
        product.into(),
    ))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ObjectId")
    ),
    responses(
        (status = 200, description = "Product deleted successfully"),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<ApiResponse<()>> {
    service.delete_product(id).await?;
    Ok(ApiResponse::message("Product deleted successfully"))
}
