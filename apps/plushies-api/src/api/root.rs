//! Welcome document served at `/`

use axum::{Json, Router, routing::get};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct Welcome {
    message: &'static str,
    version: &'static str,
    endpoints: BTreeMap<&'static str, &'static str>,
    documentation: &'static str,
}

async fn welcome() -> Json<Welcome> {
    let endpoints = BTreeMap::from([
        ("getAllProducts", "GET /api/products"),
        ("getProduct", "GET /api/products/:id"),
        ("createProduct", "POST /api/products"),
        ("updateProduct", "PUT /api/products/:id"),
        ("deleteProduct", "DELETE /api/products/:id"),
        ("searchProducts", "GET /api/products/search?q=name"),
        ("getStats", "GET /api/products/stats"),
    ]);

    Json(Welcome {
        message: "Welcome to Plushies API! 🧸",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
        documentation: "Interactive API documentation is served at /swagger-ui",
    })
}

pub fn router() -> Router {
    Router::new().route("/", get(welcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_welcome_document() {
        let response = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Welcome to Plushies API! 🧸");
        assert_eq!(body["version"], "1.0.0");
        assert_eq!(body["endpoints"].as_object().unwrap().len(), 7);
        assert_eq!(body["endpoints"]["getStats"], "GET /api/products/stats");
    }
}
