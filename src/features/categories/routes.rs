use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/api/categories/bulk", post(handlers::create_categories_bulk))
        .route("/api/categories/url/{url}", get(handlers::get_category_by_url))
        .route("/api/categories/{id}", get(handlers::get_category))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server() -> TestServer {
        let service = Arc::new(CategoryService::new(lazy_test_pool()));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_slug() {
        let response = server()
            .post("/api/categories")
            .json(&json!({ "abr": "ANA", "name": "Analytics", "url": "Data Analytics" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_bulk_rejects_empty_list() {
        let response = server().post("/api/categories/bulk").json(&json!([])).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected() {
        let response = server().get("/api/categories/analytics").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
