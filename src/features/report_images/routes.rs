use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::report_images::handlers;
use crate::features::report_images::services::ReportImageService;

/// Create routes for the report images feature
pub fn routes(service: Arc<ReportImageService>) -> Router {
    Router::new()
        .route("/api/report-images", post(handlers::upsert_report_image))
        .route(
            "/api/report-images/{name}",
            get(handlers::search_report_images).delete(handlers::delete_report_image),
        )
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
        let service = Arc::new(ReportImageService::new(lazy_test_pool()));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_rejects_blank_name() {
        let response = server()
            .post("/api/report-images")
            .json(&json!({ "img_name": " ", "img_file": "aGVsbG8=" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_requires_numeric_id() {
        let response = server().delete("/api/report-images/cover").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
