use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::shared::constants::MAX_UPLOAD_SIZE;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create routes for the reports feature
pub fn routes(state: ReportState) -> Router {
    let upload_limit = DefaultBodyLimit::max(MAX_UPLOAD_SIZE + MULTIPART_OVERHEAD);

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/reports/bulk", post(handlers::create_reports_bulk))
        .route("/api/reports/latest", get(handlers::latest_reports))
        .route("/api/reports/search", get(handlers::search_reports))
        .route(
            "/api/reports/category/category_count",
            get(handlers::report_category_counts),
        )
        .route(
            "/api/reports/category/{category_url}",
            get(handlers::list_reports_by_category),
        )
        .route("/api/reports/url/{url}", get(handlers::get_report_by_url))
        .route("/api/reports/meta/{url}", get(handlers::get_report_meta))
        .route(
            "/api/reports/generate-payload-from-excel",
            post(handlers::generate_payload_from_excel).layer(upload_limit),
        )
        .route(
            "/api/reports/upload",
            post(handlers::upload_report_image).layer(upload_limit),
        )
        .route(
            "/api/reports/{id}",
            get(handlers::get_report)
                .put(handlers::update_report)
                .delete(handlers::delete_report),
        )
        .route("/api/reports/{id}/bundle", get(handlers::get_report_bundle))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::config::LocalStorageConfig;
    use crate::core::database::lazy_test_pool;
    use crate::features::categories::CategoryService;
    use crate::features::prices::PriceService;
    use crate::features::report_images::ReportImageService;
    use crate::features::reports::services::{
        ExcelImportService, ImageUploadService, ReportService,
    };
    use crate::modules::storage::LocalImageStore;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::json;

    async fn server(upload_dir: &std::path::Path) -> TestServer {
        let pool = lazy_test_pool();
        let category_service = Arc::new(CategoryService::new(pool.clone()));
        let store = LocalImageStore::new(LocalStorageConfig {
            root_dir: upload_dir.to_path_buf(),
            public_base_url: "http://localhost:3000/static".to_string(),
        })
        .await
        .unwrap();

        let state = ReportState {
            report_service: Arc::new(ReportService::new(pool.clone())),
            category_service: category_service.clone(),
            price_service: Arc::new(PriceService::new(pool.clone())),
            report_image_service: Arc::new(ReportImageService::new(pool)),
            excel_import_service: Arc::new(ExcelImportService::new(category_service)),
            image_upload_service: Arc::new(ImageUploadService::new(Arc::new(store))),
        };
        TestServer::new(routes(state)).unwrap()
    }

    #[tokio::test]
    async fn test_latest_rejects_page_zero() {
        let dir = tempfile::tempdir().unwrap();
        let response = server(dir.path())
            .await
            .get("/api/reports/latest")
            .add_query_param("page", 0)
            .add_query_param("per_page", 10)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_latest_rejects_huge_page() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path()).await;

        server
            .get("/api/reports/latest")
            .add_query_param("page", i64::MAX)
            .add_query_param("per_page", 100)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .get("/api/reports/search")
            .add_query_param("keyword", "battery")
            .add_query_param("page", i64::MAX)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_rejects_oversized_page() {
        let dir = tempfile::tempdir().unwrap();
        let response = server(dir.path())
            .await
            .get("/api/reports/search")
            .add_query_param("keyword", "battery")
            .add_query_param("page", 1)
            .add_query_param("per_page", 101)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_rejects_blank_keyword() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path()).await;

        server
            .get("/api/reports/search")
            .add_query_param("keyword", "   ")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .get("/api/reports/search")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_by_category_rejects_page_zero() {
        let dir = tempfile::tempdir().unwrap();
        let response = server(dir.path())
            .await
            .get("/api/reports/category/all-industries")
            .add_query_param("page", 0)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_excel_rejects_other_content_types() {
        let dir = tempfile::tempdir().unwrap();
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"title,pages\n".to_vec())
                .file_name("reports.csv")
                .mime_type("text/csv"),
        );

        let response = server(dir.path())
            .await
            .post("/api/reports/generate-payload-from-excel")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Excel file"));
    }

    #[tokio::test]
    async fn test_upload_requires_file_part() {
        let dir = tempfile::tempdir().unwrap();
        let form = MultipartForm::new().add_text("caption", "cover");

        let response = server(dir.path())
            .await
            .post("/api/reports/upload")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_413() {
        let dir = tempfile::tempdir().unwrap();
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![0u8; MAX_UPLOAD_SIZE + MULTIPART_OVERHEAD + 1])
                .file_name("cover.png")
                .mime_type("image/png"),
        );

        let response = server(dir.path())
            .await
            .post("/api/reports/upload")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_date() {
        let dir = tempfile::tempdir().unwrap();
        let body = json!({
            "report": {
                "title": "Global Widget Market",
                "url": "widget-market",
                "category_id": 1,
                "summary": "",
                "description": "",
                "toc": "",
                "highlights": "",
                "faqs": "",
                "meta_title": "",
                "meta_desc": "",
                "meta_keyword": "",
                "pages": "180",
                "cover_img": "",
                "created_date": "soon"
            },
            "images": []
        });

        let response = server(dir.path())
            .await
            .post("/api/reports")
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_rejects_dates_postgres_cannot_store() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(dir.path()).await;

        for created_date in ["0000/01/01", "2024-03-09T10:00:00.123456789+05:30"] {
            let body = json!({
                "title": "Global Widget Market",
                "url": "widget-market",
                "category_id": 1,
                "summary": "",
                "description": "",
                "toc": "",
                "highlights": "",
                "faqs": "",
                "meta_title": "",
                "meta_desc": "",
                "meta_keyword": "",
                "pages": "180",
                "cover_img": "",
                "created_date": created_date
            });

            server
                .put("/api/reports/1")
                .json(&body)
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_bulk_rejects_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let response = server(dir.path())
            .await
            .post("/api/reports/bulk")
            .json(&json!([]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
