use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::press_releases::handlers;
use crate::features::press_releases::services::PressReleaseService;

/// Create routes for the press releases feature
pub fn routes(service: Arc<PressReleaseService>) -> Router {
    Router::new()
        .route(
            "/api/press-releases",
            get(handlers::list_press_releases).post(handlers::create_press_release),
        )
        .route(
            "/api/press-releases/search",
            get(handlers::search_press_releases),
        )
        .route(
            "/api/press-releases/latest",
            get(handlers::latest_press_releases),
        )
        .route(
            "/api/press-releases/category/category_count",
            get(handlers::press_release_category_counts),
        )
        .route(
            "/api/press-releases/category/{category_url}",
            get(handlers::list_press_releases_by_category),
        )
        .route(
            "/api/press-releases/url/{url}",
            get(handlers::get_press_release_by_url),
        )
        .route(
            "/api/press-releases/meta/{url}",
            get(handlers::get_press_release_meta),
        )
        .route(
            "/api/press-releases/{id}",
            get(handlers::get_press_release)
                .put(handlers::update_press_release)
                .delete(handlers::delete_press_release),
        )
        .with_state(service)
}
