use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::press_releases::{
    dtos as press_releases_dtos, handlers as press_releases_handlers,
};
use crate::features::prices::{dtos as prices_dtos, handlers as prices_handlers};
use crate::features::report_images::{
    dtos as report_images_dtos, handlers as report_images_handlers,
};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::get_category_by_url,
        categories_handlers::create_category,
        categories_handlers::create_categories_bulk,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::latest_reports,
        reports_handlers::search_reports,
        reports_handlers::report_category_counts,
        reports_handlers::list_reports_by_category,
        reports_handlers::get_report,
        reports_handlers::get_report_bundle,
        reports_handlers::get_report_by_url,
        reports_handlers::get_report_meta,
        reports_handlers::create_report,
        reports_handlers::create_reports_bulk,
        reports_handlers::update_report,
        reports_handlers::delete_report,
        reports_handlers::generate_payload_from_excel,
        reports_handlers::upload_report_image,
        // Press releases
        press_releases_handlers::list_press_releases,
        press_releases_handlers::search_press_releases,
        press_releases_handlers::press_release_category_counts,
        press_releases_handlers::latest_press_releases,
        press_releases_handlers::list_press_releases_by_category,
        press_releases_handlers::get_press_release,
        press_releases_handlers::get_press_release_by_url,
        press_releases_handlers::get_press_release_meta,
        press_releases_handlers::create_press_release,
        press_releases_handlers::update_press_release,
        press_releases_handlers::delete_press_release,
        // Report images
        report_images_handlers::upsert_report_image,
        report_images_handlers::search_report_images,
        report_images_handlers::delete_report_image,
        // Prices
        prices_handlers::list_prices,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::CategoryCountDto,
            // Reports
            reports_dtos::ReportPayloadDto,
            reports_dtos::CreateReportWithImagesDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportListItemDto,
            reports_dtos::ReportDetailDto,
            reports_dtos::ReportMetaDto,
            reports_dtos::LatestReportDto,
            reports_dtos::ReportWithImagesDto,
            reports_dtos::ReportBundleDto,
            reports_dtos::UploadImageResponseDto,
            reports_dtos::FileUploadForm,
            // Press releases
            press_releases_dtos::PressReleasePayloadDto,
            press_releases_dtos::PressReleaseResponseDto,
            press_releases_dtos::PressReleaseListItemDto,
            press_releases_dtos::PressReleaseDetailDto,
            press_releases_dtos::PressReleaseMetaDto,
            press_releases_dtos::LatestPressReleaseDto,
            // Report images
            report_images_dtos::ReportImageInput,
            report_images_dtos::UpsertReportImageDto,
            report_images_dtos::ReportImageResponseDto,
            // Prices
            prices_dtos::PriceResponseDto,
            ApiResponse<reports_dtos::ReportBundleDto>,
        )
    ),
    tags(
        (name = "categories", description = "Industry categories"),
        (name = "reports", description = "Market research reports, spreadsheet import and image upload"),
        (name = "press-releases", description = "Press releases announcing reports"),
        (name = "report-images", description = "Images attached to reports"),
        (name = "prices", description = "License price list"),
    ),
    info(
        title = "Report Catalog API",
        version = "0.1.0",
        description = "API documentation for the market research report catalog",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/categories",
            "/api/reports/search",
            "/api/reports/{id}/bundle",
            "/api/press-releases/latest",
            "/api/report-images",
            "/api/prices",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Catalog".to_string(),
            version: "2.0.0".to_string(),
            description: "internal".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Catalog");
        assert_eq!(doc.info.version, "2.0.0");
    }
}
