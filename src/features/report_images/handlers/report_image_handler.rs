use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::report_images::dtos::{ReportImageResponseDto, UpsertReportImageDto};
use crate::features::report_images::services::ReportImageService;
use crate::shared::types::ApiResponse;

/// Insert an image, or replace the file of an existing image with the same name
#[utoipa::path(
    post,
    path = "/api/report-images",
    request_body = UpsertReportImageDto,
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<ReportImageResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Report not found")
    ),
    tag = "report-images"
)]
pub async fn upsert_report_image(
    State(service): State<Arc<ReportImageService>>,
    AppJson(dto): AppJson<UpsertReportImageDto>,
) -> Result<Json<ApiResponse<ReportImageResponseDto>>> {
    dto.validate()?;

    let image = service.upsert(&dto).await?;
    Ok(Json(ApiResponse::success(Some(image), None, None)))
}

/// Images whose name contains the given text (case-sensitive)
#[utoipa::path(
    get,
    path = "/api/report-images/{name}",
    params(
        ("name" = String, Path, description = "Substring of the image name")
    ),
    responses(
        (status = 200, description = "Matching images", body = ApiResponse<Vec<ReportImageResponseDto>>),
    ),
    tag = "report-images"
)]
pub async fn search_report_images(
    State(service): State<Arc<ReportImageService>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Vec<ReportImageResponseDto>>>> {
    let images = service.search_by_name(&name).await?;
    Ok(Json(ApiResponse::success(Some(images), None, None)))
}

/// Delete an image by id
#[utoipa::path(
    delete,
    path = "/api/report-images/{id}",
    params(
        ("id" = i32, Path, description = "Report image ID")
    ),
    responses(
        (status = 200, description = "Image deleted"),
        (status = 404, description = "Image not found")
    ),
    tag = "report-images"
)]
pub async fn delete_report_image(
    State(service): State<Arc<ReportImageService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Report image deleted".to_string()),
        None,
    )))
}
