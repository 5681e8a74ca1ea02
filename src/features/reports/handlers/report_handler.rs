use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::categories::dtos::CategoryCountDto;
use crate::features::categories::CategoryService;
use crate::features::prices::PriceService;
use crate::features::report_images::ReportImageService;
use crate::features::reports::dtos::{
    CreateReportWithImagesDto, FileUploadForm, LatestReportDto, ReportBundleDto, ReportDetailDto,
    ReportListItemDto, ReportMetaDto, ReportPayloadDto, ReportResponseDto, ReportWithImagesDto,
    UploadImageResponseDto,
};
use crate::features::reports::services::{
    is_excel_content_type, ExcelImportService, ImageUploadService, ReportService,
};
use crate::shared::constants::MAX_UPLOAD_SIZE;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery, SearchQuery};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub category_service: Arc<CategoryService>,
    pub price_service: Arc<PriceService>,
    pub report_image_service: Arc<ReportImageService>,
    pub excel_import_service: Arc<ExcelImportService>,
    pub image_upload_service: Arc<ImageUploadService>,
}

/// The `file` part of a multipart upload
struct UploadedFile {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

async fn read_file_part(multipart: &mut Multipart) -> Result<UploadedFile> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::from(e)
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unnamed".to_string());
        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::from(e)
        })?;

        if data.len() > MAX_UPLOAD_SIZE {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {} MB",
                MAX_UPLOAD_SIZE / 1024 / 1024
            )));
        }

        return Ok(UploadedFile {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    Err(AppError::BadRequest("File is required".to_string()))
}

/// List all reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportListItemDto>>),
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<ReportListItemDto>>>> {
    let reports = state.report_service.list().await?;
    Ok(Json(ApiResponse::success(Some(reports), None, None)))
}

/// Latest reports by publication date
#[utoipa::path(
    get,
    path = "/api/reports/latest",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Latest reports", body = ApiResponse<Vec<LatestReportDto>>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "reports"
)]
pub async fn latest_reports(
    State(state): State<ReportState>,
    AppQuery(page): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<LatestReportDto>>>> {
    page.validate()?;

    let (reports, total) = state.report_service.latest(&page).await?;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

/// Search reports by title keyword
#[utoipa::path(
    get,
    path = "/api/reports/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching reports", body = ApiResponse<Vec<ReportListItemDto>>),
        (status = 400, description = "Missing keyword or invalid pagination")
    ),
    tag = "reports"
)]
pub async fn search_reports(
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ReportListItemDto>>>> {
    query.validate()?;

    let (reports, total) = state.report_service.search(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

/// Report count per category
#[utoipa::path(
    get,
    path = "/api/reports/category/category_count",
    responses(
        (status = 200, description = "Counts per category", body = ApiResponse<Vec<CategoryCountDto>>),
    ),
    tag = "reports"
)]
pub async fn report_category_counts(
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<CategoryCountDto>>>> {
    let counts = state.report_service.category_counts().await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}

/// Reports of a category; `all-industries` lists every category
#[utoipa::path(
    get,
    path = "/api/reports/category/{category_url}",
    params(
        ("category_url" = String, Path, description = "Category url slug or all-industries"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Reports of the category", body = ApiResponse<Vec<ReportListItemDto>>),
        (status = 400, description = "Invalid pagination"),
        (status = 404, description = "Category not found")
    ),
    tag = "reports"
)]
pub async fn list_reports_by_category(
    State(state): State<ReportState>,
    Path(category_url): Path<String>,
    AppQuery(page): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportListItemDto>>>> {
    page.validate()?;

    let (reports, total) = state
        .report_service
        .list_by_category(&category_url, &page)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

/// Get report by id
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = i32, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Report with its category, the price list and its images
#[utoipa::path(
    get,
    path = "/api/reports/{id}/bundle",
    params(
        ("id" = i32, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report bundle", body = ApiResponse<ReportBundleDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report_bundle(
    State(state): State<ReportState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReportBundleDto>>> {
    let report = state.report_service.get_by_id(id).await?;

    let (category, price_list, images) = tokio::try_join!(
        state.category_service.get_by_id(report.category_id),
        state.price_service.list(),
        state.report_image_service.list_by_report(id),
    )?;

    let bundle = ReportBundleDto {
        report,
        category,
        price_list,
        images,
    };
    Ok(Json(ApiResponse::success(Some(bundle), None, None)))
}

/// Get report by url with its category
#[utoipa::path(
    get,
    path = "/api/reports/url/{url}",
    params(
        ("url" = String, Path, description = "Report url slug")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report_by_url(
    State(state): State<ReportState>,
    Path(url): Path<String>,
) -> Result<Json<ApiResponse<ReportDetailDto>>> {
    let report = state.report_service.get_by_url(&url).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// SEO metadata of a report
#[utoipa::path(
    get,
    path = "/api/reports/meta/{url}",
    params(
        ("url" = String, Path, description = "Report url slug")
    ),
    responses(
        (status = 200, description = "Report metadata", body = ApiResponse<ReportMetaDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report_meta(
    State(state): State<ReportState>,
    Path(url): Path<String>,
) -> Result<Json<ApiResponse<ReportMetaDto>>> {
    let meta = state.report_service.get_meta(&url).await?;
    Ok(Json(ApiResponse::success(Some(meta), None, None)))
}

/// Create a report with its images
///
/// `XXX` in image names is replaced by the new report id.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportWithImagesDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportWithImagesDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Report url already exists")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateReportWithImagesDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportWithImagesDto>>)> {
    dto.validate()?;

    let created = state.report_service.create(&dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(created), None, None)),
    ))
}

/// Create several reports in one transaction
#[utoipa::path(
    post,
    path = "/api/reports/bulk",
    request_body = Vec<CreateReportWithImagesDto>,
    responses(
        (status = 201, description = "Reports created", body = ApiResponse<Vec<ReportWithImagesDto>>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "A report url already exists")
    ),
    tag = "reports"
)]
pub async fn create_reports_bulk(
    State(state): State<ReportState>,
    AppJson(dtos): AppJson<Vec<CreateReportWithImagesDto>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<ReportWithImagesDto>>>)> {
    if dtos.is_empty() {
        return Err(AppError::Validation(
            "At least one report is required".to_string(),
        ));
    }
    for (i, dto) in dtos.iter().enumerate() {
        dto.validate()
            .map_err(|e| AppError::Validation(format!("Report #{}: {}", i + 1, e)))?;
    }

    let created = state.report_service.create_bulk(&dtos).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(created), None, None)),
    ))
}

/// Replace every field of a report
#[utoipa::path(
    put,
    path = "/api/reports/{id}",
    params(
        ("id" = i32, Path, description = "Report ID")
    ),
    request_body = ReportPayloadDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report url already exists")
    ),
    tag = "reports"
)]
pub async fn update_report(
    State(state): State<ReportState>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<ReportPayloadDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let report = state.report_service.update(id, &dto).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Delete a report and its images
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = i32, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn delete_report(
    State(state): State<ReportState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    state.report_service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted".to_string()),
        None,
    )))
}

/// Convert an uploaded spreadsheet into bulk creation payloads
///
/// Rows of every worksheet are converted in order. The result can be posted
/// to `/api/reports/bulk` as is.
#[utoipa::path(
    post,
    path = "/api/reports/generate-payload-from-excel",
    request_body(
        content = FileUploadForm,
        content_type = "multipart/form-data",
        description = "Excel workbook (.xlsx or .xls)",
    ),
    responses(
        (status = 200, description = "Creation payloads", body = ApiResponse<Vec<CreateReportWithImagesDto>>),
        (status = 400, description = "Not an Excel file, or a row could not be converted"),
        (status = 413, description = "File too large")
    ),
    tag = "reports"
)]
pub async fn generate_payload_from_excel(
    State(state): State<ReportState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Vec<CreateReportWithImagesDto>>>> {
    let file = read_file_part(&mut multipart).await?;

    if !is_excel_content_type(&file.content_type) {
        return Err(AppError::BadRequest(
            "Invalid file format. Please upload an Excel file (.xlsx or .xls).".to_string(),
        ));
    }

    debug!("Converting spreadsheet {}", file.file_name);
    let payload = state
        .excel_import_service
        .generate_payload(file.data)
        .await?;
    Ok(Json(ApiResponse::success(Some(payload), None, None)))
}

/// Upload an image, shrunk to fit 800x800
#[utoipa::path(
    post,
    path = "/api/reports/upload",
    request_body(
        content = FileUploadForm,
        content_type = "multipart/form-data",
        description = "Image file (png, jpg, gif or webp)",
    ),
    responses(
        (status = 201, description = "Image stored", body = ApiResponse<UploadImageResponseDto>),
        (status = 400, description = "Missing file or undecodable image"),
        (status = 409, description = "Too many uploads in the same second"),
        (status = 413, description = "File too large"),
        (status = 502, description = "Image storage unavailable")
    ),
    tag = "reports"
)]
pub async fn upload_report_image(
    State(state): State<ReportState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadImageResponseDto>>)> {
    let file = read_file_part(&mut multipart).await?;

    let uploaded = state
        .image_upload_service
        .upload(&file.file_name, file.data)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(uploaded),
            Some(format!("Uploaded {}", file.file_name)),
            None,
        )),
    ))
}
