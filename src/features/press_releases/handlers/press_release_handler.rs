use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::categories::dtos::CategoryCountDto;
use crate::features::press_releases::dtos::{
    LatestPressReleaseDto, PressReleaseDetailDto, PressReleaseListItemDto, PressReleaseMetaDto,
    PressReleasePayloadDto, PressReleaseResponseDto,
};
use crate::features::press_releases::services::PressReleaseService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery, SearchQuery};

/// List all press releases, newest first
#[utoipa::path(
    get,
    path = "/api/press-releases",
    responses(
        (status = 200, description = "List of press releases", body = ApiResponse<Vec<PressReleaseListItemDto>>),
    ),
    tag = "press-releases"
)]
pub async fn list_press_releases(
    State(service): State<Arc<PressReleaseService>>,
) -> Result<Json<ApiResponse<Vec<PressReleaseListItemDto>>>> {
    let press_releases = service.list().await?;
    Ok(Json(ApiResponse::success(Some(press_releases), None, None)))
}

/// Search press releases by title keyword
#[utoipa::path(
    get,
    path = "/api/press-releases/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching press releases", body = ApiResponse<Vec<PressReleaseListItemDto>>),
        (status = 400, description = "Missing keyword or invalid pagination")
    ),
    tag = "press-releases"
)]
pub async fn search_press_releases(
    State(service): State<Arc<PressReleaseService>>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<PressReleaseListItemDto>>>> {
    query.validate()?;

    let (press_releases, total) = service.search(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(press_releases),
        None,
        Some(Meta { total }),
    )))
}

/// Press release count per category
#[utoipa::path(
    get,
    path = "/api/press-releases/category/category_count",
    responses(
        (status = 200, description = "Counts per category", body = ApiResponse<Vec<CategoryCountDto>>),
    ),
    tag = "press-releases"
)]
pub async fn press_release_category_counts(
    State(service): State<Arc<PressReleaseService>>,
) -> Result<Json<ApiResponse<Vec<CategoryCountDto>>>> {
    let counts = service.category_counts().await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}

/// Latest press releases by publication date
#[utoipa::path(
    get,
    path = "/api/press-releases/latest",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Latest press releases", body = ApiResponse<Vec<LatestPressReleaseDto>>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "press-releases"
)]
pub async fn latest_press_releases(
    State(service): State<Arc<PressReleaseService>>,
    AppQuery(page): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<LatestPressReleaseDto>>>> {
    page.validate()?;

    let (press_releases, total) = service.latest(&page).await?;
    Ok(Json(ApiResponse::success(
        Some(press_releases),
        None,
        Some(Meta { total }),
    )))
}

/// Press releases of a category; `all-industries` lists every category
#[utoipa::path(
    get,
    path = "/api/press-releases/category/{category_url}",
    params(
        ("category_url" = String, Path, description = "Category url slug or all-industries"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Press releases of the category", body = ApiResponse<Vec<PressReleaseListItemDto>>),
        (status = 400, description = "Invalid pagination"),
        (status = 404, description = "Category not found")
    ),
    tag = "press-releases"
)]
pub async fn list_press_releases_by_category(
    State(service): State<Arc<PressReleaseService>>,
    Path(category_url): Path<String>,
    AppQuery(page): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<PressReleaseListItemDto>>>> {
    page.validate()?;

    let (press_releases, total) = service.list_by_category(&category_url, &page).await?;
    Ok(Json(ApiResponse::success(
        Some(press_releases),
        None,
        Some(Meta { total }),
    )))
}

/// Get press release by id
#[utoipa::path(
    get,
    path = "/api/press-releases/{id}",
    params(
        ("id" = i32, Path, description = "Press release ID")
    ),
    responses(
        (status = 200, description = "Press release found", body = ApiResponse<PressReleaseResponseDto>),
        (status = 404, description = "Press release not found")
    ),
    tag = "press-releases"
)]
pub async fn get_press_release(
    State(service): State<Arc<PressReleaseService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PressReleaseResponseDto>>> {
    let press_release = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(press_release), None, None)))
}

/// Get press release by url with its category
#[utoipa::path(
    get,
    path = "/api/press-releases/url/{url}",
    params(
        ("url" = String, Path, description = "Press release url slug")
    ),
    responses(
        (status = 200, description = "Press release found", body = ApiResponse<PressReleaseDetailDto>),
        (status = 404, description = "Press release not found")
    ),
    tag = "press-releases"
)]
pub async fn get_press_release_by_url(
    State(service): State<Arc<PressReleaseService>>,
    Path(url): Path<String>,
) -> Result<Json<ApiResponse<PressReleaseDetailDto>>> {
    let press_release = service.get_by_url(&url).await?;
    Ok(Json(ApiResponse::success(Some(press_release), None, None)))
}

/// SEO metadata of a press release
#[utoipa::path(
    get,
    path = "/api/press-releases/meta/{url}",
    params(
        ("url" = String, Path, description = "Press release url slug")
    ),
    responses(
        (status = 200, description = "Press release metadata", body = ApiResponse<PressReleaseMetaDto>),
        (status = 404, description = "Press release not found")
    ),
    tag = "press-releases"
)]
pub async fn get_press_release_meta(
    State(service): State<Arc<PressReleaseService>>,
    Path(url): Path<String>,
) -> Result<Json<ApiResponse<PressReleaseMetaDto>>> {
    let meta = service.get_meta(&url).await?;
    Ok(Json(ApiResponse::success(Some(meta), None, None)))
}

/// Create a press release
#[utoipa::path(
    post,
    path = "/api/press-releases",
    request_body = PressReleasePayloadDto,
    responses(
        (status = 201, description = "Press release created", body = ApiResponse<PressReleaseResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Press release url already exists")
    ),
    tag = "press-releases"
)]
pub async fn create_press_release(
    State(service): State<Arc<PressReleaseService>>,
    AppJson(dto): AppJson<PressReleasePayloadDto>,
) -> Result<(StatusCode, Json<ApiResponse<PressReleaseResponseDto>>)> {
    dto.validate()?;

    let press_release = service.create(&dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(press_release), None, None)),
    ))
}

/// Replace every field of a press release
#[utoipa::path(
    put,
    path = "/api/press-releases/{id}",
    params(
        ("id" = i32, Path, description = "Press release ID")
    ),
    request_body = PressReleasePayloadDto,
    responses(
        (status = 200, description = "Press release updated", body = ApiResponse<PressReleaseResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Press release not found"),
        (status = 409, description = "Press release url already exists")
    ),
    tag = "press-releases"
)]
pub async fn update_press_release(
    State(service): State<Arc<PressReleaseService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<PressReleasePayloadDto>,
) -> Result<Json<ApiResponse<PressReleaseResponseDto>>> {
    dto.validate()?;

    let press_release = service.update(id, &dto).await?;
    Ok(Json(ApiResponse::success(Some(press_release), None, None)))
}

/// Delete a press release
#[utoipa::path(
    delete,
    path = "/api/press-releases/{id}",
    params(
        ("id" = i32, Path, description = "Press release ID")
    ),
    responses(
        (status = 200, description = "Press release deleted"),
        (status = 404, description = "Press release not found")
    ),
    tag = "press-releases"
)]
pub async fn delete_press_release(
    State(service): State<Arc<PressReleaseService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Press release deleted".to_string()),
        None,
    )))
}
