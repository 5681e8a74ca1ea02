use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// List all categories ordered by name
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}

/// Get category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Get category by url slug
#[utoipa::path(
    get,
    path = "/api/categories/url/{url}",
    params(
        ("url" = String, Path, description = "Category url slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category_by_url(
    State(service): State<Arc<CategoryService>>,
    Path(url): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_by_url(&url).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Category url already exists")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    dto.validate()?;

    let category = service.create(&dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// Create several categories in one transaction
#[utoipa::path(
    post,
    path = "/api/categories/bulk",
    request_body = Vec<CreateCategoryDto>,
    responses(
        (status = 201, description = "Categories created", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "A category url already exists")
    ),
    tag = "categories"
)]
pub async fn create_categories_bulk(
    State(service): State<Arc<CategoryService>>,
    AppJson(dtos): AppJson<Vec<CreateCategoryDto>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<CategoryResponseDto>>>)> {
    if dtos.is_empty() {
        return Err(AppError::Validation(
            "At least one category is required".to_string(),
        ));
    }
    for (i, dto) in dtos.iter().enumerate() {
        dto.validate()
            .map_err(|e| AppError::Validation(format!("Category #{}: {}", i + 1, e)))?;
    }

    let categories = service.create_bulk(&dtos).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(categories), None, None)),
    ))
}
