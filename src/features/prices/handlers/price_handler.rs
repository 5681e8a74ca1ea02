use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::prices::dtos::PriceResponseDto;
use crate::features::prices::services::PriceService;
use crate::shared::types::ApiResponse;

/// List license prices
#[utoipa::path(
    get,
    path = "/api/prices",
    responses(
        (status = 200, description = "Price list", body = ApiResponse<Vec<PriceResponseDto>>),
    ),
    tag = "prices"
)]
pub async fn list_prices(
    State(service): State<Arc<PriceService>>,
) -> Result<Json<ApiResponse<Vec<PriceResponseDto>>>> {
    let prices = service.list().await?;
    Ok(Json(ApiResponse::success(Some(prices), None, None)))
}
