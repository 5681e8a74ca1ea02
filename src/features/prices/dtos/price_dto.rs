use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::prices::models::Price;

/// Response DTO for price
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceResponseDto {
    pub id: i32,
    pub license: String,
    /// Decimal amount, serialized as a string to keep precision
    #[schema(value_type = String, example = "4250.00")]
    pub price: Decimal,
}

impl From<Price> for PriceResponseDto {
    fn from(p: Price) -> Self {
        Self {
            id: p.id,
            license: p.license,
            price: p.price,
        }
    }
}
