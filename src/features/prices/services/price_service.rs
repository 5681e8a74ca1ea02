use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::prices::dtos::PriceResponseDto;
use crate::features::prices::models::Price;

/// Read-only access to the license price list
pub struct PriceService {
    pool: PgPool,
}

impl PriceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<PriceResponseDto>> {
        let prices: Vec<Price> =
            sqlx::query_as("SELECT id, license, price FROM prices ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to list prices: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(prices.into_iter().map(|p| p.into()).collect())
    }
}
