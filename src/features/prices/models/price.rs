use rust_decimal::Decimal;
use sqlx::FromRow;

/// License tier and its price
#[derive(Debug, Clone, FromRow)]
pub struct Price {
    pub id: i32,
    pub license: String,
    pub price: Decimal,
}
