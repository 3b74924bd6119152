use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Product;

/// What ingestion needs to know about a catalog entry to decompose a line
/// item into plates.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlateRequirement {
    pub product_id: i64,
    pub product_name: String,
    pub number_of_printing_plates: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductWithPlates {
    pub product: Product,
    /// Slot names in manufacturing order.
    pub plate_names: Vec<String>,
}
