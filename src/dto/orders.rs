use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the orders dashboard: the order plus customer and plate
/// progress rolled up.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct OrderSummary {
    pub order_id: i64,
    pub shopify_order_id: String,
    pub order_status: String,
    pub total_price: f64,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub item_count: i64,
    pub total_plates: i64,
    pub plates_done: i64,
}

/// A line item with its per-status plate breakdown.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct OrderItemDetail {
    pub order_item_id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub variant_title: Option<String>,
    pub variant_details: String,
    pub sku: Option<String>,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub customer_name: Option<String>,
    pub total_plates: i64,
    pub plates_in_queue: i64,
    pub plates_in_progress: i64,
    pub plates_printed: i64,
    pub plates_done: i64,
    pub plates_blocked: i64,
    pub plates_reprint: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}
