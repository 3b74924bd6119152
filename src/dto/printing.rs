use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::PlateStatus;

/// A plate joined with its line item, order and customer for the printing
/// management view. Context columns are nullable because the joins are
/// outer joins.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct PlateWithContext {
    pub plate_id: i64,
    pub order_item_id: i64,
    pub plate_type: String,
    pub status: PlateStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub variant_details: Option<String>,
    pub sku: Option<String>,
    pub shopify_order_id: Option<String>,
    pub order_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct PlateStats {
    pub total_plates: i64,
    pub in_queue: i64,
    pub in_progress: i64,
    pub printed: i64,
    pub done: i64,
    pub blocked: i64,
    pub reprint: i64,
}

/// Per-status plate counts for one line item.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct PlateStatusSummary {
    pub total_plates: i64,
    pub plates_in_queue: i64,
    pub plates_in_progress: i64,
    pub plates_printed: i64,
    pub plates_done: i64,
    pub plates_blocked: i64,
    pub plates_reprint: i64,
}

/// A line item whose plates have all been printed and is waiting for
/// assembly.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct AssemblyReadyItem {
    pub order_item_id: i64,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub variant_details: String,
    pub sku: Option<String>,
    pub created_at: NaiveDateTime,
    pub shopify_order_id: Option<String>,
    pub order_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub total_plates: i64,
    pub printed_plates: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePlateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkDoneResult {
    pub updated_plates: u64,
}
