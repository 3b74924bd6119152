use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub number_of_orders: i64,
    pub created_at: NaiveDateTime,
}

/// Static catalog entry. Seeded out-of-band, never written during ingestion.
#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub category: Option<String>,
    pub number_of_printing_plates: i64,
    pub box_size: Option<String>,
    pub sku: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Order {
    pub order_id: i64,
    pub shopify_order_id: String,
    pub customer_id: Option<i64>,
    pub order_status: String,
    pub total_price: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct OrderItem {
    pub order_item_id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub customer_id: Option<i64>,
    /// Display title as it appeared on the order, kept even if the product
    /// reference later goes stale.
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub variant_title: Option<String>,
    pub variant_details: String,
    pub sku: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct PrintingPlate {
    pub plate_id: i64,
    pub order_item_id: i64,
    /// Label copied from the product's plate slot at creation time, not a
    /// live reference.
    pub plate_type: String,
    pub status: PlateStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

/// Workflow status of a printing plate. Any status may move to any other;
/// moving to `Done` stamps the plate's completion time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
pub enum PlateStatus {
    #[serde(rename = "In Queue")]
    #[sqlx(rename = "In Queue")]
    InQueue,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    Printed,
    Done,
    Blocked,
    Reprint,
}

impl PlateStatus {
    pub const ALL: [PlateStatus; 6] = [
        PlateStatus::InQueue,
        PlateStatus::InProgress,
        PlateStatus::Printed,
        PlateStatus::Done,
        PlateStatus::Blocked,
        PlateStatus::Reprint,
    ];

    /// Statuses shown on the printing management view.
    pub const ACTIVE: [PlateStatus; 3] = [
        PlateStatus::InQueue,
        PlateStatus::InProgress,
        PlateStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlateStatus::InQueue => "In Queue",
            PlateStatus::InProgress => "In Progress",
            PlateStatus::Printed => "Printed",
            PlateStatus::Done => "Done",
            PlateStatus::Blocked => "Blocked",
            PlateStatus::Reprint => "Reprint",
        }
    }

    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|status| status.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PlateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlateStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

/// Customer-visible customization choices for a line item, held as ordered
/// (name, value) pairs. The pipe-delimited string exists only at the
/// persistence boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantDetails(Vec<VariantProperty>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantProperty {
    pub name: String,
    pub value: String,
}

impl VariantDetails {
    /// Properties with this prefix are platform bookkeeping, not customer
    /// choices, and are never stored.
    pub const INTERNAL_PREFIX: &'static str = "_mws";

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(VariantProperty {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn properties(&self) -> &[VariantProperty] {
        &self.0
    }

    /// `Name: Value|Name: Value` encoding stored on the order item row.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|prop| format!("{}: {}", prop.name, prop.value))
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn parse(encoded: &str) -> Self {
        let mut details = Self::default();
        for entry in encoded.split('|').filter(|entry| !entry.is_empty()) {
            match entry.split_once(": ") {
                Some((name, value)) => details.push(name, value),
                None => details.push(entry, ""),
            }
        }
        details
    }
}
