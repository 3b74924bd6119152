use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::VariantDetails;

/// One order as returned by the Shopify Admin REST API. Unknown fields are
/// ignored; the upstream payload is much larger than what we consume.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopifyOrder {
    pub id: i64,
    #[serde(default)]
    pub order_number: i64,
    pub total_price: String,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub customer: Option<ShopifyCustomer>,
    #[serde(default)]
    pub line_items: Vec<ShopifyLineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopifyCustomer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopifyLineItem {
    pub title: String,
    pub quantity: i64,
    pub price: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub variant_title: Option<String>,
    #[serde(default)]
    pub properties: Vec<LineItemProperty>,
}

/// Customization property on a line item. Shopify sends values as arbitrary
/// JSON scalars.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineItemProperty {
    pub name: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub value: Value,
}

impl ShopifyCustomer {
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

impl ShopifyLineItem {
    /// Customer-visible customization choices, platform bookkeeping excluded.
    pub fn variant_details(&self) -> VariantDetails {
        let mut details = VariantDetails::default();
        for prop in &self.properties {
            if prop.name.starts_with(VariantDetails::INTERNAL_PREFIX) {
                continue;
            }
            details.push(prop.name.clone(), render_value(&prop.value));
        }
        details
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FetchOrdersRequest {
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct FetchResults {
    pub new_orders: u32,
    pub existing_orders: u32,
    pub errors: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionStatus {
    pub connected: bool,
}
