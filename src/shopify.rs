use axum::http::StatusCode;

use crate::{
    dto::shopify::ShopifyOrder,
    error::{AppError, AppResult},
};

const API_VERSION: &str = "2023-10";
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

#[derive(Debug, serde::Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    orders: Vec<ShopifyOrder>,
}

#[derive(Debug, serde::Deserialize)]
struct OrderEnvelope {
    order: Option<ShopifyOrder>,
}

#[derive(Debug, serde::Deserialize)]
struct ShopEnvelope {
    shop: ShopInfo,
}

#[derive(Debug, serde::Deserialize)]
struct ShopInfo {
    name: String,
}

/// Client for the Shopify Admin REST API. No retry policy: upstream failures
/// surface to the caller with the status code attached.
#[derive(Clone)]
pub struct ShopifyClient {
    http: reqwest::Client,
    api_url: String,
    access_token: String,
}

impl ShopifyClient {
    pub fn new(store: &str, access_token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: format!("https://{store}/admin/api/{API_VERSION}"),
            access_token: access_token.to_string(),
        }
    }

    pub async fn fetch_orders(&self, limit: u32) -> AppResult<Vec<ShopifyOrder>> {
        tracing::debug!(limit, "fetching orders from Shopify");

        let resp = self
            .http
            .get(format!("{}/orders.json", self.api_url))
            .query(&[("limit", limit)])
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let envelope: OrdersEnvelope = resp.json().await?;
        tracing::info!(count = envelope.orders.len(), "fetched orders from Shopify");
        Ok(envelope.orders)
    }

    /// Fetch a single order; HTTP 404 maps to `None`.
    pub async fn fetch_order_by_id(&self, order_id: &str) -> AppResult<Option<ShopifyOrder>> {
        let resp = self
            .http
            .get(format!("{}/orders/{order_id}.json", self.api_url))
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let resp = check_status(resp).await?;
        let envelope: OrderEnvelope = resp.json().await?;
        Ok(envelope.order)
    }

    pub async fn test_connection(&self) -> bool {
        let result = self
            .http
            .get(format!("{}/shop.json", self.api_url))
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<ShopEnvelope>().await {
                Ok(envelope) => {
                    tracing::info!(shop = %envelope.shop.name, "connected to Shopify store");
                    true
                }
                Err(err) => {
                    tracing::error!(error = %err, "unexpected shop.json payload");
                    false
                }
            },
            Ok(resp) => {
                tracing::error!(status = %resp.status(), "failed to connect to Shopify");
                false
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to connect to Shopify");
                false
            }
        }
    }
}

async fn check_status(resp: reqwest::Response) -> AppResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp.text().await.unwrap_or_default();
    Err(AppError::Upstream { status, message })
}
