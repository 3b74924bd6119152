use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::shopify::{ConnectionStatus, FetchOrdersRequest, FetchResults, ShopifyOrder},
    error::{AppError, AppResult},
    response::ApiResponse,
    services::order_service::{self, IngestOutcome},
    state::AppState,
};

const DEFAULT_FETCH_LIMIT: u32 = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fetch-orders", post(fetch_orders))
        .route("/test-connection", get(test_connection))
        .route("/orders/{shopify_order_id}", get(get_shopify_order))
}

#[utoipa::path(
    post,
    path = "/api/shopify/fetch-orders",
    request_body = FetchOrdersRequest,
    responses(
        (status = 200, description = "Fetch orders from Shopify and ingest the new ones", body = ApiResponse<FetchResults>),
        (status = 502, description = "Shopify API failure"),
    ),
    tag = "Shopify"
)]
pub async fn fetch_orders(
    State(state): State<AppState>,
    payload: Option<Json<FetchOrdersRequest>>,
) -> AppResult<Json<ApiResponse<FetchResults>>> {
    let limit = payload
        .and_then(|Json(body)| body.limit)
        .unwrap_or(DEFAULT_FETCH_LIMIT);

    tracing::info!(limit, "starting Shopify order fetch and save");
    let shopify_orders = state.shopify.fetch_orders(limit).await?;

    if shopify_orders.is_empty() {
        return Ok(Json(ApiResponse::message_only(
            "No orders found in your Shopify store",
        )));
    }

    let mut results = FetchResults::default();
    for shopify_order in &shopify_orders {
        match ingest_one(&state, shopify_order).await {
            Ok(IngestOutcome::Created(_)) => results.new_orders += 1,
            Ok(IngestOutcome::AlreadyExists) => results.existing_orders += 1,
            Err(err) => {
                tracing::error!(
                    shopify_order_id = shopify_order.id,
                    error = %err,
                    "failed to ingest order"
                );
                results.errors += 1;
            }
        }
    }

    let message = format!(
        "Processed {} orders: {} new, {} existing, {} errors",
        shopify_orders.len(),
        results.new_orders,
        results.existing_orders,
        results.errors
    );
    Ok(Json(ApiResponse::success(message, results)))
}

async fn ingest_one(state: &AppState, shopify_order: &ShopifyOrder) -> AppResult<IngestOutcome> {
    // Fast path; the unique constraint on the order insert remains the
    // authoritative duplicate check.
    if order_service::order_exists(&state.pool, &shopify_order.id.to_string()).await? {
        return Ok(IngestOutcome::AlreadyExists);
    }

    order_service::ingest_order(&state.pool, shopify_order).await
}

#[utoipa::path(
    get,
    path = "/api/shopify/test-connection",
    responses(
        (status = 200, description = "Connected to Shopify", body = ApiResponse<ConnectionStatus>),
        (status = 500, description = "Connection failed", body = ApiResponse<ConnectionStatus>),
    ),
    tag = "Shopify"
)]
pub async fn test_connection(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<ConnectionStatus>>) {
    let connected = state.shopify.test_connection().await;

    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let message = if connected {
        "Successfully connected to Shopify"
    } else {
        "Failed to connect to Shopify"
    };

    let body = ApiResponse {
        success: connected,
        data: Some(ConnectionStatus { connected }),
        error: None,
        message: message.to_string(),
    };

    (status, Json(body))
}

#[utoipa::path(
    get,
    path = "/api/shopify/orders/{shopify_order_id}",
    params(
        ("shopify_order_id" = String, Path, description = "Shopify order ID")
    ),
    responses(
        (status = 200, description = "The order as Shopify returns it", body = ApiResponse<ShopifyOrder>),
        (status = 404, description = "Order not found in Shopify"),
        (status = 502, description = "Shopify API failure"),
    ),
    tag = "Shopify"
)]
pub async fn get_shopify_order(
    State(state): State<AppState>,
    Path(shopify_order_id): Path<String>,
) -> AppResult<Json<ApiResponse<ShopifyOrder>>> {
    let order = state.shopify.fetch_order_by_id(&shopify_order_id).await?;
    let order = match order {
        Some(order) => order,
        None => return Err(AppError::NotFound),
    };

    let message = format!("Found order {shopify_order_id}");
    Ok(Json(ApiResponse::success(message, order)))
}
