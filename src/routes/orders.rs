use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};

use crate::{
    dto::orders::{OrderItemDetail, OrderSummary, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/{order_id}/items", get(get_order_items))
        .route("/{order_id}/status", put(update_order_status))
        .route("/{order_id}/complete", post(complete_order))
}

fn parse_order_id(raw: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Order ID must be a number".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "All orders with fulfillment progress", body = ApiResponse<Vec<OrderSummary>>),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<OrderSummary>>>> {
    let orders = order_service::list_orders(&state.pool).await?;
    let message = format!("Found {} orders", orders.len());
    Ok(Json(ApiResponse::success(message, orders)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{order_id}/items",
    params(
        ("order_id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Line items with plate status breakdown", body = ApiResponse<Vec<OrderItemDetail>>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order_items(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<OrderItemDetail>>>> {
    let order_id = parse_order_id(&order_id)?;
    let items = order_service::get_order_items(&state.pool, order_id).await?;
    let message = format!("Found {} items for order {order_id}", items.len());
    Ok(Json(ApiResponse::success(message, items)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{order_id}/status",
    params(
        ("order_id" = i64, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated"),
        (status = 400, description = "Invalid order ID or status"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let order_id = parse_order_id(&order_id)?;
    if payload.status.is_empty() {
        return Err(AppError::BadRequest(
            "Status must be a non-empty string".to_string(),
        ));
    }

    order_service::update_order_status(&state.pool, order_id, &payload.status).await?;

    let message = format!("Order {order_id} status updated to: {}", payload.status);
    Ok(Json(ApiResponse::message_only(message)))
}

#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/complete",
    params(
        ("order_id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order marked as completed"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn complete_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let order_id = parse_order_id(&order_id)?;
    order_service::complete_order(&state.pool, order_id).await?;

    let message = format!("Order {order_id} marked as completed");
    Ok(Json(ApiResponse::message_only(message)))
}
