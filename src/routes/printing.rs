use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};

use crate::{
    dto::printing::{
        AssemblyReadyItem, MarkDoneResult, PlateStats, PlateStatusSummary, PlateWithContext,
        UpdatePlateStatusRequest,
    },
    error::{AppError, AppResult},
    models::PlateStatus,
    response::ApiResponse,
    services::printing_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plates", get(list_plates))
        .route("/plates/{plate_id}/status", put(update_plate_status))
        .route("/plates/by-status/{status}", get(list_plates_by_status))
        .route("/stats", get(printing_stats))
        .route("/completed-orders", get(list_assembly_ready))
        .route("/order-items/{order_item_id}/mark-done", put(mark_order_item_done))
        .route("/order-items/{order_item_id}/summary", get(order_item_summary))
}

fn parse_id(raw: &str, label: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("{label} must be a number")))
}

fn parse_status(raw: &str) -> AppResult<PlateStatus> {
    PlateStatus::from_str(raw).map_err(|_| {
        AppError::BadRequest(format!(
            "Status must be one of: {}",
            PlateStatus::valid_values()
        ))
    })
}

#[utoipa::path(
    get,
    path = "/api/printing/plates",
    responses(
        (status = 200, description = "Plates currently in the printing workflow", body = ApiResponse<Vec<PlateWithContext>>),
    ),
    tag = "Printing"
)]
pub async fn list_plates(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PlateWithContext>>>> {
    let plates = printing_service::list_active(&state.pool).await?;
    let message = format!("Found {} printing plates", plates.len());
    Ok(Json(ApiResponse::success(message, plates)))
}

#[utoipa::path(
    put,
    path = "/api/printing/plates/{plate_id}/status",
    params(
        ("plate_id" = i64, Path, description = "Plate ID")
    ),
    request_body = UpdatePlateStatusRequest,
    responses(
        (status = 200, description = "Plate status updated"),
        (status = 400, description = "Invalid plate ID or status value"),
        (status = 404, description = "Plate not found"),
    ),
    tag = "Printing"
)]
pub async fn update_plate_status(
    State(state): State<AppState>,
    Path(plate_id): Path<String>,
    Json(payload): Json<UpdatePlateStatusRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let plate_id = parse_id(&plate_id, "Plate ID")?;
    let status = parse_status(&payload.status)?;

    printing_service::update_status(&state.pool, plate_id, status).await?;

    let message = format!("Printing plate {plate_id} status updated to: {status}");
    Ok(Json(ApiResponse::message_only(message)))
}

#[utoipa::path(
    get,
    path = "/api/printing/plates/by-status/{status}",
    params(
        ("status" = String, Path, description = "Plate status to filter by")
    ),
    responses(
        (status = 200, description = "Plates with the given status", body = ApiResponse<Vec<PlateWithContext>>),
        (status = 400, description = "Invalid status value"),
    ),
    tag = "Printing"
)]
pub async fn list_plates_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<PlateWithContext>>>> {
    let status = parse_status(&status)?;
    let plates = printing_service::list_by_status(&state.pool, status).await?;
    let message = format!("Found {} printing plates with status: {status}", plates.len());
    Ok(Json(ApiResponse::success(message, plates)))
}

#[utoipa::path(
    get,
    path = "/api/printing/stats",
    responses(
        (status = 200, description = "Plate counts per status", body = ApiResponse<PlateStats>),
    ),
    tag = "Printing"
)]
pub async fn printing_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<PlateStats>>> {
    let stats = printing_service::stats(&state.pool).await?;
    Ok(Json(ApiResponse::success(
        "Printing statistics retrieved successfully",
        stats,
    )))
}

#[utoipa::path(
    get,
    path = "/api/printing/completed-orders",
    responses(
        (status = 200, description = "Line items ready for assembly", body = ApiResponse<Vec<AssemblyReadyItem>>),
    ),
    tag = "Printing"
)]
pub async fn list_assembly_ready(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<AssemblyReadyItem>>>> {
    let items = printing_service::list_assembly_ready(&state.pool).await?;
    let message = format!("Found {} completed order items", items.len());
    Ok(Json(ApiResponse::success(message, items)))
}

#[utoipa::path(
    put,
    path = "/api/printing/order-items/{order_item_id}/mark-done",
    params(
        ("order_item_id" = i64, Path, description = "Order item ID")
    ),
    responses(
        (status = 200, description = "All plates for the line item marked Done", body = ApiResponse<MarkDoneResult>),
        (status = 400, description = "Invalid order item ID"),
        (status = 404, description = "No plates found for the line item"),
    ),
    tag = "Printing"
)]
pub async fn mark_order_item_done(
    State(state): State<AppState>,
    Path(order_item_id): Path<String>,
) -> AppResult<Json<ApiResponse<MarkDoneResult>>> {
    let order_item_id = parse_id(&order_item_id, "Order item ID")?;

    let updated = printing_service::mark_order_item_done(&state.pool, order_item_id).await?;
    if updated == 0 {
        return Err(AppError::NotFound);
    }

    let message = format!("Marked {updated} plates as \"Done\" for order item {order_item_id}");
    Ok(Json(ApiResponse::success(
        message,
        MarkDoneResult {
            updated_plates: updated,
        },
    )))
}

#[utoipa::path(
    get,
    path = "/api/printing/order-items/{order_item_id}/summary",
    params(
        ("order_item_id" = i64, Path, description = "Order item ID")
    ),
    responses(
        (status = 200, description = "Per-status plate counts for the line item", body = ApiResponse<PlateStatusSummary>),
        (status = 400, description = "Invalid order item ID"),
    ),
    tag = "Printing"
)]
pub async fn order_item_summary(
    State(state): State<AppState>,
    Path(order_item_id): Path<String>,
) -> AppResult<Json<ApiResponse<PlateStatusSummary>>> {
    let order_item_id = parse_id(&order_item_id, "Order item ID")?;
    let summary = printing_service::status_summary(&state.pool, order_item_id).await?;
    Ok(Json(ApiResponse::success(
        format!("Plate summary for order item {order_item_id}"),
        summary,
    )))
}
