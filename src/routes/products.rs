use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::products::ProductWithPlates,
    error::{AppError, AppResult},
    models::Product,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{product_id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "The product catalog", body = ApiResponse<Vec<Product>>),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = catalog_service::list_products(&state.pool).await?;
    let message = format!("Found {} products", products.len());
    Ok(Json(ApiResponse::success(message, products)))
}

#[utoipa::path(
    get,
    path = "/api/products/{product_id}",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with its plate slots", body = ApiResponse<ProductWithPlates>),
        (status = 400, description = "Invalid product ID"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductWithPlates>>> {
    let product_id: i64 = product_id
        .parse()
        .map_err(|_| AppError::BadRequest("Product ID must be a number".to_string()))?;

    let product = catalog_service::get_product_with_plates(&state.pool, product_id).await?;
    Ok(Json(ApiResponse::success("Product", product)))
}
