use sqlx::SqliteExecutor;

use crate::{
    db::DbPool,
    dto::products::{PlateRequirement, ProductWithPlates},
    error::{AppError, AppResult},
    models::Product,
};

pub async fn lookup_by_sku<'e>(
    db: impl SqliteExecutor<'e>,
    sku: &str,
) -> AppResult<Option<PlateRequirement>> {
    let row = sqlx::query_as::<_, PlateRequirement>(
        "SELECT product_id, product_name, number_of_printing_plates FROM products WHERE sku = ?",
    )
    .bind(sku)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Slot names for a product, in manufacturing order.
pub async fn plate_slots_for<'e>(
    db: impl SqliteExecutor<'e>,
    product_id: i64,
) -> AppResult<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT plate_name FROM product_plates WHERE product_id = ? ORDER BY plate_order ASC",
    )
    .bind(product_id)
    .fetch_all(db)
    .await?;

    Ok(names)
}

pub async fn find_by_exact_name<'e>(
    db: impl SqliteExecutor<'e>,
    name: &str,
) -> AppResult<Option<PlateRequirement>> {
    let row = sqlx::query_as::<_, PlateRequirement>(
        "SELECT product_id, product_name, number_of_printing_plates FROM products WHERE product_name = ?",
    )
    .bind(name)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn find_by_name<'e>(
    db: impl SqliteExecutor<'e>,
    fragment: &str,
) -> AppResult<Vec<PlateRequirement>> {
    let pattern = format!("%{fragment}%");
    let rows = sqlx::query_as::<_, PlateRequirement>(
        "SELECT product_id, product_name, number_of_printing_plates FROM products WHERE product_name LIKE ?",
    )
    .bind(pattern)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_products(pool: &DbPool) -> AppResult<Vec<Product>> {
    let products =
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY product_name ASC")
            .fetch_all(pool)
            .await?;

    Ok(products)
}

pub async fn get_product_with_plates(pool: &DbPool, product_id: i64) -> AppResult<ProductWithPlates> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE product_id = ?")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let plate_names = plate_slots_for(pool, product.product_id).await?;

    Ok(ProductWithPlates {
        product,
        plate_names,
    })
}
