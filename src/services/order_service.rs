use sqlx::{Sqlite, Transaction};

use crate::{
    db::DbPool,
    dto::{
        orders::{OrderItemDetail, OrderSummary},
        products::PlateRequirement,
        shopify::{ShopifyCustomer, ShopifyLineItem, ShopifyOrder},
    },
    error::{AppError, AppResult},
    services::{catalog_service, printing_service},
};

/// SKU that covers several wound-marker products; the customization
/// properties decide which one was actually ordered.
const WOUND_MARKER_SKU: &str = "TK030";

/// Deployment Zone sets arrive without a SKU and are matched by title.
const DEPLOYMENT_ZONE_MARKER: &str = "deployment zone";

#[derive(Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    Created(i64),
    AlreadyExists,
}

#[derive(Debug)]
pub struct LineItemResolution {
    pub product_id: Option<i64>,
    pub plate_types: Vec<String>,
}

impl Default for LineItemResolution {
    fn default() -> Self {
        Self {
            product_id: None,
            plate_types: vec!["Plate".to_string(), "Plate".to_string()],
        }
    }
}

pub async fn order_exists(pool: &DbPool, shopify_order_id: &str) -> AppResult<bool> {
    let row = sqlx::query_scalar::<_, i64>("SELECT order_id FROM orders WHERE shopify_order_id = ?")
        .bind(shopify_order_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Ingest one external order: customer, order row, line items and their
/// printing plates, all inside a single transaction. The UNIQUE constraint
/// on `shopify_order_id` is the authoritative duplicate signal, so two
/// concurrent ingestions of the same order cannot both commit.
pub async fn ingest_order(pool: &DbPool, shopify_order: &ShopifyOrder) -> AppResult<IngestOutcome> {
    let mut txn = pool.begin().await?;

    let customer_id = upsert_customer(&mut txn, shopify_order.customer.as_ref()).await?;

    let total_price: f64 = shopify_order.total_price.parse().unwrap_or_default();
    let order_status = shopify_order
        .financial_status
        .clone()
        .unwrap_or_else(|| "unknown".to_string());

    let inserted = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO orders (shopify_order_id, customer_id, order_status, total_price)
        VALUES (?, ?, ?, ?)
        RETURNING order_id
        "#,
    )
    .bind(shopify_order.id.to_string())
    .bind(customer_id)
    .bind(&order_status)
    .bind(total_price)
    .fetch_one(&mut *txn)
    .await;

    let order_id = match inserted {
        Ok(id) => id,
        Err(err) if is_unique_violation(&err) => {
            txn.rollback().await?;
            tracing::info!(
                shopify_order_id = shopify_order.id,
                "order already ingested, skipping"
            );
            return Ok(IngestOutcome::AlreadyExists);
        }
        Err(err) => return Err(err.into()),
    };

    for item in &shopify_order.line_items {
        let resolution = match resolve_line_item(&mut txn, item).await {
            Ok(resolution) => resolution,
            Err(err) => {
                tracing::warn!(
                    sku = ?item.sku,
                    title = %item.title,
                    error = %err,
                    "line item resolution failed, using default plates"
                );
                LineItemResolution::default()
            }
        };

        let order_item_id =
            insert_order_item(&mut txn, order_id, customer_id, item, resolution.product_id).await?;
        printing_service::create_for_order_item(&mut txn, order_item_id, &resolution.plate_types)
            .await?;
    }

    txn.commit().await?;
    tracing::info!(
        order_id,
        shopify_order_id = shopify_order.id,
        items = shopify_order.line_items.len(),
        "order ingested"
    );

    Ok(IngestOutcome::Created(order_id))
}

async fn upsert_customer(
    txn: &mut Transaction<'_, Sqlite>,
    customer: Option<&ShopifyCustomer>,
) -> AppResult<Option<i64>> {
    // Guest orders and orders without an email get no customer row.
    let Some(customer) = customer else {
        return Ok(None);
    };
    let Some(email) = customer.email.as_deref().filter(|email| !email.is_empty()) else {
        return Ok(None);
    };

    let existing = sqlx::query_as::<_, (i64, i64)>(
        "SELECT customer_id, number_of_orders FROM customers WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(&mut **txn)
    .await?;

    if let Some((customer_id, number_of_orders)) = existing {
        sqlx::query("UPDATE customers SET number_of_orders = number_of_orders + 1 WHERE customer_id = ?")
            .bind(customer_id)
            .execute(&mut **txn)
            .await?;
        tracing::debug!(customer_id, orders = number_of_orders + 1, "updated customer order count");
        return Ok(Some(customer_id));
    }

    let customer_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO customers (name, email, number_of_orders) VALUES (?, ?, 1) RETURNING customer_id",
    )
    .bind(customer.display_name())
    .bind(email)
    .fetch_one(&mut **txn)
    .await?;
    tracing::debug!(customer_id, "new customer created");

    Ok(Some(customer_id))
}

/// Decide which product (if any) a line item refers to and which plate
/// labels to manufacture for it.
async fn resolve_line_item(
    txn: &mut Transaction<'_, Sqlite>,
    item: &ShopifyLineItem,
) -> AppResult<LineItemResolution> {
    if let Some(sku) = item.sku.as_deref().filter(|sku| !sku.is_empty()) {
        let Some(product) = catalog_service::lookup_by_sku(&mut **txn, sku).await? else {
            tracing::warn!(sku, "product not in catalog, using default plates");
            return Ok(LineItemResolution::default());
        };

        let mut product_id = product.product_id;

        if sku == WOUND_MARKER_SKU {
            let details = item.variant_details().encode().to_lowercase();
            if let Some(target_name) = wound_marker_target(&details) {
                if target_name != product.product_name {
                    if let Some(specific) =
                        catalog_service::find_by_exact_name(&mut **txn, target_name).await?
                    {
                        tracing::debug!(
                            sku,
                            details = %details,
                            target = target_name,
                            "wound marker variant mapping"
                        );
                        product_id = specific.product_id;
                    }
                }
            }
        }

        let plate_types =
            plate_types_for_product(txn, product_id, product.number_of_printing_plates).await?;
        return Ok(LineItemResolution {
            product_id: Some(product_id),
            plate_types,
        });
    }

    tracing::warn!(title = %item.title, "line item has no SKU");

    if item.title.to_lowercase().contains(DEPLOYMENT_ZONE_MARKER) {
        let candidates = catalog_service::find_by_name(&mut **txn, "Deployment Zone").await?;
        if let Some(target) = pick_deployment_candidate(&candidates, &item.title) {
            tracing::debug!(
                title = %item.title,
                target = %target.product_name,
                "matched Deployment Zone product by title"
            );
            let plate_types =
                plate_types_for_product(txn, target.product_id, target.number_of_printing_plates)
                    .await?;
            return Ok(LineItemResolution {
                product_id: Some(target.product_id),
                plate_types,
            });
        }
    }

    Ok(LineItemResolution::default())
}

/// Named slots when the product has them, otherwise `Plate 1..Plate N` from
/// the declared count.
async fn plate_types_for_product(
    txn: &mut Transaction<'_, Sqlite>,
    product_id: i64,
    declared_count: i64,
) -> AppResult<Vec<String>> {
    let slots = catalog_service::plate_slots_for(&mut **txn, product_id).await?;
    if !slots.is_empty() {
        return Ok(slots);
    }

    Ok((1..=declared_count).map(|i| format!("Plate {i}")).collect())
}

/// The four concrete wound-marker products hidden behind the shared SKU,
/// keyed on the lowercased variant-details encoding.
pub fn wound_marker_target(details: &str) -> Option<&'static str> {
    if details.contains("dice size: 12mm") && details.contains("type: xl pack") {
        Some("12mm Wound marker XL set")
    } else if details.contains("dice size: 12mm") && details.contains("type: combo pack") {
        Some("12mm Wound marker combo")
    } else if details.contains("dice size: 16mm") && details.contains("type: xl pack") {
        Some("16mm Wound marker XL set")
    } else if details.contains("dice size: 16mm") && details.contains("type: combo pack") {
        Some("16mm Wound marker combo")
    } else {
        None
    }
}

/// Prefer the double variant when the title says "double", else the single
/// variant, else the first candidate.
pub fn pick_deployment_candidate<'a>(
    candidates: &'a [PlateRequirement],
    title: &str,
) -> Option<&'a PlateRequirement> {
    if candidates.is_empty() {
        return None;
    }

    let wanted = if title.to_lowercase().contains("double") {
        "double"
    } else {
        "single"
    };

    candidates
        .iter()
        .find(|candidate| candidate.product_name.to_lowercase().contains(wanted))
        .or_else(|| candidates.first())
}

async fn insert_order_item(
    txn: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    customer_id: Option<i64>,
    item: &ShopifyLineItem,
    product_id: Option<i64>,
) -> AppResult<i64> {
    let price: f64 = item.price.parse().unwrap_or_default();

    let order_item_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO order_items
            (order_id, customer_id, product_id, product_name, quantity, price, variant_title, variant_details, sku)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING order_item_id
        "#,
    )
    .bind(order_id)
    .bind(customer_id)
    .bind(product_id)
    .bind(&item.title)
    .bind(item.quantity)
    .bind(price)
    .bind(item.variant_title.as_deref())
    .bind(item.variant_details().encode())
    .bind(item.sku.as_deref())
    .fetch_one(&mut **txn)
    .await?;

    Ok(order_item_id)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub async fn list_orders(pool: &DbPool) -> AppResult<Vec<OrderSummary>> {
    let orders = sqlx::query_as::<_, OrderSummary>(
        r#"
        SELECT
            o.order_id,
            o.shopify_order_id,
            o.order_status,
            o.total_price,
            o.created_at,
            o.completed_at,
            c.name AS customer_name,
            c.email AS customer_email,
            COUNT(DISTINCT oi.order_item_id) AS item_count,
            COUNT(pp.plate_id) AS total_plates,
            COALESCE(SUM(CASE WHEN pp.status = 'Done' THEN 1 ELSE 0 END), 0) AS plates_done
        FROM orders o
        LEFT JOIN customers c ON o.customer_id = c.customer_id
        LEFT JOIN order_items oi ON oi.order_id = o.order_id
        LEFT JOIN printing_plates pp ON pp.order_item_id = oi.order_item_id
        GROUP BY o.order_id
        ORDER BY o.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn get_order_items(pool: &DbPool, order_id: i64) -> AppResult<Vec<OrderItemDetail>> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT order_id FROM orders WHERE order_id = ?")
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound);
    }

    let items = sqlx::query_as::<_, OrderItemDetail>(
        r#"
        SELECT
            oi.order_item_id,
            oi.order_id,
            oi.product_id,
            oi.product_name,
            oi.quantity,
            oi.price,
            oi.variant_title,
            oi.variant_details,
            oi.sku,
            oi.created_at,
            oi.completed_at,
            c.name AS customer_name,
            COUNT(pp.plate_id) AS total_plates,
            COALESCE(SUM(CASE WHEN pp.status = 'In Queue' THEN 1 ELSE 0 END), 0) AS plates_in_queue,
            COALESCE(SUM(CASE WHEN pp.status = 'In Progress' THEN 1 ELSE 0 END), 0) AS plates_in_progress,
            COALESCE(SUM(CASE WHEN pp.status = 'Printed' THEN 1 ELSE 0 END), 0) AS plates_printed,
            COALESCE(SUM(CASE WHEN pp.status = 'Done' THEN 1 ELSE 0 END), 0) AS plates_done,
            COALESCE(SUM(CASE WHEN pp.status = 'Blocked' THEN 1 ELSE 0 END), 0) AS plates_blocked,
            COALESCE(SUM(CASE WHEN pp.status = 'Reprint' THEN 1 ELSE 0 END), 0) AS plates_reprint
        FROM order_items oi
        LEFT JOIN customers c ON oi.customer_id = c.customer_id
        LEFT JOIN printing_plates pp ON oi.order_item_id = pp.order_item_id
        WHERE oi.order_id = ?
        GROUP BY oi.order_item_id
        ORDER BY oi.created_at ASC
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn update_order_status(pool: &DbPool, order_id: i64, status: &str) -> AppResult<()> {
    let result = sqlx::query(
        "UPDATE orders SET order_status = ?, updated_at = CURRENT_TIMESTAMP WHERE order_id = ?",
    )
    .bind(status)
    .bind(order_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(order_id, status, "order status updated");
    Ok(())
}

pub async fn complete_order(pool: &DbPool, order_id: i64) -> AppResult<()> {
    let result = sqlx::query(
        "UPDATE orders SET completed_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP WHERE order_id = ?",
    )
    .bind(order_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(order_id, "order marked as completed");
    Ok(())
}
