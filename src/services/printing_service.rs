use sqlx::{Sqlite, Transaction};

use crate::{
    db::DbPool,
    dto::printing::{AssemblyReadyItem, PlateStats, PlateStatusSummary, PlateWithContext},
    error::{AppError, AppResult},
    models::PlateStatus,
};

const PLATE_CONTEXT_SELECT: &str = r#"
SELECT
    pp.plate_id,
    pp.order_item_id,
    pp.plate_type,
    pp.status,
    pp.created_at,
    pp.updated_at,
    COALESCE(p.product_name, oi.product_name) AS product_name,
    oi.quantity,
    oi.variant_details,
    oi.sku,
    o.shopify_order_id,
    o.order_id,
    c.name AS customer_name,
    c.email AS customer_email
FROM printing_plates pp
LEFT JOIN order_items oi ON pp.order_item_id = oi.order_item_id
LEFT JOIN orders o ON oi.order_id = o.order_id
LEFT JOIN customers c ON oi.customer_id = c.customer_id
LEFT JOIN products p ON oi.product_id = p.product_id
"#;

/// Bulk-create the plates for a freshly ingested line item, one row per
/// label, all starting in the queue.
pub async fn create_for_order_item(
    txn: &mut Transaction<'_, Sqlite>,
    order_item_id: i64,
    plate_types: &[String],
) -> AppResult<()> {
    for plate_type in plate_types {
        sqlx::query("INSERT INTO printing_plates (order_item_id, plate_type, status) VALUES (?, ?, ?)")
            .bind(order_item_id)
            .bind(plate_type)
            .bind(PlateStatus::InQueue)
            .execute(&mut **txn)
            .await?;
    }

    tracing::debug!(
        order_item_id,
        count = plate_types.len(),
        "printing plates created"
    );
    Ok(())
}

/// Move a plate to any status. `Done` additionally stamps the completion
/// time; no other transition touches it.
pub async fn update_status(pool: &DbPool, plate_id: i64, status: PlateStatus) -> AppResult<()> {
    let sql = if status == PlateStatus::Done {
        "UPDATE printing_plates SET status = ?, updated_at = CURRENT_TIMESTAMP, completed_at = CURRENT_TIMESTAMP WHERE plate_id = ?"
    } else {
        "UPDATE printing_plates SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE plate_id = ?"
    };

    let result = sqlx::query(sql)
        .bind(status)
        .bind(plate_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(plate_id, status = %status, "plate status updated");
    Ok(())
}

/// Plates still being worked on, with order context for the printing view.
pub async fn list_active(pool: &DbPool) -> AppResult<Vec<PlateWithContext>> {
    let sql = format!("{PLATE_CONTEXT_SELECT} WHERE pp.status IN (?, ?, ?) ORDER BY pp.created_at ASC");
    let [a, b, c] = PlateStatus::ACTIVE;

    let plates = sqlx::query_as::<_, PlateWithContext>(&sql)
        .bind(a)
        .bind(b)
        .bind(c)
        .fetch_all(pool)
        .await?;

    Ok(plates)
}

pub async fn list_by_status(pool: &DbPool, status: PlateStatus) -> AppResult<Vec<PlateWithContext>> {
    let sql = format!("{PLATE_CONTEXT_SELECT} WHERE pp.status = ? ORDER BY pp.created_at ASC");

    let plates = sqlx::query_as::<_, PlateWithContext>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;

    Ok(plates)
}

pub async fn stats(pool: &DbPool) -> AppResult<PlateStats> {
    let stats = sqlx::query_as::<_, PlateStats>(
        r#"
        SELECT
            COUNT(*) AS total_plates,
            COALESCE(SUM(CASE WHEN status = 'In Queue' THEN 1 ELSE 0 END), 0) AS in_queue,
            COALESCE(SUM(CASE WHEN status = 'In Progress' THEN 1 ELSE 0 END), 0) AS in_progress,
            COALESCE(SUM(CASE WHEN status = 'Printed' THEN 1 ELSE 0 END), 0) AS printed,
            COALESCE(SUM(CASE WHEN status = 'Done' THEN 1 ELSE 0 END), 0) AS done,
            COALESCE(SUM(CASE WHEN status = 'Blocked' THEN 1 ELSE 0 END), 0) AS blocked,
            COALESCE(SUM(CASE WHEN status = 'Reprint' THEN 1 ELSE 0 END), 0) AS reprint
        FROM printing_plates
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

pub async fn status_summary(pool: &DbPool, order_item_id: i64) -> AppResult<PlateStatusSummary> {
    let summary = sqlx::query_as::<_, PlateStatusSummary>(
        r#"
        SELECT
            COUNT(*) AS total_plates,
            COALESCE(SUM(CASE WHEN status = 'In Queue' THEN 1 ELSE 0 END), 0) AS plates_in_queue,
            COALESCE(SUM(CASE WHEN status = 'In Progress' THEN 1 ELSE 0 END), 0) AS plates_in_progress,
            COALESCE(SUM(CASE WHEN status = 'Printed' THEN 1 ELSE 0 END), 0) AS plates_printed,
            COALESCE(SUM(CASE WHEN status = 'Done' THEN 1 ELSE 0 END), 0) AS plates_done,
            COALESCE(SUM(CASE WHEN status = 'Blocked' THEN 1 ELSE 0 END), 0) AS plates_blocked,
            COALESCE(SUM(CASE WHEN status = 'Reprint' THEN 1 ELSE 0 END), 0) AS plates_reprint
        FROM printing_plates
        WHERE order_item_id = ?
        "#,
    )
    .bind(order_item_id)
    .fetch_one(pool)
    .await?;

    Ok(summary)
}

/// Line items where every plate has been printed and assembly can start.
/// Items with no plates at all are excluded.
pub async fn list_assembly_ready(pool: &DbPool) -> AppResult<Vec<AssemblyReadyItem>> {
    let items = sqlx::query_as::<_, AssemblyReadyItem>(
        r#"
        SELECT
            oi.order_item_id,
            COALESCE(p.product_name, oi.product_name) AS product_name,
            oi.quantity,
            oi.variant_details,
            oi.sku,
            oi.created_at,
            o.shopify_order_id,
            o.order_id,
            c.name AS customer_name,
            c.email AS customer_email,
            COUNT(pp.plate_id) AS total_plates,
            COALESCE(SUM(CASE WHEN pp.status = 'Printed' THEN 1 ELSE 0 END), 0) AS printed_plates
        FROM order_items oi
        LEFT JOIN orders o ON oi.order_id = o.order_id
        LEFT JOIN customers c ON oi.customer_id = c.customer_id
        LEFT JOIN products p ON oi.product_id = p.product_id
        LEFT JOIN printing_plates pp ON oi.order_item_id = pp.order_item_id
        GROUP BY oi.order_item_id
        HAVING total_plates > 0 AND total_plates = printed_plates
        ORDER BY oi.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Transition every plate of a line item to `Done` and stamp the line item's
/// completion time, in one transaction. Returns the number of plates
/// updated; 0 means the line item has no plates.
pub async fn mark_order_item_done(pool: &DbPool, order_item_id: i64) -> AppResult<u64> {
    let mut txn = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE printing_plates
        SET status = ?, updated_at = CURRENT_TIMESTAMP, completed_at = CURRENT_TIMESTAMP
        WHERE order_item_id = ?
        "#,
    )
    .bind(PlateStatus::Done)
    .bind(order_item_id)
    .execute(&mut *txn)
    .await?;

    let updated = result.rows_affected();
    if updated == 0 {
        txn.rollback().await?;
        return Ok(0);
    }

    sqlx::query(
        "UPDATE order_items SET completed_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP WHERE order_item_id = ?",
    )
    .bind(order_item_id)
    .execute(&mut *txn)
    .await?;

    txn.commit().await?;
    tracing::info!(order_item_id, plates = updated, "order item marked done");

    Ok(updated)
}
