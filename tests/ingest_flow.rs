use printflow_api::{
    db::DbPool,
    dto::{
        products::PlateRequirement,
        shopify::{LineItemProperty, ShopifyCustomer, ShopifyLineItem, ShopifyOrder},
    },
    models::{Customer, Order, OrderItem},
    services::order_service::{self, IngestOutcome},
};
use sqlx::sqlite::SqlitePoolOptions;

async fn test_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

async fn seed_product(pool: &DbPool, sku: &str, name: &str, plate_names: &[&str]) -> i64 {
    let product_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO products (sku, product_name, category, number_of_printing_plates, box_size)
        VALUES (?, ?, 'Test', ?, 'Medium')
        RETURNING product_id
        "#,
    )
    .bind(sku)
    .bind(name)
    .bind(plate_names.len() as i64)
    .fetch_one(pool)
    .await
    .expect("seed product");

    for (i, plate_name) in plate_names.iter().enumerate() {
        sqlx::query(
            "INSERT INTO product_plates (product_id, plate_order, plate_name) VALUES (?, ?, ?)",
        )
        .bind(product_id)
        .bind((i + 1) as i64)
        .bind(plate_name)
        .execute(pool)
        .await
        .expect("seed plate slot");
    }

    product_id
}

fn line_item(
    sku: Option<&str>,
    title: &str,
    quantity: i64,
    properties: &[(&str, &str)],
) -> ShopifyLineItem {
    ShopifyLineItem {
        title: title.to_string(),
        quantity,
        price: "149.00".to_string(),
        sku: sku.map(str::to_string),
        variant_title: None,
        properties: properties
            .iter()
            .map(|(name, value)| LineItemProperty {
                name: name.to_string(),
                value: serde_json::Value::String(value.to_string()),
            })
            .collect(),
    }
}

fn shopify_order(id: i64, email: Option<&str>, line_items: Vec<ShopifyLineItem>) -> ShopifyOrder {
    ShopifyOrder {
        id,
        order_number: id,
        total_price: "298.00".to_string(),
        financial_status: Some("paid".to_string()),
        created_at: None,
        customer: email.map(|email| ShopifyCustomer {
            first_name: Some("Test".to_string()),
            last_name: Some("Customer".to_string()),
            email: Some(email.to_string()),
        }),
        line_items,
    }
}

async fn count(pool: &DbPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count")
}

async fn item_product_id(pool: &DbPool, order_id: i64) -> Option<i64> {
    sqlx::query_scalar::<_, Option<i64>>("SELECT product_id FROM order_items WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(pool)
        .await
        .expect("order item product")
}

// Order 1001: one BB0001 line at quantity 2. Plate count follows the
// product's slots, not the quantity.
#[tokio::test]
async fn battlebox_order_creates_one_plate_per_slot() -> anyhow::Result<()> {
    let pool = test_pool().await;
    seed_product(
        &pool,
        "BB0001",
        "The Battlebox (All Variants)",
        &["Base", "Lid", "Dice Rack", "Spacers & Storage"],
    )
    .await;

    let order = shopify_order(
        1001,
        Some("a@example.com"),
        vec![line_item(Some("BB0001"), "The Battlebox", 2, &[])],
    );

    let outcome = order_service::ingest_order(&pool, &order).await?;
    let IngestOutcome::Created(order_id) = outcome else {
        panic!("expected a freshly created order");
    };

    assert_eq!(count(&pool, "orders").await, 1);
    assert_eq!(count(&pool, "customers").await, 1);
    assert_eq!(count(&pool, "order_items").await, 1);
    assert_eq!(count(&pool, "printing_plates").await, 4);

    let order_row = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(order_row.shopify_order_id, "1001");
    assert_eq!(order_row.order_status, "paid");
    assert_eq!(order_row.total_price, 298.0);
    assert_eq!(order_row.completed_at, None);

    let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE email = ?")
        .bind("a@example.com")
        .fetch_one(&pool)
        .await?;
    assert_eq!(customer.name, "Test Customer");
    assert_eq!(customer.number_of_orders, 1);
    assert_eq!(order_row.customer_id, Some(customer.customer_id));

    let item = sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(item.quantity, 2);
    assert_eq!(item.sku.as_deref(), Some("BB0001"));
    assert!(item.product_id.is_some());

    let plates = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT pp.plate_type, pp.status
        FROM printing_plates pp
        JOIN order_items oi ON pp.order_item_id = oi.order_item_id
        WHERE oi.order_id = ?
        ORDER BY pp.plate_id
        "#,
    )
    .bind(order_id)
    .fetch_all(&pool)
    .await?;

    let types: Vec<&str> = plates.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(types, ["Base", "Lid", "Dice Rack", "Spacers & Storage"]);
    assert!(plates.iter().all(|(_, status)| status == "In Queue"));

    Ok(())
}

// Re-ingesting the same Shopify order is a no-op even when the caller skips
// the exists pre-check: the unique constraint wins and the transaction rolls
// back the customer count bump.
#[tokio::test]
async fn second_ingest_reports_existing_and_writes_nothing() -> anyhow::Result<()> {
    let pool = test_pool().await;
    seed_product(
        &pool,
        "BB0001",
        "The Battlebox (All Variants)",
        &["Base", "Lid", "Dice Rack", "Spacers & Storage"],
    )
    .await;

    let order = shopify_order(
        1001,
        Some("a@example.com"),
        vec![line_item(Some("BB0001"), "The Battlebox", 2, &[])],
    );

    let first = order_service::ingest_order(&pool, &order).await?;
    assert!(matches!(first, IngestOutcome::Created(_)));
    assert!(order_service::order_exists(&pool, "1001").await?);

    let second = order_service::ingest_order(&pool, &order).await?;
    assert_eq!(second, IngestOutcome::AlreadyExists);

    assert_eq!(count(&pool, "orders").await, 1);
    assert_eq!(count(&pool, "order_items").await, 1);
    assert_eq!(count(&pool, "printing_plates").await, 4);

    let number_of_orders =
        sqlx::query_scalar::<_, i64>("SELECT number_of_orders FROM customers WHERE email = ?")
            .bind("a@example.com")
            .fetch_one(&pool)
            .await?;
    assert_eq!(number_of_orders, 1, "rolled-back ingest must not bump the count");

    Ok(())
}

#[tokio::test]
async fn repeat_customer_increments_order_count() -> anyhow::Result<()> {
    let pool = test_pool().await;
    seed_product(&pool, "TOK0001", "Generic token set", &["Tokens", "Storage box"]).await;

    let first = shopify_order(
        2001,
        Some("b@example.com"),
        vec![line_item(Some("TOK0001"), "Generic token set", 1, &[])],
    );
    let second = shopify_order(
        2002,
        Some("b@example.com"),
        vec![line_item(Some("TOK0001"), "Generic token set", 1, &[])],
    );

    order_service::ingest_order(&pool, &first).await?;
    order_service::ingest_order(&pool, &second).await?;

    assert_eq!(count(&pool, "customers").await, 1);
    let number_of_orders =
        sqlx::query_scalar::<_, i64>("SELECT number_of_orders FROM customers WHERE email = ?")
            .bind("b@example.com")
            .fetch_one(&pool)
            .await?;
    assert_eq!(number_of_orders, 2);

    Ok(())
}

#[tokio::test]
async fn wound_marker_sku_resolves_by_variant_details() -> anyhow::Result<()> {
    let pool = test_pool().await;
    let default_id = seed_product(
        &pool,
        "TK030",
        "Wound Markers & Damage Counters",
        &["Base tokens", "Dice holders", "Storage box"],
    )
    .await;

    let combos = [
        ("12mm", "XL pack", "12mm Wound marker XL set", "TK030_12MM_XL"),
        ("12mm", "Combo pack", "12mm Wound marker combo", "TK030_12MM_COMBO"),
        ("16mm", "XL pack", "16mm Wound marker XL set", "TK030_16MM_XL"),
        ("16mm", "Combo pack", "16mm Wound marker combo", "TK030_16MM_COMBO"),
    ];

    let mut expected_ids = Vec::new();
    for (_, _, name, sku) in &combos {
        expected_ids.push(seed_product(&pool, sku, name, &["Base tokens", "Dice holders", "Storage box"]).await);
    }

    for (i, (size, pack, _, _)) in combos.into_iter().enumerate() {
        let order = shopify_order(
            3000 + i as i64,
            None,
            vec![line_item(
                Some("TK030"),
                "Wound Markers",
                1,
                &[("Dice size", size), ("Type", pack)],
            )],
        );
        let IngestOutcome::Created(order_id) = order_service::ingest_order(&pool, &order).await?
        else {
            panic!("expected created order");
        };

        assert_eq!(
            item_product_id(&pool, order_id).await,
            Some(expected_ids[i]),
            "combo {size}/{pack} should hit its own product"
        );
    }

    let resolved: std::collections::HashSet<_> = expected_ids.iter().collect();
    assert_eq!(resolved.len(), 4, "all four combos map to distinct products");

    // A combination with no catalog entry keeps the SKU's default product.
    let order = shopify_order(
        3999,
        None,
        vec![line_item(
            Some("TK030"),
            "Wound Markers",
            1,
            &[("Dice size", "20mm"), ("Type", "XL pack")],
        )],
    );
    let IngestOutcome::Created(order_id) = order_service::ingest_order(&pool, &order).await? else {
        panic!("expected created order");
    };
    assert_eq!(item_product_id(&pool, order_id).await, Some(default_id));

    Ok(())
}

#[tokio::test]
async fn deployment_zone_title_fallback_prefers_matching_variant() -> anyhow::Result<()> {
    let pool = test_pool().await;
    let single_id = seed_product(
        &pool,
        "DEPLOYMENT002",
        "Deployment Zone Markers | Single set",
        &["Markers", "Storage box"],
    )
    .await;
    let double_id = seed_product(
        &pool,
        "DEPLOYMENT001",
        "Deployment Zone Markers w/ Magnetic Box | Double set",
        &["First set markers", "Second set markers", "Storage box"],
    )
    .await;

    let double_order = shopify_order(
        4001,
        None,
        vec![line_item(None, "Deployment Zone markers - DOUBLE pack", 1, &[])],
    );
    let IngestOutcome::Created(order_id) =
        order_service::ingest_order(&pool, &double_order).await?
    else {
        panic!("expected created order");
    };
    assert_eq!(item_product_id(&pool, order_id).await, Some(double_id));

    let single_order = shopify_order(
        4002,
        None,
        vec![line_item(None, "Deployment zone markers", 1, &[])],
    );
    let IngestOutcome::Created(order_id) =
        order_service::ingest_order(&pool, &single_order).await?
    else {
        panic!("expected created order");
    };
    assert_eq!(item_product_id(&pool, order_id).await, Some(single_id));

    Ok(())
}

#[tokio::test]
async fn unknown_sku_falls_back_to_two_generic_plates() -> anyhow::Result<()> {
    let pool = test_pool().await;

    let order = shopify_order(
        5001,
        None,
        vec![line_item(Some("NOPE999"), "Mystery product", 3, &[])],
    );
    let IngestOutcome::Created(order_id) = order_service::ingest_order(&pool, &order).await? else {
        panic!("expected created order");
    };

    assert_eq!(item_product_id(&pool, order_id).await, None);

    let plate_types = sqlx::query_scalar::<_, String>(
        r#"
        SELECT pp.plate_type
        FROM printing_plates pp
        JOIN order_items oi ON pp.order_item_id = oi.order_item_id
        WHERE oi.order_id = ?
        ORDER BY pp.plate_id
        "#,
    )
    .bind(order_id)
    .fetch_all(&pool)
    .await?;
    assert_eq!(plate_types, ["Plate", "Plate"]);

    Ok(())
}

// A SKU with a declared plate count but no recorded slot names gets
// numbered generic plates.
#[tokio::test]
async fn missing_slots_fall_back_to_declared_count() -> anyhow::Result<()> {
    let pool = test_pool().await;
    sqlx::query(
        r#"
        INSERT INTO products (sku, product_name, category, number_of_printing_plates, box_size)
        VALUES ('ACC200', 'Slotless accessory', 'Accessories', 3, 'Small')
        "#,
    )
    .execute(&pool)
    .await?;

    let order = shopify_order(
        5002,
        None,
        vec![line_item(Some("ACC200"), "Slotless accessory", 1, &[])],
    );
    let IngestOutcome::Created(order_id) = order_service::ingest_order(&pool, &order).await? else {
        panic!("expected created order");
    };

    let plate_types = sqlx::query_scalar::<_, String>(
        r#"
        SELECT pp.plate_type
        FROM printing_plates pp
        JOIN order_items oi ON pp.order_item_id = oi.order_item_id
        WHERE oi.order_id = ?
        ORDER BY pp.plate_id
        "#,
    )
    .bind(order_id)
    .fetch_all(&pool)
    .await?;
    assert_eq!(plate_types, ["Plate 1", "Plate 2", "Plate 3"]);

    Ok(())
}

#[tokio::test]
async fn guest_order_ingests_without_customer() -> anyhow::Result<()> {
    let pool = test_pool().await;
    seed_product(&pool, "TOK0001", "Generic token set", &["Tokens", "Storage box"]).await;

    let order = shopify_order(
        6001,
        None,
        vec![line_item(Some("TOK0001"), "Generic token set", 1, &[])],
    );
    let IngestOutcome::Created(order_id) = order_service::ingest_order(&pool, &order).await? else {
        panic!("expected created order");
    };

    assert_eq!(count(&pool, "customers").await, 0);
    let customer_id =
        sqlx::query_scalar::<_, Option<i64>>("SELECT customer_id FROM orders WHERE order_id = ?")
            .bind(order_id)
            .fetch_one(&pool)
            .await?;
    assert_eq!(customer_id, None);

    Ok(())
}

// Platform bookkeeping properties never reach the stored encoding, and the
// encoding round-trips.
#[tokio::test]
async fn variant_details_exclude_internal_properties() -> anyhow::Result<()> {
    let pool = test_pool().await;
    seed_product(&pool, "TOK0001", "Generic token set", &["Tokens", "Storage box"]).await;

    let order = shopify_order(
        7001,
        None,
        vec![line_item(
            Some("TOK0001"),
            "Generic token set",
            1,
            &[("_mws_tracking", "abc123"), ("Color", "Red"), ("Label", "Alpha")],
        )],
    );
    let IngestOutcome::Created(order_id) = order_service::ingest_order(&pool, &order).await? else {
        panic!("expected created order");
    };

    let stored = sqlx::query_scalar::<_, String>(
        "SELECT variant_details FROM order_items WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_one(&pool)
    .await?;
    assert_eq!(stored, "Color: Red|Label: Alpha");

    let parsed = printflow_api::models::VariantDetails::parse(&stored);
    assert_eq!(parsed.encode(), stored);
    assert_eq!(parsed.properties().len(), 2);

    Ok(())
}

#[test]
fn wound_marker_mapping_table() {
    use printflow_api::services::order_service::wound_marker_target;

    assert_eq!(
        wound_marker_target("dice size: 12mm|type: xl pack"),
        Some("12mm Wound marker XL set")
    );
    assert_eq!(
        wound_marker_target("dice size: 12mm|type: combo pack"),
        Some("12mm Wound marker combo")
    );
    assert_eq!(
        wound_marker_target("dice size: 16mm|type: xl pack"),
        Some("16mm Wound marker XL set")
    );
    assert_eq!(
        wound_marker_target("dice size: 16mm|type: combo pack"),
        Some("16mm Wound marker combo")
    );

    assert_eq!(wound_marker_target("dice size: 20mm|type: xl pack"), None);
    assert_eq!(wound_marker_target("dice size: 12mm"), None);
    assert_eq!(wound_marker_target(""), None);
}

#[test]
fn deployment_candidate_prefers_named_variant() {
    use printflow_api::services::order_service::pick_deployment_candidate;

    let requirement = |id: i64, name: &str| PlateRequirement {
        product_id: id,
        product_name: name.to_string(),
        number_of_printing_plates: 3,
    };
    let candidates = vec![
        requirement(1, "Deployment Zone Markers | Single set"),
        requirement(2, "Deployment Zone Markers | Double set"),
    ];

    let double = pick_deployment_candidate(&candidates, "Deployment Zone DOUBLE pack");
    assert_eq!(double.map(|c| c.product_id), Some(2));

    let single = pick_deployment_candidate(&candidates, "Deployment Zone markers");
    assert_eq!(single.map(|c| c.product_id), Some(1));

    // Neither variant named: the first candidate wins.
    let unnamed = vec![requirement(7, "Deployment Zone classic")];
    let fallback = pick_deployment_candidate(&unnamed, "Deployment Zone markers");
    assert_eq!(fallback.map(|c| c.product_id), Some(7));

    assert!(pick_deployment_candidate(&[], "Deployment Zone markers").is_none());
}
