use printflow_api::db::{DbPool, create_pool};

struct SeedProduct {
    sku: &'static str,
    product_name: &'static str,
    category: &'static str,
    box_size: &'static str,
    plate_names: &'static [&'static str],
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        sku: "BB0001",
        product_name: "The Battlebox (All Variants)",
        category: "Storage",
        box_size: "Large",
        plate_names: &["Base", "Lid", "Dice Rack", "Spacers & Storage"],
    },
    SeedProduct {
        sku: "ACC044",
        product_name: "3-Inch Movement & Combat Ruler | Precise Wargame Measuring Gauge (3\", 2\", 1\", 0.5\")",
        category: "Accessories",
        box_size: "Small",
        plate_names: &["Ruler"],
    },
    SeedProduct {
        sku: "ACC110",
        product_name: "9\" & 6\" Perimeter marker set | Precise 9\" & 6\" Wargaming Range Gauges",
        category: "Accessories",
        box_size: "Medium",
        plate_names: &["Combined 9\" & 6\" markers"],
    },
    SeedProduct {
        sku: "TK030",
        product_name: "Wound Markers & Damage Counters | Dice Slot Holders (1D6 to 4D6) for Wargames",
        category: "Tokens",
        box_size: "Medium",
        plate_names: &["Base tokens", "Dice holders", "Storage box"],
    },
    // The four concrete products behind the shared TK030 SKU; the virtual
    // SKUs are never ordered directly, ingestion maps onto them by name.
    SeedProduct {
        sku: "TK030_12MM_COMBO",
        product_name: "12mm Wound marker combo",
        category: "Tokens",
        box_size: "Medium",
        plate_names: &["Base tokens", "Dice holders", "Storage box"],
    },
    SeedProduct {
        sku: "TK030_12MM_XL",
        product_name: "12mm Wound marker XL set",
        category: "Tokens",
        box_size: "Medium",
        plate_names: &["Base tokens", "Dice holders", "Storage box"],
    },
    SeedProduct {
        sku: "TK030_16MM_COMBO",
        product_name: "16mm Wound marker combo",
        category: "Tokens",
        box_size: "Medium",
        plate_names: &["Base tokens", "Dice holders", "Storage box"],
    },
    SeedProduct {
        sku: "TK030_16MM_XL",
        product_name: "16mm Wound marker XL set",
        category: "Tokens",
        box_size: "Medium",
        plate_names: &["Base tokens", "Dice holders", "Storage box"],
    },
    SeedProduct {
        sku: "TOK0001",
        product_name: "Generic token set with magnetic box",
        category: "Tokens",
        box_size: "Medium",
        plate_names: &["Tokens", "Storage box"],
    },
    SeedProduct {
        sku: "DEPLOYMENT001",
        product_name: "Deployment Zone Markers w/ Magnetic Box | Double set",
        category: "Accessories",
        box_size: "Medium",
        plate_names: &["First set markers", "Second set markers", "Storage box"],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://orders.db".to_string());

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    for product in PRODUCTS {
        let product_id = ensure_product(&pool, product).await?;
        replace_plate_slots(&pool, product_id, product.plate_names).await?;
        println!(
            "Seeded {} ({}) with {} plates",
            product.product_name,
            product.sku,
            product.plate_names.len()
        );
    }

    println!("Seed completed: {} products", PRODUCTS.len());
    Ok(())
}

async fn ensure_product(pool: &DbPool, product: &SeedProduct) -> anyhow::Result<i64> {
    sqlx::query(
        r#"
        INSERT INTO products (sku, product_name, category, number_of_printing_plates, box_size)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (sku) DO UPDATE SET
            product_name = excluded.product_name,
            category = excluded.category,
            number_of_printing_plates = excluded.number_of_printing_plates,
            box_size = excluded.box_size
        "#,
    )
    .bind(product.sku)
    .bind(product.product_name)
    .bind(product.category)
    .bind(product.plate_names.len() as i64)
    .bind(product.box_size)
    .execute(pool)
    .await?;

    let product_id =
        sqlx::query_scalar::<_, i64>("SELECT product_id FROM products WHERE sku = ?")
            .bind(product.sku)
            .fetch_one(pool)
            .await?;

    Ok(product_id)
}

async fn replace_plate_slots(
    pool: &DbPool,
    product_id: i64,
    plate_names: &[&str],
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM product_plates WHERE product_id = ?")
        .bind(product_id)
        .execute(pool)
        .await?;

    for (i, plate_name) in plate_names.iter().enumerate() {
        sqlx::query(
            "INSERT INTO product_plates (product_id, plate_order, plate_name) VALUES (?, ?, ?)",
        )
        .bind(product_id)
        .bind((i + 1) as i64)
        .bind(plate_name)
        .execute(pool)
        .await?;
    }

    Ok(())
}
