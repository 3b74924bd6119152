use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        orders::{OrderItemDetail, OrderSummary, UpdateOrderStatusRequest},
        printing::{
            AssemblyReadyItem, MarkDoneResult, PlateStats, PlateStatusSummary, PlateWithContext,
            UpdatePlateStatusRequest,
        },
        products::ProductWithPlates,
        shopify::{
            ConnectionStatus, FetchOrdersRequest, FetchResults, LineItemProperty, ShopifyCustomer,
            ShopifyLineItem, ShopifyOrder,
        },
    },
    models::{Customer, Order, OrderItem, PlateStatus, PrintingPlate, Product},
    response::ApiResponse,
    routes::{health, orders, printing, products, shopify},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::list_orders,
        orders::get_order_items,
        orders::update_order_status,
        orders::complete_order,
        products::list_products,
        products::get_product,
        printing::list_plates,
        printing::update_plate_status,
        printing::list_plates_by_status,
        printing::printing_stats,
        printing::list_assembly_ready,
        printing::mark_order_item_done,
        printing::order_item_summary,
        shopify::fetch_orders,
        shopify::test_connection,
        shopify::get_shopify_order,
    ),
    components(
        schemas(
            Customer,
            Product,
            Order,
            OrderItem,
            PrintingPlate,
            PlateStatus,
            ProductWithPlates,
            OrderSummary,
            OrderItemDetail,
            UpdateOrderStatusRequest,
            PlateWithContext,
            PlateStats,
            PlateStatusSummary,
            AssemblyReadyItem,
            UpdatePlateStatusRequest,
            MarkDoneResult,
            ShopifyOrder,
            ShopifyCustomer,
            ShopifyLineItem,
            LineItemProperty,
            FetchOrdersRequest,
            FetchResults,
            ConnectionStatus,
            ApiResponse<Vec<OrderSummary>>,
            ApiResponse<Vec<PlateWithContext>>,
            ApiResponse<PlateStats>,
            ApiResponse<FetchResults>,
            ApiResponse<ShopifyOrder>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order and line item endpoints"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Printing", description = "Printing plate workflow endpoints"),
        (name = "Shopify", description = "Shopify integration endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
