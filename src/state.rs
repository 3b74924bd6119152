use crate::{db::DbPool, shopify::ShopifyClient};

/// Shared services, constructed once at startup and cloned into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub shopify: ShopifyClient,
}
