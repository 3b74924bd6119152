use axum::Router;

use crate::state::AppState;

pub mod doc;
pub mod health;
pub mod orders;
pub mod printing;
pub mod products;
pub mod shopify;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/orders", orders::router())
        .nest("/products", products::router())
        .nest("/printing", printing::router())
        .nest("/shopify", shopify::router())
}
