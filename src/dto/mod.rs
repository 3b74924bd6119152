pub mod orders;
pub mod printing;
pub mod products;
pub mod shopify;
