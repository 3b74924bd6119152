pub mod catalog_service;
pub mod order_service;
pub mod printing_service;
