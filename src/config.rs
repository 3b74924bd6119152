use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub shopify_store: String,
    pub shopify_token: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let shopify_store = env::var("SHOPIFY_STORE")
            .map_err(|_| anyhow::anyhow!("SHOPIFY_STORE must be set"))?;
        let shopify_token = env::var("SHOPIFY_TOKEN")
            .map_err(|_| anyhow::anyhow!("SHOPIFY_TOKEN must be set"))?;
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://orders.db".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3001);
        Ok(Self {
            database_url,
            host,
            port,
            shopify_store,
            shopify_token,
        })
    }
}
