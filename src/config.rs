use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the storefront backend serving `GET /api/products`.
    pub catalog_base_url: String,
    /// Base URL of the order API. Defaults to the catalog base URL since the
    /// storefront backend serves both.
    pub order_base_url: String,
    pub upstream_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let catalog_base_url = env::var("CATALOG_BASE_URL")?;
        let order_base_url =
            env::var("ORDER_BASE_URL").unwrap_or_else(|_| catalog_base_url.clone());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let upstream_timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(30);
        Ok(Self {
            host,
            port,
            catalog_base_url,
            order_base_url,
            upstream_timeout_secs,
        })
    }
}
