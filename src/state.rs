use crate::clients::{CatalogClient, OrderClient};
use crate::config::AppConfig;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub catalog: CatalogClient,
    pub orders: OrderClient,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            sessions: SessionStore::new(),
            catalog: CatalogClient::new(&config.catalog_base_url, config.upstream_timeout_secs)?,
            orders: OrderClient::new(&config.order_base_url, config.upstream_timeout_secs)?,
        })
    }
}
