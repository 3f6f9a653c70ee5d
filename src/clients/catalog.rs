//! HTTP client for the storefront catalog API. Product data is read-only
//! input to pricing; callers decide how to degrade when a fetch fails.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Product;

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Creates a client against the given base URL. The URL is normalised to
    /// carry no trailing slash so path concatenation stays predictable; tests
    /// point this at a wiremock server.
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the full product list.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, AppError> {
        let url = format!("{}/api/products", self.base_url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let products = response.json::<Vec<Product>>().await?;
        Ok(products)
    }

    /// Product lookup keyed by id, degraded to empty when the catalog is
    /// unreachable: pricing then falls back to the default unit price per
    /// line instead of failing the cart.
    pub async fn product_map(&self) -> HashMap<Uuid, Product> {
        match self.fetch_products().await {
            Ok(products) => products.into_iter().map(|p| (p.id, p)).collect(),
            Err(err) => {
                tracing::warn!(error = %err, "product fetch failed, pricing with fallbacks");
                HashMap::new()
            }
        }
    }
}
