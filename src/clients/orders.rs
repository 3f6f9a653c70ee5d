//! HTTP client for the external order API: one-shot order creation and the
//! order lookup backing the post-checkout confirmation view. Upstream error
//! bodies (`{"error": "..."}`) are surfaced verbatim and nothing is retried.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreatedOrder, OrderRequest};

#[derive(Debug, Deserialize)]
struct UpstreamError {
    error: String,
}

#[derive(Debug, Clone)]
pub struct OrderClient {
    client: Client,
    base_url: String,
}

impl OrderClient {
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

    /// Submits an assembled order. Called exactly once per accepted checkout;
    /// a failure is returned to the caller, who may resubmit the form.
    pub async fn create_order(&self, payload: &OrderRequest) -> Result<CreatedOrder, AppError> {
        let url = format!("{}/api/orders", self.base_url);
        let response = self.client.post(&url).json(payload).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<CreatedOrder>().await?);
        }

        Err(AppError::Upstream(read_upstream_error(response, status).await))
    }

    /// Fetches a created order with its embedded items, as raw JSON passed
    /// through to the confirmation view.
    pub async fn get_order(&self, id: Uuid) -> Result<serde_json::Value, AppError> {
        let url = format!("{}/api/orders/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound);
        }
        if status.is_success() {
            return Ok(response.json::<serde_json::Value>().await?);
        }

        Err(AppError::Upstream(read_upstream_error(response, status).await))
    }
}

/// Extracts the `{"error": ...}` message, falling back to the HTTP status
/// line when the body is not in the expected shape.
async fn read_upstream_error(response: reqwest::Response, status: StatusCode) -> String {
    match response.json::<UpstreamError>().await {
        Ok(body) => body.error,
        Err(_) => format!("order API returned {status}"),
    }
}
