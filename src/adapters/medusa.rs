use crate::domain::model::{Order, StockLocation};
use crate::domain::ports::{OrderService, StockLocationService};
use crate::utils::error::{NotifyError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const SERVICE_NAME: &str = "medusa";

#[derive(Deserialize)]
struct OrderEnvelope {
    order: Order,
}

#[derive(Deserialize)]
struct StockLocationsEnvelope {
    stock_locations: Vec<StockLocation>,
}

/// Client for the Medusa admin REST API.
#[derive(Clone)]
pub struct MedusaAdminClient {
    base_url: String,
    api_token: String,
    client: Client,
}

impl std::fmt::Debug for MedusaAdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedusaAdminClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

impl MedusaAdminClient {
    pub fn new(base_url: &str, api_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            client,
        })
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::UpstreamError {
            service: SERVICE_NAME.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl OrderService for MedusaAdminClient {
    async fn retrieve(&self, order_id: &str, relations: &[&str]) -> Result<Order> {
        let url = format!("{}/admin/orders/{}", self.base_url, order_id);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .query(&[("expand", relations.join(","))])
            .send()
            .await?;
        tracing::trace!("GET {} -> {}", url, response.status());

        if response.status() == StatusCode::NOT_FOUND {
            return Err(NotifyError::OrderNotFound {
                order_id: order_id.to_string(),
            });
        }

        let envelope: OrderEnvelope = Self::check_status(response).await?.json().await?;
        Ok(envelope.order)
    }
}

#[async_trait]
impl StockLocationService for MedusaAdminClient {
    async fn list(&self, ids: &[String]) -> Result<Vec<StockLocation>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/admin/stock-locations", self.base_url);
        let mut query: Vec<(&str, String)> = ids.iter().map(|id| ("id[]", id.clone())).collect();
        // 預設分頁只回傳 20 筆
        query.push(("limit", ids.len().to_string()));

        tracing::debug!("GET {} ({} ids)", url, ids.len());
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .query(&query)
            .send()
            .await?;
        tracing::trace!("GET {} -> {}", url, response.status());

        let envelope: StockLocationsEnvelope = Self::check_status(response).await?.json().await?;
        Ok(envelope.stock_locations)
    }
}
