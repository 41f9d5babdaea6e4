use crate::domain::model::{Order, ParseMode, SendMessageRequest, StockLocation};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn admin_base_url(&self) -> &str;
    fn medusa_api_url(&self) -> &str;
    fn medusa_api_token(&self) -> &str;
    fn telegram_api_base_url(&self) -> &str;
    fn telegram_bot_token(&self) -> &str;
    fn group_metadata_key(&self) -> &str;
    fn parse_mode(&self) -> ParseMode;
    fn request_timeout(&self) -> Duration;
}

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Retrieve an order by id with the given relations expanded.
    async fn retrieve(&self, order_id: &str, relations: &[&str]) -> Result<Order>;
}

#[async_trait]
pub trait StockLocationService: Send + Sync {
    async fn list(&self, ids: &[String]) -> Result<Vec<StockLocation>>;
}

#[async_trait]
pub trait MessagingService: Send + Sync {
    async fn send_message(&self, request: &SendMessageRequest) -> Result<()>;
}
