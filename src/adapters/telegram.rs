use crate::domain::model::{ParseMode, SendMessageRequest};
use crate::domain::ports::MessagingService;
use crate::utils::error::{NotifyError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: ParseMode,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API client. Only `sendMessage` is used.
#[derive(Clone)]
pub struct TelegramClient {
    api_base_url: String,
    bot_token: String,
    client: Client,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_base_url", &self.api_base_url)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

impl TelegramClient {
    pub fn new(api_base_url: &str, bot_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
            client,
        })
    }

    async fn send_to_chat(&self, chat_id: &str, request: &SendMessageRequest) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base_url, self.bot_token);
        let body = SendMessageBody {
            chat_id,
            text: &request.text,
            parse_mode: request.parse_mode,
        };

        // reqwest 錯誤訊息會帶上含 token 的 URL
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::ApiError(e.without_url()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| NotifyError::ApiError(e.without_url()))?;
        tracing::trace!("sendMessage chat={} status={} body={}", chat_id, status, text);

        // Telegram 失敗時也會回傳 JSON，例如 {"ok":false,"description":"Bad Request: chat not found"}
        match serde_json::from_str::<ApiResponse>(&text) {
            Ok(api) if api.ok && status.is_success() => Ok(()),
            Ok(api) => Err(NotifyError::UpstreamError {
                service: "telegram".to_string(),
                status: status.as_u16(),
                body: api.description.unwrap_or(text),
            }),
            Err(_) => Err(NotifyError::UpstreamError {
                service: "telegram".to_string(),
                status: status.as_u16(),
                body: text,
            }),
        }
    }
}

#[async_trait]
impl MessagingService for TelegramClient {
    async fn send_message(&self, request: &SendMessageRequest) -> Result<()> {
        let mut failed_chat_ids = Vec::new();
        let mut errors = Vec::new();

        for chat_id in &request.chat_ids {
            match self.send_to_chat(chat_id, request).await {
                Ok(()) => tracing::debug!("✅ Message delivered to chat {}", chat_id),
                Err(e) => {
                    tracing::warn!("❌ Failed to deliver message to chat {}: {}", chat_id, e);
                    failed_chat_ids.push(chat_id.clone());
                    errors.push(e.to_string());
                }
            }
        }

        if failed_chat_ids.is_empty() {
            Ok(())
        } else {
            Err(NotifyError::DeliveryError {
                failed_chat_ids,
                message: errors.join("; "),
            })
        }
    }
}
