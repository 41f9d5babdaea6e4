// `order.placed` 事件內容 (Lambda 入口使用)

use crate::utils::error::{NotifyError, Result};
use serde::Deserialize;

/// Medusa subscribers receive `{ "id": ... }`; `order_id` is accepted as well and wins
/// when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPlacedEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}

impl OrderPlacedEvent {
    pub fn order_id(self) -> Result<String> {
        self.order_id
            .into_iter()
            .chain(self.id)
            .map(|id| id.trim().to_string())
            .find(|id| !id.is_empty())
            .ok_or_else(|| NotifyError::InvalidEvent {
                reason: "event payload must contain 'id' or 'order_id'".to_string(),
            })
    }
}
