use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Relations expanded when retrieving an order for notification.
pub const ORDER_RELATIONS: &[&str] = &[
    "cart",
    "customer",
    "shipping_address",
    "region",
    "currency",
    "shipping_methods",
    "payments",
    "sales_channel",
    "sales_channels",
];

/// Amounts are integers in the currency's minor unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub display_id: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub paid_total: i64,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub sales_channel: Option<SalesChannel>,
}

impl Order {
    /// Currency code of the order, preferring the expanded `currency` relation.
    pub fn currency_code(&self) -> Option<&str> {
        self.currency
            .as_ref()
            .map(|c| c.code.as_str())
            .or(self.currency_code.as_deref())
            .filter(|code| !code.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub address_1: Option<String>,
    #[serde(default)]
    pub address_2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub symbol_native: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesChannel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub locations: Vec<SalesChannelLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesChannelLocation {
    pub location_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockLocation {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl StockLocation {
    /// Messaging group id stored under `key` in the location metadata.
    ///
    /// Strings are trimmed and integers are rendered in decimal, since
    /// Telegram group ids are often stored as numbers. Anything else,
    /// including an empty string, does not name a destination.
    pub fn group_id(&self, key: &str) -> Option<String> {
        match self.metadata.as_ref()?.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    #[default]
    Markdown,
    MarkdownV2,
    #[serde(rename = "HTML", alias = "Html", alias = "html")]
    Html,
}

impl std::str::FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" => Ok(ParseMode::Markdown),
            "markdownv2" => Ok(ParseMode::MarkdownV2),
            "html" => Ok(ParseMode::Html),
            other => Err(format!(
                "unknown parse mode '{}', expected Markdown, MarkdownV2 or HTML",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub chat_ids: Vec<String>,
    pub text: String,
    pub parse_mode: ParseMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    Skipped { reason: String },
    Sent { chat_ids: Vec<String> },
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_id_from_metadata() {
        let location: StockLocation = serde_json::from_value(serde_json::json!({
            "id": "sloc_1",
            "metadata": {"telegram_group_id": "-1001234"}
        }))
        .unwrap();
        assert_eq!(
            location.group_id("telegram_group_id").as_deref(),
            Some("-1001234")
        );
        assert_eq!(location.group_id("other_key"), None);

        let numeric: StockLocation = serde_json::from_value(serde_json::json!({
            "id": "sloc_2",
            "metadata": {"telegram_group_id": -1005678}
        }))
        .unwrap();
        assert_eq!(
            numeric.group_id("telegram_group_id").as_deref(),
            Some("-1005678")
        );

        let padded: StockLocation = serde_json::from_value(serde_json::json!({
            "id": "sloc_3",
            "metadata": {"telegram_group_id": " -1009 \n"}
        }))
        .unwrap();
        assert_eq!(padded.group_id("telegram_group_id").as_deref(), Some("-1009"));
    }

    #[test]
    fn test_group_id_ignores_null_and_empty() {
        let null_metadata: StockLocation =
            serde_json::from_value(serde_json::json!({"id": "sloc_1", "metadata": null}))
                .unwrap();
        assert_eq!(null_metadata.group_id("telegram_group_id"), None);

        let empty: StockLocation = serde_json::from_value(serde_json::json!({
            "id": "sloc_2",
            "metadata": {"telegram_group_id": "  "}
        }))
        .unwrap();
        assert_eq!(empty.group_id("telegram_group_id"), None);
    }

    #[test]
    fn test_sales_channel_null_locations() {
        let channel: SalesChannel =
            serde_json::from_value(serde_json::json!({"id": "sc_1", "locations": null}))
                .unwrap();
        assert!(channel.locations.is_empty());
    }

    #[test]
    fn test_parse_mode_serialization() {
        assert_eq!(
            serde_json::to_value(ParseMode::Html).unwrap(),
            serde_json::json!("HTML")
        );
        assert_eq!(
            serde_json::to_value(ParseMode::Markdown).unwrap(),
            serde_json::json!("Markdown")
        );
        assert_eq!("markdownv2".parse::<ParseMode>(), Ok(ParseMode::MarkdownV2));
        assert!("plain".parse::<ParseMode>().is_err());
    }

    #[test]
    fn test_currency_code_prefers_relation() {
        let order = Order {
            currency_code: Some("usd".to_string()),
            currency: Some(Currency {
                code: "eur".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(order.currency_code(), Some("eur"));
    }
}
