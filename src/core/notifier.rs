use crate::core::format::order_placed_message;
use crate::domain::model::{
    NotificationOutcome, Order, ParseMode, SendMessageRequest, StockLocation, ORDER_RELATIONS,
};
use crate::domain::ports::{MessagingService, OrderService, StockLocationService};
use crate::utils::error::Result;

pub const DEFAULT_GROUP_METADATA_KEY: &str = "telegram_group_id";

#[derive(Debug, Clone)]
pub struct NotifierSettings {
    /// Base URL of the admin dashboard, used for links in the message.
    pub admin_base_url: String,
    /// Stock location metadata key holding the messaging group id.
    pub group_metadata_key: String,
    pub parse_mode: ParseMode,
}

impl NotifierSettings {
    pub fn new(admin_base_url: impl Into<String>) -> Self {
        Self {
            admin_base_url: admin_base_url.into(),
            group_metadata_key: DEFAULT_GROUP_METADATA_KEY.to_string(),
            parse_mode: ParseMode::default(),
        }
    }
}

pub struct OrderNotifier<O: OrderService, L: StockLocationService, M: MessagingService> {
    orders: O,
    locations: L,
    messaging: M,
    settings: NotifierSettings,
}

impl<O: OrderService, L: StockLocationService, M: MessagingService> OrderNotifier<O, L, M> {
    pub fn new(orders: O, locations: L, messaging: M, settings: NotifierSettings) -> Self {
        Self {
            orders,
            locations,
            messaging,
            settings,
        }
    }

    /// Build the notification for an order without sending it.
    ///
    /// Returns `None` when none of the stock locations behind the order's
    /// sales channel carry a messaging group id.
    pub async fn build_message(&self, order_id: &str) -> Result<Option<SendMessageRequest>> {
        tracing::debug!("Retrieving order {}", order_id);
        let order = self.orders.retrieve(order_id, ORDER_RELATIONS).await?;

        let location_ids = sales_channel_location_ids(&order);
        if location_ids.is_empty() {
            tracing::debug!("Order {} has no stock locations on its sales channel", order.id);
            return Ok(None);
        }

        tracing::debug!("Listing {} stock location(s)", location_ids.len());
        let locations = self.locations.list(&location_ids).await?;

        let chat_ids = group_ids(&locations, &self.settings.group_metadata_key);
        if chat_ids.is_empty() {
            return Ok(None);
        }

        Ok(Some(SendMessageRequest {
            chat_ids,
            text: order_placed_message(
                &order,
                &self.settings.admin_base_url,
                self.settings.parse_mode,
            ),
            parse_mode: self.settings.parse_mode,
        }))
    }

    /// Send the order-placed notification to every messaging group configured
    /// on the order's stock locations.
    pub async fn notify_order_placed(&self, order_id: &str) -> Result<NotificationOutcome> {
        let Some(request) = self.build_message(order_id).await? else {
            tracing::info!(
                "⏭️ No stock location for order {} carries '{}', skipping",
                order_id,
                self.settings.group_metadata_key
            );
            return Ok(NotificationOutcome::Skipped {
                reason: format!(
                    "no stock location carries '{}'",
                    self.settings.group_metadata_key
                ),
            });
        };

        tracing::info!(
            "📨 Sending order {} notification to {} group(s)",
            order_id,
            request.chat_ids.len()
        );
        self.messaging.send_message(&request).await?;

        Ok(NotificationOutcome::Sent {
            chat_ids: request.chat_ids,
        })
    }
}

/// Stock location ids referenced by the order's sales channel, de-duplicated
/// in first-seen order.
pub fn sales_channel_location_ids(order: &Order) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    if let Some(channel) = &order.sales_channel {
        for location in &channel.locations {
            if !ids.contains(&location.location_id) {
                ids.push(location.location_id.clone());
            }
        }
    }
    ids
}

/// Group ids found under `key` in the locations' metadata, de-duplicated.
pub fn group_ids(locations: &[StockLocation], key: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for location in locations {
        match location.group_id(key) {
            Some(id) if !ids.contains(&id) => ids.push(id),
            Some(_) => {}
            None => tracing::debug!("Stock location {} has no '{}'", location.id, key),
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{SalesChannel, SalesChannelLocation};
    use crate::utils::error::NotifyError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct MockOrders {
        orders: HashMap<String, Order>,
    }

    #[async_trait]
    impl OrderService for MockOrders {
        async fn retrieve(&self, order_id: &str, relations: &[&str]) -> Result<Order> {
            assert!(relations.contains(&"sales_channel"));
            self.orders
                .get(order_id)
                .cloned()
                .ok_or_else(|| NotifyError::OrderNotFound {
                    order_id: order_id.to_string(),
                })
        }
    }

    #[derive(Clone, Default)]
    struct MockLocations {
        locations: Vec<StockLocation>,
        requested: Arc<Mutex<Vec<Vec<String>>>>,
    }

    #[async_trait]
    impl StockLocationService for MockLocations {
        async fn list(&self, ids: &[String]) -> Result<Vec<StockLocation>> {
            self.requested.lock().unwrap().push(ids.to_vec());
            Ok(self
                .locations
                .iter()
                .filter(|l| ids.contains(&l.id))
                .cloned()
                .collect())
        }
    }

    #[derive(Clone, Default)]
    struct MockMessaging {
        sent: Arc<Mutex<Vec<SendMessageRequest>>>,
    }

    #[async_trait]
    impl MessagingService for MockMessaging {
        async fn send_message(&self, request: &SendMessageRequest) -> Result<()> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    fn location(id: &str, metadata: serde_json::Value) -> StockLocation {
        StockLocation {
            id: id.to_string(),
            name: None,
            metadata: metadata.as_object().cloned(),
        }
    }

    fn order_with_locations(location_ids: &[&str]) -> Order {
        Order {
            id: "order_1".to_string(),
            display_id: 1001,
            paid_total: 4200,
            currency_code: Some("usd".to_string()),
            sales_channel: Some(SalesChannel {
                id: "sc_1".to_string(),
                name: None,
                locations: location_ids
                    .iter()
                    .map(|id| SalesChannelLocation {
                        location_id: id.to_string(),
                    })
                    .collect(),
            }),
            ..Default::default()
        }
    }

    fn notifier(
        order: Order,
        locations: MockLocations,
        messaging: MockMessaging,
    ) -> OrderNotifier<MockOrders, MockLocations, MockMessaging> {
        let orders = MockOrders {
            orders: HashMap::from([(order.id.clone(), order)]),
        };
        OrderNotifier::new(
            orders,
            locations,
            messaging,
            NotifierSettings::new("https://admin.example.com"),
        )
    }

    #[tokio::test]
    async fn test_sends_to_tagged_locations_only() {
        let locations = MockLocations {
            locations: vec![
                location("sloc_a", serde_json::json!({"telegram_group_id": "-100a"})),
                location("sloc_b", serde_json::json!({"warehouse": "north"})),
                location("sloc_c", serde_json::json!({"telegram_group_id": -100})),
            ],
            ..Default::default()
        };
        let messaging = MockMessaging::default();
        let notifier = notifier(
            order_with_locations(&["sloc_a", "sloc_b", "sloc_a", "sloc_c"]),
            locations.clone(),
            messaging.clone(),
        );

        let outcome = notifier.notify_order_placed("order_1").await.unwrap();
        assert_eq!(
            outcome,
            NotificationOutcome::Sent {
                chat_ids: vec!["-100a".to_string(), "-100".to_string()]
            }
        );

        // 重複的 location id 只查詢一次
        let requested = locations.requested.lock().unwrap();
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0], vec!["sloc_a", "sloc_b", "sloc_c"]);

        let sent = messaging.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].parse_mode, ParseMode::Markdown);
        assert!(sent[0].text.contains("*#1001*"));
        assert!(sent[0].text.contains("$42.00"));
    }

    #[tokio::test]
    async fn test_skips_when_no_location_is_tagged() {
        let locations = MockLocations {
            locations: vec![location("sloc_a", serde_json::json!({}))],
            ..Default::default()
        };
        let messaging = MockMessaging::default();
        let notifier = notifier(
            order_with_locations(&["sloc_a"]),
            locations,
            messaging.clone(),
        );

        let outcome = notifier.notify_order_placed("order_1").await.unwrap();
        assert!(matches!(outcome, NotificationOutcome::Skipped { .. }));
        assert!(messaging.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_skips_without_listing_when_channel_has_no_locations() {
        let locations = MockLocations::default();
        let messaging = MockMessaging::default();
        let notifier = notifier(order_with_locations(&[]), locations.clone(), messaging.clone());

        let outcome = notifier.notify_order_placed("order_1").await.unwrap();
        assert!(matches!(outcome, NotificationOutcome::Skipped { .. }));
        assert!(locations.requested.lock().unwrap().is_empty());
        assert!(messaging.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_metadata_key() {
        let locations = MockLocations {
            locations: vec![location(
                "sloc_a",
                serde_json::json!({"telegram_group_id": "-1", "ops_chat": "-2"}),
            )],
            ..Default::default()
        };
        let orders = MockOrders {
            orders: HashMap::from([("order_1".to_string(), order_with_locations(&["sloc_a"]))]),
        };
        let mut settings = NotifierSettings::new("https://admin.example.com");
        settings.group_metadata_key = "ops_chat".to_string();
        settings.parse_mode = ParseMode::MarkdownV2;

        let notifier = OrderNotifier::new(orders, locations, MockMessaging::default(), settings);
        let request = notifier.build_message("order_1").await.unwrap().unwrap();
        assert_eq!(request.chat_ids, vec!["-2"]);
        assert_eq!(request.parse_mode, ParseMode::MarkdownV2);
        // 訊息依設定的模式排版
        assert!(request.text.contains("*\\#1001*"));
        assert!(request.text.contains("$42\\.00"));
    }

    #[tokio::test]
    async fn test_missing_order_propagates() {
        let notifier = notifier(
            order_with_locations(&["sloc_a"]),
            MockLocations::default(),
            MockMessaging::default(),
        );

        let err = notifier.notify_order_placed("order_missing").await.unwrap_err();
        assert!(matches!(err, NotifyError::OrderNotFound { .. }));
    }

    #[test]
    fn test_group_ids_dedup() {
        let locations = vec![
            location("a", serde_json::json!({"telegram_group_id": "-1"})),
            location("b", serde_json::json!({"telegram_group_id": "-1"})),
            location("c", serde_json::json!({"telegram_group_id": null})),
        ];
        assert_eq!(group_ids(&locations, "telegram_group_id"), vec!["-1"]);
    }
}
