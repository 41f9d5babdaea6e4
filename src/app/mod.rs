// Application layer: wires configuration and adapters into a ready notifier.

pub mod event;

use crate::adapters::{MedusaAdminClient, TelegramClient};
use crate::core::notifier::{NotifierSettings, OrderNotifier};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;

pub use event::OrderPlacedEvent;

pub type MedusaTelegramNotifier = OrderNotifier<MedusaAdminClient, MedusaAdminClient, TelegramClient>;

/// Both clients share `request_timeout()`.
pub fn build_notifier<C: ConfigProvider>(config: &C) -> Result<MedusaTelegramNotifier> {
    let medusa = MedusaAdminClient::new(
        config.medusa_api_url(),
        config.medusa_api_token(),
        config.request_timeout(),
    )?;
    let telegram = TelegramClient::new(
        config.telegram_api_base_url(),
        config.telegram_bot_token(),
        config.request_timeout(),
    )?;

    let settings = NotifierSettings {
        admin_base_url: config.admin_base_url().to_string(),
        group_metadata_key: config.group_metadata_key().to_string(),
        parse_mode: config.parse_mode(),
    };

    tracing::debug!(
        "Notifier configured: medusa={}, metadata_key={}, parse_mode={:?}",
        config.medusa_api_url(),
        settings.group_metadata_key,
        settings.parse_mode
    );

    Ok(OrderNotifier::new(medusa.clone(), medusa, telegram, settings))
}
