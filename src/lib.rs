pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use self::config::CliConfig;

pub use self::app::{build_notifier, MedusaTelegramNotifier, OrderPlacedEvent};
pub use self::config::{env::EnvConfig, toml_config::TomlConfig};
pub use self::core::notifier::{NotifierSettings, OrderNotifier};
pub use self::domain::model::{NotificationOutcome, ParseMode, SendMessageRequest};
pub use self::utils::error::{NotifyError, Result};
