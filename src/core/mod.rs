pub mod format;
pub mod notifier;

pub use crate::domain::model::{NotificationOutcome, Order, SendMessageRequest, StockLocation};
pub use crate::domain::ports::{ConfigProvider, MessagingService, OrderService, StockLocationService};
pub use crate::utils::error::Result;
