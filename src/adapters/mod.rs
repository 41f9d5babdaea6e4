// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod medusa;
pub mod telegram;

pub use medusa::MedusaAdminClient;
pub use telegram::TelegramClient;
