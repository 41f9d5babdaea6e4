pub mod env;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "order-notifier")]
#[command(about = "Send order-placed notifications to messaging groups tagged on stock locations")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "notifier.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the message and target groups without sending
    #[arg(long)]
    pub dry_run: bool,

    /// Ids of placed orders to notify about
    #[arg(required = true, num_args = 1..)]
    pub order_ids: Vec<String>,
}
