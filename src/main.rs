use anyhow::Context;
use clap::Parser;
use order_notifier::utils::error::ErrorSeverity;
use order_notifier::utils::{logger, validation::Validate};
use order_notifier::{build_notifier, CliConfig, NotificationOutcome, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting order-notifier");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let notifier = build_notifier(&config).context("failed to build HTTP clients")?;
    let mut worst: Option<ErrorSeverity> = None;

    for order_id in &args.order_ids {
        if args.dry_run {
            match notifier.build_message(order_id).await {
                Ok(Some(request)) => {
                    println!("📨 Order {} -> {}", order_id, request.chat_ids.join(", "));
                    println!("{}\n", request.text);
                }
                Ok(None) => println!("⏭️ Order {}: no messaging group configured\n", order_id),
                Err(e) => {
                    tracing::error!("❌ Order {}: {}", order_id, e);
                    eprintln!("❌ {}", e.user_friendly_message());
                    worst = worst.max(Some(e.severity()));
                }
            }
            continue;
        }

        match notifier.notify_order_placed(order_id).await {
            Ok(NotificationOutcome::Sent { chat_ids }) => {
                tracing::info!("✅ Order {} notified to {}", order_id, chat_ids.join(", "));
            }
            Ok(NotificationOutcome::Skipped { reason }) => {
                tracing::info!("⏭️ Order {} skipped: {}", order_id, reason);
            }
            Err(e) => {
                tracing::error!(
                    "❌ Order {} failed: {} (Category: {:?}, Severity: {:?})",
                    order_id,
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                worst = worst.max(Some(e.severity()));
            }
        }
    }

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match worst {
        None | Some(ErrorSeverity::Low) => 0,
        Some(ErrorSeverity::Medium) => 2,
        Some(ErrorSeverity::High) => 1,
        Some(ErrorSeverity::Critical) => 3,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
