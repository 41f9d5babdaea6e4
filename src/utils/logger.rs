use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directives when `RUST_LOG` is unset. Verbose mode traces the Medusa and
/// Telegram adapters (request URLs, chat ids); HTTP client internals stay at `warn`.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "order_notifier=debug,order_notifier::adapters=trace,reqwest=warn,hyper=warn,info"
    } else {
        "order_notifier=info,order_notifier::adapters=warn,warn"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                // verbose 時顯示模組，區分 medusa / telegram 的輸出
                .with_target(verbose)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .without_time()
                .json() // CloudWatch 使用 JSON 格式，時間由 Lambda 提供
                .flatten_event(true)
                .with_current_span(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbose in [false, true] {
            let directives = default_directives(verbose);
            assert!(EnvFilter::try_new(directives).is_ok(), "{}", directives);
        }
    }

    #[test]
    fn test_adapters_are_quiet_unless_verbose() {
        assert!(default_directives(false).contains("order_notifier::adapters=warn"));
        assert!(default_directives(true).contains("order_notifier::adapters=trace"));
        assert!(default_directives(true).starts_with("order_notifier=debug"));
    }
}
