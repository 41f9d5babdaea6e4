use anyhow::Context;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use order_notifier::utils::{logger, validation::Validate};
use order_notifier::{
    build_notifier, EnvConfig, MedusaTelegramNotifier, NotificationOutcome, OrderPlacedEvent,
};

async fn function_handler(
    notifier: &MedusaTelegramNotifier,
    event: LambdaEvent<OrderPlacedEvent>,
) -> Result<NotificationOutcome, Error> {
    let order_id = event.payload.order_id()?;

    tracing::info!("Handling order.placed for {}", order_id);

    let outcome = notifier.notify_order_placed(&order_id).await?;

    tracing::info!("Order {} handled: {:?}", order_id, outcome);
    Ok(outcome)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = EnvConfig::from_env().context("loading configuration from environment")?;
    config.validate().context("invalid configuration")?;

    let notifier = build_notifier(&config).context("failed to build HTTP clients")?;
    let notifier = &notifier;

    run(service_fn(move |event: LambdaEvent<OrderPlacedEvent>| async move {
        function_handler(notifier, event).await
    }))
    .await
}
