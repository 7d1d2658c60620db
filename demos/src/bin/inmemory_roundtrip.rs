//! Демонстрация: две подписки с одинаковым отпечатком, публикация и
//! остановка брокера.
//!
//! ```sh
//! EVENTBRIDGE_LOG_LEVEL=debug cargo run -p eventbridge-demos --bin inmemory_roundtrip
//! ```

use std::sync::Arc;

use eventbridge::{
    init_logging, BrokerCapability, BrokerConnector, CancellationToken, ChannelSink, InMemoryConnector,
    PublishDataSource, Settings, SubscriptionSource,
};
use tracing::info;

const SUBSCRIPTION: &[u8] = br#"{"topics":["orders.created"],"providerId":"default"}"#;
const SUBSCRIPTION_WITH_NOISE: &[u8] =
    br#"{"operation":"onOrder","topics":["orders.created"],"providerId":"default"}"#;
const EVENT: &[u8] =
    br#"{"topic":"orders.created","data":{"id":42,"total":"19.99"},"providerId":"default"}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    settings.validate()?;
    init_logging(settings.logging.clone())?;

    let ctx = CancellationToken::new();
    let connector = InMemoryConnector::from_settings(&settings.broker);
    let broker = connector.connect(&ctx).await?;

    let subscriptions = SubscriptionSource::new(broker.clone());
    let publisher = PublishDataSource::new(broker.clone());

    let first = subscriptions.unique_request_id(SUBSCRIPTION)?;
    let second = subscriptions.unique_request_id(SUBSCRIPTION_WITH_NOISE)?;
    info!(%first, %second, shared = first == second, "Request fingerprints");

    let (sink, mut rx) = ChannelSink::channel();
    subscriptions.start(&ctx, SUBSCRIPTION, Arc::new(sink)).await?;

    let mut ack = Vec::new();
    publisher.load(&ctx, EVENT, &mut ack).await?;
    info!(ack = %String::from_utf8_lossy(&ack), "Publish acknowledged");

    if let Some(payload) = rx.recv().await {
        info!(payload = %String::from_utf8_lossy(&payload), "Event received");
    }

    broker.shutdown(&ctx).await?;
    if rx.recv().await.is_none() {
        info!("Subscription closed after shutdown");
    }

    Ok(())
}
