use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use eventbridge_error::{BridgeResult, ResultExt};

use super::SubscriptionEventConfiguration;
use crate::{
    application::{BrokerCapability, SubscriptionSink},
    fingerprint::{Fingerprint, FingerprintHasher, RequestFingerprinter},
};

/// Источник подписки поверх брокера.
///
/// Не хранит состояния между запросами и не знает, обслуживает ли он
/// одного подписчика или несколько мультиплексированных: это решает движок
/// по отпечатку из [`SubscriptionSource::unique_request_id`].
#[derive(Clone)]
pub struct SubscriptionSource {
    pubsub: Arc<dyn BrokerCapability>,
    fingerprinter: RequestFingerprinter,
}

impl SubscriptionSource {
    pub fn new(pubsub: Arc<dyn BrokerCapability>) -> Self {
        Self::with_fingerprinter(pubsub, RequestFingerprinter::default())
    }

    pub fn with_fingerprinter(
        pubsub: Arc<dyn BrokerCapability>,
        fingerprinter: RequestFingerprinter,
    ) -> Self {
        Self {
            pubsub,
            fingerprinter,
        }
    }

    /// Отпечаток запроса по сырым байтам конфигурации.
    pub fn unique_request_id(
        &self,
        input: &[u8],
    ) -> BridgeResult<Fingerprint> {
        self.fingerprinter
            .fingerprint(input)
            .context("fingerprint subscription request")
    }

    /// То же, что [`Self::unique_request_id`], но в аккумулятор движка.
    pub fn write_request_id(
        &self,
        input: &[u8],
        hasher: &mut FingerprintHasher,
    ) -> BridgeResult<()> {
        self.fingerprinter
            .write_request_id(input, hasher)
            .context("fingerprint subscription request")
    }

    /// Разбирает конфигурацию и передаёт подписку брокеру.
    ///
    /// Некорректная конфигурация возвращает `ConfigError` до обращения к
    /// брокеру. Ошибка брокера возвращается без изменений.
    pub async fn start(
        &self,
        ctx: &CancellationToken,
        input: &[u8],
        sink: Arc<dyn SubscriptionSink>,
    ) -> BridgeResult<()> {
        let config = SubscriptionEventConfiguration::from_slice(input)
            .context("parse subscription configuration")?;

        debug!(
            broker = self.pubsub.provider_id(),
            provider_id = %config.provider_id,
            topics = ?config.topics,
            "Starting subscription"
        );

        self.pubsub.subscribe(ctx, config, sink).await
    }
}
