//! Интерфейс (порт) брокера сообщений.
//!
//! Одна реализация на технологию брокера; адаптеры получают её через
//! конструктор и не проверяют конкретный тип во время выполнения.
//!
//! - `subscribe`: начать асинхронную доставку в приёмник.
//! - `publish`: синхронно опубликовать данные в топик.
//! - `shutdown`: освободить все ресурсы соединения.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use eventbridge_error::BridgeResult;

use super::SubscriptionSink;
use crate::datasource::{PublishEventConfiguration, SubscriptionEventConfiguration};

#[async_trait]
pub trait BrokerCapability: Send + Sync {
    /// Провайдер, который обслуживает этот экземпляр.
    fn provider_id(&self) -> &str;

    /// Регистрирует `sink` и возвращает управление, как только подписка
    /// принята. Доставка продолжается до отмены `ctx`, ошибки брокера или
    /// `shutdown`; в любом из этих случаев вызывается `sink.close()`.
    async fn subscribe(
        &self,
        ctx: &CancellationToken,
        config: SubscriptionEventConfiguration,
        sink: Arc<dyn SubscriptionSink>,
    ) -> BridgeResult<()>;

    /// Блокирует до подтверждения или ошибки. Повторов нет.
    async fn publish(
        &self,
        ctx: &CancellationToken,
        config: PublishEventConfiguration,
    ) -> BridgeResult<()>;

    /// Закрывает все подписки этого брокера. Любой последующий вызов
    /// завершается `ClosedError`.
    async fn shutdown(
        &self,
        ctx: &CancellationToken,
    ) -> BridgeResult<()>;
}

/// Фабрика экземпляров брокера для одного провайдера.
#[async_trait]
pub trait BrokerConnector: Send + Sync {
    async fn connect(
        &self,
        ctx: &CancellationToken,
    ) -> BridgeResult<Arc<dyn BrokerCapability>>;
}
