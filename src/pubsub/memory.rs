use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    StreamExt, StreamMap,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use eventbridge_error::{BridgeResult, BrokerError, ClosedError};

use super::Message;
use crate::{
    application::{BrokerCapability, BrokerConnector, SubscriptionSink},
    config::BrokerSettings,
    datasource::{PublishEventConfiguration, SubscriptionEventConfiguration},
};

type TopicKey = Arc<str>;

/// Внутрипроцессный брокер, реализующий [`BrokerCapability`].
///
/// Поддерживает:
/// - подписку на несколько топиков одной задачей доставки;
/// - удаление топиков без подписчиков при публикации и по завершении
///   подписки;
/// - остановку всех подписок через `shutdown`;
/// - статистику публикаций и неудачных отправок.
pub struct InMemoryBroker {
    provider_id: Arc<str>,
    /// Топики → `Sender`; общая с задачами доставки для очистки
    topics: Arc<DashMap<TopicKey, broadcast::Sender<Message>>>,
    /// Ёмкость буфера каждого `broadcast::channel`
    capacity: usize,
    closed: AtomicBool,
    /// Отменяется в `shutdown` и завершает все задачи доставки
    shutdown: CancellationToken,
    active_subscriptions: Arc<AtomicUsize>,
    /// Общее количество принятых `publish`
    pub publish_count: AtomicUsize,
    /// Количество публикаций, не дошедших ни до одного подписчика
    pub send_error_count: AtomicUsize,
}

impl InMemoryBroker {
    /// Создаёт брокер для провайдера `provider_id` с заданной ёмкостью
    /// буфера на топик.
    pub fn new(
        provider_id: impl Into<Arc<str>>,
        capacity: usize,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            topics: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
            closed: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
            active_subscriptions: Arc::new(AtomicUsize::new(0)),
            publish_count: AtomicUsize::new(0),
            send_error_count: AtomicUsize::new(0),
        }
    }

    pub fn from_settings(settings: &BrokerSettings) -> Self {
        Self::new(settings.provider_id.as_str(), settings.channel_capacity)
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Количество задач доставки, которые ещё не завершились.
    pub fn active_subscriptions(&self) -> usize {
        self.active_subscriptions.load(Ordering::Acquire)
    }

    /// Количество топиков, для которых существует канал.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    fn ensure_open(
        &self,
        operation: &'static str,
    ) -> Result<(), ClosedError> {
        if self.is_closed() {
            return Err(ClosedError::new(operation));
        }
        Ok(())
    }

    fn ensure_provider(
        &self,
        requested: &str,
    ) -> Result<(), BrokerError> {
        if requested != &*self.provider_id {
            return Err(BrokerError::ProviderMismatch {
                requested: requested.to_string(),
                actual: self.provider_id.to_string(),
            });
        }
        Ok(())
    }

    /// Подписка на топик; приёмник создаётся под блокировкой шарда, поэтому
    /// конкурентная очистка в `publish` его не потеряет.
    fn subscribe_topic(
        &self,
        topic: &TopicKey,
    ) -> broadcast::Receiver<Message> {
        self.topics
            .entry(topic.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }
}

#[async_trait]
impl BrokerCapability for InMemoryBroker {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    async fn subscribe(
        &self,
        ctx: &CancellationToken,
        config: SubscriptionEventConfiguration,
        sink: Arc<dyn SubscriptionSink>,
    ) -> BridgeResult<()> {
        self.ensure_open("subscribe")?;
        self.ensure_provider(&config.provider_id)?;
        if ctx.is_cancelled() {
            return Err(BrokerError::Cancelled.into());
        }
        if config.topics.is_empty() {
            return Err(BrokerError::Rejected {
                reason: "subscription has no topics".to_string(),
            }
            .into());
        }

        let keys: Vec<TopicKey> = config
            .topics
            .iter()
            .map(|topic| Arc::from(topic.as_str()))
            .collect();
        let mut streams = StreamMap::new();
        for key in &keys {
            streams.insert(key.clone(), BroadcastStream::new(self.subscribe_topic(key)));
        }

        // `shutdown` мог очистить топики, пока мы регистрировали приёмники.
        if self.is_closed() {
            drop(streams);
            release_topics(&self.topics, &keys);
            return Err(ClosedError::new("subscribe").into());
        }

        let topics = self.topics.clone();
        let ctx = ctx.clone();
        let shutdown = self.shutdown.clone();
        let active = self.active_subscriptions.clone();
        let provider_id = self.provider_id.clone();
        active.fetch_add(1, Ordering::AcqRel);

        debug!(%provider_id, topics = ?config.topics, "Subscription accepted");

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = ctx.cancelled() => {
                        debug!(%provider_id, "Subscription cancelled by caller");
                        break;
                    }
                    _ = shutdown.cancelled() => {
                        debug!(%provider_id, "Subscription closed by broker shutdown");
                        break;
                    }
                    next = streams.next() => {
                        match next {
                            Some((_, Ok(msg))) => {
                                sink.deliver(msg.payload);
                                if sink.is_closed() {
                                    debug!(%provider_id, "Sink closed, stopping delivery");
                                    break;
                                }
                            }
                            Some((topic, Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                                warn!(%provider_id, %topic, skipped, "Subscriber lagged behind");
                            }
                            None => {
                                debug!(%provider_id, "All topic channels closed");
                                break;
                            }
                        }
                    }
                }
            }

            drop(streams);
            release_topics(&topics, &keys);
            active.fetch_sub(1, Ordering::AcqRel);
            sink.close();
        });

        Ok(())
    }

    async fn publish(
        &self,
        ctx: &CancellationToken,
        config: PublishEventConfiguration,
    ) -> BridgeResult<()> {
        self.ensure_open("publish")?;
        self.ensure_provider(&config.provider_id)?;
        if ctx.is_cancelled() {
            return Err(BrokerError::Cancelled.into());
        }

        let payload = serde_json::to_vec(&config.data).map_err(|e| BrokerError::Rejected {
            reason: e.to_string(),
        })?;
        self.publish_count.fetch_add(1, Ordering::Relaxed);

        let delivered = match self.topics.get(config.topic.as_str()) {
            Some(entry) => {
                let msg = Message::new(entry.key().clone(), payload);
                entry.value().send(msg).is_ok()
            }
            None => false,
        };

        if !delivered {
            self.send_error_count.fetch_add(1, Ordering::Relaxed);
            self.topics
                .remove_if(config.topic.as_str(), |_, tx| tx.receiver_count() == 0);
            debug!(topic = %config.topic, "Published to a topic without subscribers");
        }

        Ok(())
    }

    async fn shutdown(
        &self,
        _ctx: &CancellationToken,
    ) -> BridgeResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(ClosedError::new("shutdown").into());
        }

        self.shutdown.cancel();
        let topics = self.topics.len();
        self.topics.clear();

        info!(
            provider_id = %self.provider_id,
            topics,
            publish_count = self.publish_count.load(Ordering::Relaxed),
            "In-memory broker shut down"
        );
        Ok(())
    }
}

/// Удаляет топики, у которых не осталось получателей.
fn release_topics(
    topics: &DashMap<TopicKey, broadcast::Sender<Message>>,
    keys: &[TopicKey],
) {
    for key in keys {
        topics.remove_if(key, |_, tx| tx.receiver_count() == 0);
    }
}

/// Коннектор, раздающий один общий [`InMemoryBroker`].
#[derive(Clone)]
pub struct InMemoryConnector {
    broker: Arc<InMemoryBroker>,
}

impl InMemoryConnector {
    pub fn new(broker: Arc<InMemoryBroker>) -> Self {
        Self { broker }
    }

    pub fn from_settings(settings: &BrokerSettings) -> Self {
        Self::new(Arc::new(InMemoryBroker::from_settings(settings)))
    }

    pub fn broker(&self) -> &Arc<InMemoryBroker> {
        &self.broker
    }
}

#[async_trait]
impl BrokerConnector for InMemoryConnector {
    async fn connect(
        &self,
        _ctx: &CancellationToken,
    ) -> BridgeResult<Arc<dyn BrokerCapability>> {
        self.broker.ensure_open("connect")?;
        Ok(self.broker.clone())
    }
}
