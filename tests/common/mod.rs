#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use parking_lot::Mutex;

use eventbridge::{
    BridgeResult, BrokerCapability, CancellationToken, PublishEventConfiguration,
    SubscriptionEventConfiguration, SubscriptionSink,
};

/// Брокер с заранее заданными ответами, записывающий все вызовы.
#[derive(Default)]
pub struct ScriptedBroker {
    pub subscribe_calls: AtomicUsize,
    pub publish_calls: AtomicUsize,
    pub shutdown_calls: AtomicUsize,
    pub subscribed: Mutex<Vec<SubscriptionEventConfiguration>>,
    pub published: Mutex<Vec<PublishEventConfiguration>>,
    subscribe_result: Mutex<Option<BridgeResult<()>>>,
    publish_result: Mutex<Option<BridgeResult<()>>>,
}

impl ScriptedBroker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_publish_result(result: BridgeResult<()>) -> Arc<Self> {
        let broker = Self::default();
        *broker.publish_result.lock() = Some(result);
        Arc::new(broker)
    }

    pub fn with_subscribe_result(result: BridgeResult<()>) -> Arc<Self> {
        let broker = Self::default();
        *broker.subscribe_result.lock() = Some(result);
        Arc::new(broker)
    }

    /// Количество вызовов: (subscribe, publish, shutdown).
    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.subscribe_calls.load(Ordering::SeqCst),
            self.publish_calls.load(Ordering::SeqCst),
            self.shutdown_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl BrokerCapability for ScriptedBroker {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    async fn subscribe(
        &self,
        _ctx: &CancellationToken,
        config: SubscriptionEventConfiguration,
        _sink: Arc<dyn SubscriptionSink>,
    ) -> BridgeResult<()> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        self.subscribed.lock().push(config);
        self.subscribe_result.lock().clone().unwrap_or(Ok(()))
    }

    async fn publish(
        &self,
        _ctx: &CancellationToken,
        config: PublishEventConfiguration,
    ) -> BridgeResult<()> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        self.published.lock().push(config);
        self.publish_result.lock().clone().unwrap_or(Ok(()))
    }

    async fn shutdown(
        &self,
        _ctx: &CancellationToken,
    ) -> BridgeResult<()> {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Writer, который всегда завершается ошибкой.
pub struct BrokenPipe;

impl std::io::Write for BrokenPipe {
    fn write(
        &mut self,
        _buf: &[u8],
    ) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "engine sink closed",
        ))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
