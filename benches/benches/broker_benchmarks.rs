use std::{hint::black_box, sync::Arc};

use criterion::{criterion_group, criterion_main, Criterion};
use eventbridge::{
    BrokerCapability, CancellationToken, ChannelSink, InMemoryBroker, PublishDataSource,
    PublishEventConfiguration, SubscriptionEventConfiguration,
};
use tokio::runtime::Runtime;

const EVENT: &[u8] = br#"{"topic":"chan","data":{"id":1},"providerId":"bench"}"#;

fn publish_config() -> PublishEventConfiguration {
    PublishEventConfiguration::from_slice(EVENT).unwrap()
}

fn bench_publish_0_sub(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let broker = InMemoryBroker::new("bench", 1024);
    let ctx = CancellationToken::new();

    c.bench_function("publish_0_subs", |b| {
        b.to_async(&rt)
            .iter(|| async { broker.publish(&ctx, black_box(publish_config())).await.unwrap() })
    });
}

fn bench_publish_1_sub(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let broker = InMemoryBroker::new("bench", 1024);
    let ctx = CancellationToken::new();
    let (sink, _rx) = ChannelSink::channel();
    rt.block_on(broker.subscribe(
        &ctx,
        SubscriptionEventConfiguration {
            topics: vec!["chan".to_string()],
            provider_id: "bench".to_string(),
        },
        Arc::new(sink),
    ))
    .unwrap();

    c.bench_function("publish_1_sub", |b| {
        b.to_async(&rt)
            .iter(|| async { broker.publish(&ctx, black_box(publish_config())).await.unwrap() })
    });
}

fn bench_load_with_ack(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let source = PublishDataSource::new(Arc::new(InMemoryBroker::new("bench", 1024)));
    let ctx = CancellationToken::new();

    c.bench_function("load_with_ack", |b| {
        b.to_async(&rt).iter(|| async {
            let mut out = Vec::with_capacity(32);
            source.load(&ctx, black_box(EVENT), &mut out).await.unwrap();
            black_box(out)
        })
    });
}

criterion_group!(
    benches,
    bench_publish_0_sub,
    bench_publish_1_sub,
    bench_load_with_ack
);
criterion_main!(benches);
