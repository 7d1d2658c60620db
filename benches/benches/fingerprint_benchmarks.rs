use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eventbridge::{fingerprint::find_top_level_field, RequestFingerprinter};

fn request_with_padding(padding: usize) -> Vec<u8> {
    let filler: Vec<String> = (0..padding).map(|i| format!("value-{i}")).collect();
    serde_json::json!({
        "filler": filler,
        "topics": ["orders.created", "orders.updated", "orders.deleted"],
        "providerId": "kafka-eu",
    })
    .to_string()
    .into_bytes()
}

fn bench_fingerprint(c: &mut Criterion) {
    let fingerprinter = RequestFingerprinter::default();
    let mut group = c.benchmark_group("fingerprint");

    for padding in [0usize, 64, 1024] {
        let input = request_with_padding(padding);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(padding), &input, |b, input| {
            b.iter(|| black_box(fingerprinter.fingerprint(black_box(input)).unwrap()))
        });
    }
    group.finish();
}

fn bench_scanner(c: &mut Criterion) {
    let input = request_with_padding(256);
    c.bench_function("scan_provider_id_after_padding", |b| {
        b.iter(|| black_box(find_top_level_field(black_box(&input), "providerId").unwrap()))
    });
}

criterion_group!(benches, bench_fingerprint, bench_scanner);
criterion_main!(benches);
