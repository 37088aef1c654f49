//! Benchmarks for chatscrub normalization and pipeline operations.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench pipeline -- normalize`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chatscrub::config::ScrubConfig;
use chatscrub::dictionary::CategoryDictionary;
use chatscrub::pipeline::Pipeline;
use chatscrub::pseudonym::{pseudonymize, HashRegistry};
use chatscrub::record::MessageRecord;
use chatscrub::text::Normalizer;

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_raw_text(words: usize) -> String {
    let vocabulary = [
        "I'm", "really", "happy", "about", "the", "launch!!", "we", "shipped", "42",
        "features", "e.g.", "the", "new", "dashboard...", "can't", "wait", "vs", "last",
        "quarter's", "numbers",
    ];
    (0..words)
        .map(|i| vocabulary[i % vocabulary.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_day_records(count: usize) -> Vec<MessageRecord> {
    let records: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "client_msg_id": format!("msg-{i}"),
                "ts": format!("{}", 1_609_459_200 + i * 60),
                "user": format!("U{:05}", i % 7),
                "type": "message",
                "text": generate_raw_text(12),
                "blocks": [{
                    "type": "rich_text",
                    "block_id": format!("b{i}"),
                    "elements": [{
                        "type": "rich_text_section",
                        "elements": [
                            {"type": "text", "text": generate_raw_text(12)},
                            {"type": "emoji", "name": "tada"},
                            {"type": "user", "user_id": "U00001"}
                        ]
                    }]
                }]
            })
        })
        .collect();
    serde_json::from_value(serde_json::Value::Array(records)).unwrap()
}

fn dictionary() -> Arc<CategoryDictionary> {
    let source = "\
posemo,negemo,cogmech
happy,sad,think
glad,awful,becaus.*
delight.*,hurt.*,known
";
    Arc::new(CategoryDictionary::from_reader(source.as_bytes()).unwrap())
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::new();
    let mut group = c.benchmark_group("normalize");

    for words in [10usize, 100, 1000] {
        let text = generate_raw_text(words);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(words), &text, |b, text| {
            b.iter(|| normalizer.normalize(black_box(text)));
        });
    }
    group.finish();
}

fn bench_collapse_repeats(c: &mut Criterion) {
    let normalizer = Normalizer::new();
    let text = normalizer.normalize(&generate_raw_text(500));

    c.bench_function("collapse_repeats/500_words", |b| {
        b.iter(|| normalizer.collapse_repeats(black_box(&text)));
    });
}

fn bench_pseudonymize(c: &mut Criterion) {
    let normalizer = Normalizer::new();
    let content = normalizer.collapse_repeats(&normalizer.normalize(&generate_raw_text(200)));

    c.bench_function("pseudonymize/200_words", |b| {
        b.iter(|| {
            let mut registry = HashRegistry::new();
            pseudonymize(black_box(&content), &mut registry, "bench-seed")
        });
    });
}

fn bench_process_day(c: &mut Criterion) {
    let pipeline = Pipeline::new(
        ScrubConfig::new("bench-seed").with_channel("general"),
        dictionary(),
    );
    let mut group = c.benchmark_group("process_day");

    for count in [10usize, 100] {
        let records = generate_day_records(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &records,
            |b, records| {
                b.iter(|| {
                    let mut registry = HashRegistry::new();
                    pipeline.process_day(black_box(records.clone()), &mut registry)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_normalize,
    bench_collapse_repeats,
    bench_pseudonymize,
    bench_process_day
);
criterion_main!(benches);
