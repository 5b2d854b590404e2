use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use firestore_codec::{Blob, Timestamp, Value, decode, encode, from_value, to_value};
use mimalloc::MiMalloc;
use serde::{Deserialize, Serialize};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Line {
    sku: String,
    quantity: u32,
    price: f64,
    tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Order {
    id: i64,
    customer: String,
    paid: bool,
    note: Option<String>,
    lines: Vec<Line>,
    totals: BTreeMap<String, f64>,
}

/// Same shape as `Order` plus the opaque leaves that only the tree can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StampedOrder {
    order: Order,
    placed: Timestamp,
    receipt: Blob,
}

fn order(lines: usize) -> Order {
    Order {
        id: 42,
        customer: "customer-0042".into(),
        paid: true,
        note: None,
        lines: (0..lines)
            .map(|i| Line {
                sku: format!("sku-{i:05}"),
                quantity: i as u32 % 7 + 1,
                price: i as f64 * 0.25,
                tags: vec!["a".into(), "bb".into(), "ccc".into()],
            })
            .collect(),
        totals: [("net".to_string(), 10.5), ("tax".to_string(), 2.1)]
            .into_iter()
            .collect(),
    }
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for lines in [1usize, 32, 512] {
        let input = order(lines);
        group.bench_with_input(BenchmarkId::new("firestore_codec", lines), &input, |b, v| {
            b.iter(|| to_value(black_box(v)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("serde_json", lines), &input, |b, v| {
            b.iter(|| serde_json::to_value(black_box(v)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for lines in [1usize, 32, 512] {
        let input = order(lines);
        let tree = to_value(&input).unwrap();
        let json = serde_json::to_value(&input).unwrap();
        group.bench_with_input(BenchmarkId::new("firestore_codec", lines), &tree, |b, t| {
            b.iter(|| from_value::<Order>(black_box(t)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("serde_json", lines), &json, |b, j| {
            b.iter(|| Order::deserialize(black_box(j)).unwrap())
        });
    }
    group.finish();
}

fn bench_document(c: &mut Criterion) {
    let stamped = StampedOrder {
        order: order(32),
        placed: Timestamp::new(1_700_000_000, 123_000_000).unwrap(),
        receipt: Blob::from(vec![0xA5; 4096]),
    };
    let tree = encode(&stamped).unwrap();

    c.bench_function("document/encode", |b| {
        b.iter(|| encode(black_box(&stamped)).unwrap())
    });
    c.bench_function("document/decode", |b| {
        b.iter(|| decode::<StampedOrder>(black_box(&tree)).unwrap())
    });
    c.bench_function("document/untyped", |b| {
        b.iter(|| from_value::<Value>(black_box(&tree)).unwrap())
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_document);
criterion_main!(benches);
