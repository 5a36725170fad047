//! Benchmarks for the keyword resolver.
//!
//! Covers each branch of the matching cascade so a regression in the
//! name scan or keyword checks shows up per branch.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use registrar_chat::resolver::resolve;
use registrar_core::records::{RecordStore, StudentRecord};

fn bench_cascade(c: &mut Criterion) {
    let store = RecordStore::seeded();
    let queries = [
        ("attendance", "What is Alice Johnson's attendance?"),
        ("grade", "Show me Bob's grades"),
        ("partial", "Tell me about David Brown"),
        ("list", "list students"),
        ("help", "what can you do"),
        ("miss", "When is the next school holiday?"),
    ];

    let mut group = c.benchmark_group("resolve");
    for (name, query) in queries {
        group.bench_function(name, |b| {
            b.iter(|| resolve(black_box(query), black_box(store.as_slice())))
        });
    }
    group.finish();
}

fn bench_large_roster_miss(c: &mut Criterion) {
    let records: Vec<StudentRecord> = (0..1_000)
        .map(|i| StudentRecord::new(format!("Student{} Surname", i), format!("S{:04}", i), "B", "90%", 70))
        .collect();
    let store = RecordStore::new(records);

    c.bench_function("resolve_miss_1000_records", |b| {
        b.iter(|| resolve(black_box("who is zelda?"), black_box(store.as_slice())))
    });
}

criterion_group!(benches, bench_cascade, bench_large_roster_miss);
criterion_main!(benches);
