//! Benchmarks for the streaming greedy coin selector.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use kelp_core::types::{Coin, Hash256};
use kelp_wallet::select_coins;

fn coins(n: u64) -> Vec<Coin> {
    (0..n)
        .map(|i| {
            let mut parent = [0u8; 32];
            parent[..8].copy_from_slice(&i.to_le_bytes());
            // Amounts cycle 1..=1000 so eviction actually fires.
            Coin::new(Hash256(parent), Hash256([0xAA; 32]), i % 1000 + 1)
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_coins");

    for n in [100u64, 1_000, 10_000] {
        let candidates = coins(n);
        let target = n * 50;
        group.bench_function(format!("{n}_coins"), |b| {
            b.iter(|| select_coins(black_box(&candidates), black_box(target)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select);
criterion_main!(benches);
