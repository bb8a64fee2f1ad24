//! Criterion micro-benchmarks for slotmap churn, lookup, iteration and bulk
//! update, each against a `HashMap` baseline.

use std::collections::HashMap;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tessera::prelude::*;
use tessera_bench::{fragmented, particle, shuffled, Particle, POS, TAG, VEL};
use tessera_test_utils::init_tracing;

const N: usize = 10_000;

/// The same rows as a fragmented map, keyed the same way.
fn baseline(keys: &[Key]) -> HashMap<Key, Particle> {
    keys.iter()
        .enumerate()
        .map(|(i, &k)| (k, particle(i)))
        .collect()
}

fn bench_insert_remove(c: &mut Criterion) {
    init_tracing();
    let mut group = c.benchmark_group("insert_remove");

    let mut map: SlotMap<Particle> = SlotMap::new();
    group.bench_function("slotmap", |b| {
        b.iter(|| {
            let key = map.insert(particle(1));
            map.remove(black_box(key)).unwrap();
        });
    });

    let mut prealloc: SlotMap<Particle> =
        SlotMap::with_capacity(tessera::types::MAX_ID as usize);
    group.bench_function("slotmap_prealloc", |b| {
        b.iter(|| {
            let key = prealloc.insert(particle(1));
            prealloc.remove(black_box(key)).unwrap();
        });
    });

    let mut native: HashMap<u64, Particle> = HashMap::new();
    let mut next = 0u64;
    group.bench_function("hashmap", |b| {
        b.iter(|| {
            native.insert(next, particle(1));
            native.remove(black_box(&next));
            next += 1;
        });
    });
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let (map, keys) = fragmented(N, 42);
    let native = baseline(&keys);
    let order = shuffled(N, 7);

    let mut group = c.benchmark_group("lookup");
    group.bench_function("slotmap_get_all", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for &i in &order {
                if let Some((pos, _, _)) = map.get_all(keys[i]) {
                    sum += pos;
                }
            }
            black_box(sum)
        });
    });
    group.bench_function("slotmap_get_partial", |b| {
        b.iter(|| {
            let mut sum = 0u32;
            for &i in &order {
                if let Some(Ok(tag)) = map.get(keys[i], TAG) {
                    sum = sum.wrapping_add(*tag);
                }
            }
            black_box(sum)
        });
    });
    group.bench_function("hashmap", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for &i in &order {
                if let Some((pos, _, _)) = native.get(&keys[i]) {
                    sum += pos;
                }
            }
            black_box(sum)
        });
    });
    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let (map, keys) = fragmented(N, 42);
    let native = baseline(&keys);

    let mut group = c.benchmark_group("iterate");
    group.bench_function("slotmap_values", |b| {
        b.iter(|| black_box(map.values(POS).unwrap().sum::<f32>()));
    });
    group.bench_function("slotmap_values_all", |b| {
        b.iter(|| black_box(map.values_all().map(|(p, v, _)| p * v).sum::<f32>()));
    });
    group.bench_function("hashmap", |b| {
        b.iter(|| black_box(native.values().map(|(p, _, _)| p).sum::<f32>()));
    });
    group.finish();
}

fn bench_bulk_update(c: &mut Criterion) {
    let (mut map, keys) = fragmented(N, 42);
    let mut native = baseline(&keys);

    let mut group = c.benchmark_group("bulk_update");
    group.bench_function("slotmap_update_rw", |b| {
        b.iter(|| {
            map.update_rw((POS, VEL), POS, |(p, v): (&f32, &f32), _| p + v * 0.1)
                .unwrap();
        });
    });
    group.bench_function("hashmap", |b| {
        b.iter(|| {
            for (p, v, _) in native.values_mut() {
                *p += *v * 0.1;
            }
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_remove,
    bench_lookup,
    bench_iterate,
    bench_bulk_update
);
criterion_main!(benches);
