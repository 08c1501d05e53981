//! Throughput Benchmark for ncache
//!
//! Measures Set and Get on a single hot key, from one thread and from
//! several threads at once.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ncache::{Cache, Config};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const THREADS: usize = 4;
const OPS_PER_THREAD: usize = 1_000;

fn new_cache() -> Arc<Cache<&'static str>> {
    Arc::new(Cache::new(Some(Config::default())).expect("default config is valid"))
}

/// Benchmark SET operations
fn bench_set(c: &mut Criterion) {
    let cache = new_cache();

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_single_thread", |b| {
        b.iter(|| cache.set(black_box("k"), black_box("v"), Duration::ZERO));
    });

    group.throughput(Throughput::Elements((THREADS * OPS_PER_THREAD) as u64));
    group.bench_function("set_parallel", |b| {
        b.iter(|| {
            let workers: Vec<_> = (0..THREADS)
                .map(|_| {
                    let cache = cache.clone();
                    thread::spawn(move || {
                        for _ in 0..OPS_PER_THREAD {
                            cache.set("k", "v", Duration::ZERO);
                        }
                    })
                })
                .collect();
            for worker in workers {
                let _ = worker.join();
            }
        });
    });

    group.finish();
}

/// Benchmark GET operations
fn bench_get(c: &mut Criterion) {
    let cache = new_cache();
    cache.set("k", "v", Duration::ZERO);

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_single_thread", |b| {
        b.iter(|| black_box(cache.get(black_box("k"))));
    });

    group.throughput(Throughput::Elements((THREADS * OPS_PER_THREAD) as u64));
    group.bench_function("get_parallel", |b| {
        b.iter(|| {
            let workers: Vec<_> = (0..THREADS)
                .map(|_| {
                    let cache = cache.clone();
                    thread::spawn(move || {
                        for _ in 0..OPS_PER_THREAD {
                            black_box(cache.get("k"));
                        }
                    })
                })
                .collect();
            for worker in workers {
                let _ = worker.join();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_set, bench_get);
criterion_main!(benches);
