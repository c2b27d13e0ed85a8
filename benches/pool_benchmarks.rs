use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use growpool::{Config, ThreadPool};
use std::hint::black_box;

// Benchmark 1: submit + get round trip for trivial tasks
fn bench_submit_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_overhead");

    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("trivial", size), &size, |b, &size| {
            let pool = ThreadPool::with_config(Config::default());
            b.iter(|| {
                let handles: Vec<_> = (0..size)
                    .map(|i| pool.submit(move || black_box(i)).unwrap())
                    .collect();
                for handle in &handles {
                    black_box(handle.get().unwrap());
                }
            });
        });
    }

    group.finish();
}

// Benchmark 2: CPU-bound payloads across the pool
fn bench_cpu_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_bound");
    group.throughput(Throughput::Elements(256));

    group.bench_function("sum_1k_each", |b| {
        let pool = ThreadPool::with_config(Config::default());
        b.iter(|| {
            let handles: Vec<_> = (0..256u64)
                .map(|i| pool.submit(move || (0..1_000u64).map(|x| x ^ i).sum::<u64>()).unwrap())
                .collect();
            for handle in &handles {
                black_box(handle.get().unwrap());
            }
        });
    });

    group.finish();
}

// Benchmark 3: cold start of an on-demand pool growing under load
fn bench_reactive_growth(c: &mut Criterion) {
    c.bench_function("reactive_growth_cold_start", |b| {
        b.iter(|| {
            let pool = ThreadPool::with_config(Config::on_demand(8));
            let handles: Vec<_> = (0..512u64)
                .map(|i| pool.submit(move || black_box(i * i)).unwrap())
                .collect();
            for handle in &handles {
                black_box(handle.get().unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_submit_overhead,
    bench_cpu_bound,
    bench_reactive_growth
);
criterion_main!(benches);
