use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dohbypass::dns::{HostCache, ResolutionResult};
use std::time::Duration;

/// Cache lookup and insert are pure in-memory operations on the hot path of
/// every resolution.
fn benchmark_cache_operations(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let _guard = rt.enter();

    let cache = HostCache::new(true);
    let addrs = ResolutionResult::new(vec!["192.0.2.1".into(), "192.0.2.2".into()]).unwrap();
    for i in 0..1_000 {
        cache.insert(&format!("host{}.example.com", i), addrs.clone(), Duration::from_secs(300));
    }

    c.bench_function("cache_lookup_hit", |b| {
        b.iter(|| black_box(cache.lookup(black_box("host500.example.com"))))
    });

    c.bench_function("cache_lookup_miss", |b| {
        b.iter(|| black_box(cache.lookup(black_box("absent.example.com"))))
    });

    c.bench_function("cache_insert", |b| {
        b.iter(|| {
            cache.insert(
                black_box("fresh.example.com"),
                addrs.clone(),
                Duration::from_secs(300),
            )
        })
    });

    let disabled = HostCache::disabled();
    c.bench_function("cache_lookup_disabled", |b| {
        b.iter(|| black_box(disabled.lookup(black_box("host500.example.com"))))
    });
}

criterion_group!(benches, benchmark_cache_operations);
criterion_main!(benches);
