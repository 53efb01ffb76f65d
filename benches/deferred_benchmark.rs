use criterion::{criterion_group, criterion_main, Criterion};
use lite_lazy::Deferred;
use std::time::Duration;
use tokio::sync::oneshot;

/// Benchmark: Deferred creation comparison (custom AtomicU8+waiter list vs tokio oneshot)
/// 基准测试：Deferred 创建对比（自定义 AtomicU8+等待者列表 vs tokio oneshot）
fn bench_deferred_creation_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("deferred_creation");

    group.bench_function("lite_lazy", |b| {
        b.iter(|| {
            let _d = Deferred::<u32>::new();
        });
    });

    group.bench_function("tokio_oneshot", |b| {
        b.iter(|| {
            let (_tx, _rx) = oneshot::channel::<u32>();
        });
    });

    group.finish();
}

/// Benchmark: resolve + wait round trip comparison
/// 基准测试：解析 + 等待往返对比
fn bench_resolve_wait_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("deferred_resolve_wait");

    group.bench_function("lite_lazy", |b| {
        let runtime = tokio::runtime::Runtime::new().unwrap();

        b.to_async(&runtime).iter_custom(|iters| async move {
            let mut total_duration = Duration::from_secs(0);

            for _ in 0..iters {
                let d = Deferred::<u32>::new();

                let start = std::time::Instant::now();

                d.resolve(42);
                let _value = d.wait().await;

                total_duration += start.elapsed();
            }

            total_duration
        });
    });

    group.bench_function("tokio_oneshot", |b| {
        let runtime = tokio::runtime::Runtime::new().unwrap();

        b.to_async(&runtime).iter_custom(|iters| async move {
            let mut total_duration = Duration::from_secs(0);

            for _ in 0..iters {
                let (tx, rx) = oneshot::channel::<u32>();

                let start = std::time::Instant::now();

                tx.send(42).unwrap();
                let _ = rx.await.unwrap();

                total_duration += start.elapsed();
            }

            total_duration
        });
    });

    group.finish();
}

/// Benchmark: broadcast fan-out to multiple awaiters
/// 基准测试：向多个等待者广播扇出
fn bench_broadcast_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("deferred_broadcast");

    for waiters in [1usize, 4, 16] {
        group.bench_function(format!("lite_lazy_{waiters}_waiters"), |b| {
            let runtime = tokio::runtime::Runtime::new().unwrap();

            b.to_async(&runtime).iter(|| async move {
                let d = Deferred::<u32>::new();

                let mut handles = Vec::with_capacity(waiters);
                for _ in 0..waiters {
                    let w = d.clone();
                    handles.push(tokio::spawn(async move { w.wait().await }));
                }

                d.resolve(42);

                for handle in handles {
                    let _ = handle.await.unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_deferred_creation_comparison,
    bench_resolve_wait_comparison,
    bench_broadcast_fan_out
);
criterion_main!(benches);
