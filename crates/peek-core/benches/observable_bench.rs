//! Benchmarks for observable container reads and writes.
//!
//! Run with: `cargo bench --package peek-core --bench observable_bench`
//!
//! Each observable benchmark has a plain-variable baseline so the cost of the
//! hook dispatch and the equality check can be read off directly.
//!
//! | Benchmark group   | Observable case           | Baseline             |
//! |-------------------|---------------------------|----------------------|
//! | `int_get`         | `ObservableValue::get`    | copy of a local      |
//! | `int_set`         | `ObservableValue::set`    | store to a local     |
//! | `int_set_get`     | set then get              | store then load      |
//! | `vec_equal_write` | equal write, both policies | n/a                 |

use criterion::{Criterion, criterion_group, criterion_main};
use peek_core::{
    EqualWritePolicy, NopObserver, ObservableConfig, ObservableValue, SharedObservable,
};
use std::hint::black_box;

// ============================================================================
// Integer Read/Write Benchmarks
// ============================================================================

fn bench_int_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("int_get");

    let obs = ObservableValue::new(42i64);
    group.bench_function("observable", |b| {
        b.iter(|| black_box(obs.get()));
    });

    let shared = SharedObservable::new(42i64);
    group.bench_function("shared", |b| {
        b.iter(|| black_box(shared.get()));
    });

    let value = 42i64;
    group.bench_function("std", |b| {
        b.iter(|| black_box(value));
    });

    group.finish();
}

fn bench_int_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("int_set");

    let mut obs = ObservableValue::new(42i64);
    let mut i = 0i64;
    group.bench_function("observable", |b| {
        b.iter(|| {
            i = i.wrapping_add(1);
            obs.set(black_box(i));
        });
    });

    let mut value = 0i64;
    let mut j = 0i64;
    group.bench_function("std", |b| {
        b.iter(|| {
            j = j.wrapping_add(1);
            value = black_box(j);
        });
    });
    black_box(value);

    group.finish();
}

fn bench_int_set_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("int_set_get");

    let mut obs = ObservableValue::new(42i64);
    let mut i = 0i64;
    group.bench_function("observable", |b| {
        b.iter(|| {
            i = i.wrapping_add(1);
            obs.set(black_box(i));
            black_box(obs.get())
        });
    });

    let mut value = 0i64;
    let mut j = 0i64;
    group.bench_function("std", |b| {
        b.iter(|| {
            j = j.wrapping_add(1);
            value = black_box(j);
            black_box(value)
        });
    });

    group.finish();
}

// ============================================================================
// Equal-Write Benchmarks
// ============================================================================

fn bench_vec_equal_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("vec_equal_write");
    let payload: Vec<u32> = (0..256).collect();

    for policy in EqualWritePolicy::ALL {
        let mut obs = ObservableValue::with_config(
            payload.clone(),
            NopObserver,
            ObservableConfig::new(policy),
        );
        group.bench_function(policy.as_str(), |b| {
            b.iter(|| obs.set(black_box(payload.clone())));
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_int_get,
    bench_int_set,
    bench_int_set_get,
    bench_vec_equal_write,
);

criterion_main!(benches);
