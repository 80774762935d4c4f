use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use capdex::capture::{Capture, Registry};
use capdex::store::Index;

fn capture(id: i32, number: i32, name: &str) -> Capture {
    let mut capture = Capture::new();
    capture.set_id(id);
    capture.set_capture_number(number);
    capture.set_name(name);
    capture.set_pattern(r"\w+");
    capture
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut index = Index::new();
    for n in 0..100 {
        index.put(n, n);
    }
    c.bench_function("index get 100", |b| b.iter(|| index.get(black_box(&50))));
    for n in 100..10_000 {
        index.put(n, n);
    }
    c.bench_function("index get 10k", |b| b.iter(|| index.get(black_box(&5_000))));

    // a compiled pattern rarely holds more than a few dozen captures
    c.bench_function("registry build 32", |b| {
        b.iter(|| {
            let mut registry = Registry::new();
            for id in 0..32 {
                registry.add(&capture(id, id + 1, &format!("GROUP{id}:g{id}")), false);
            }
            registry
        })
    });

    let mut registry = Registry::new();
    for id in 0..32 {
        registry.add(&capture(id, id + 1, &format!("GROUP{id}:g{id}")), false);
    }
    c.bench_function("resolve by capture number", |b| {
        b.iter(|| registry.get_by_capture_number(black_box(16)))
    });
    c.bench_function("resolve by subname", |b| {
        b.iter(|| registry.get_by_subname(black_box("g16")))
    });
    c.bench_function("walk 32", |b| b.iter(|| registry.walk().count()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
