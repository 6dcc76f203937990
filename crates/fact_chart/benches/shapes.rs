mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use fact_chart::prelude::{ShapeKind, ShapeOptions, ShapeRegistry};
use fact_chart::shapes::{fibonacci_sphere, HyperboloidParams};
use serde_json::{json, Map, Value};

fn bench_builtin_shapes(c: &mut Criterion) {
    let options = ShapeOptions::new();
    let mut group = c.benchmark_group("shapes_build");
    for kind in ShapeKind::ALL {
        let primitives = kind.build(&options).primitive_count();
        group.throughput(common::elements_throughput(primitives));
        group.bench_function(kind.name(), |b| {
            b.iter(|| black_box(kind.build(black_box(&options))))
        });
    }
    group.finish();
}

fn bench_registry_create(c: &mut Criterion) {
    let registry = ShapeRegistry::with_builtins();
    let mut raw = Map::new();
    raw.insert("lineCount".into(), json!(200));
    raw.insert("lineType".into(), Value::from("translation"));
    raw.insert("mirrored".into(), Value::from(true));

    c.bench_function("registry_create_sphere_200", |b| {
        b.iter(|| black_box(registry.create(black_box("sphere"), &raw)))
    });
}

fn bench_hyperboloid_surface(c: &mut Criterion) {
    let mut group = c.benchmark_group("hyperboloid_surface");
    for line_count in [24usize, 96, 384] {
        let params = HyperboloidParams {
            line_count,
            ..HyperboloidParams::DEFAULT
        };
        group.throughput(common::elements_throughput(line_count * 2));
        group.bench_function(format!("lines_{line_count}"), |b| {
            b.iter(|| black_box(params.lateral_surface()))
        });
    }
    group.finish();
}

fn bench_fibonacci_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("fibonacci_sphere");
    for count in [100usize, 1000, 4096] {
        group.throughput(common::elements_throughput(count));
        group.bench_function(format!("points_{count}"), |b| {
            b.iter(|| black_box(fibonacci_sphere(black_box(count))))
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = bench_builtin_shapes, bench_registry_create, bench_hyperboloid_surface, bench_fibonacci_sphere
}
criterion_main!(benches);
