use criterion::{Criterion, black_box, criterion_group, criterion_main};

use mathreasoner::data::builtin_document;
use mathreasoner::{BenchmarkCatalog, CatalogDocument};

fn bench_catalog(c: &mut Criterion) {
    c.bench_function("builtin catalog construction", |b| {
        b.iter(|| BenchmarkCatalog::builtin().unwrap())
    });

    let json = builtin_document().to_json().unwrap();
    c.bench_function("catalog document decode and validate", |b| {
        b.iter(|| BenchmarkCatalog::from_document(CatalogDocument::from_json(black_box(&json)).unwrap()))
    });
}

criterion_group!(benches, bench_catalog);
criterion_main!(benches);
