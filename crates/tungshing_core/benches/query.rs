use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tungshing_core::{Almanac, QueryContext};

fn bench_query(c: &mut Criterion) {
    let almanac = Almanac::default();
    let ctx = QueryContext::default();
    let late = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap().and_hms_opt(23, 5, 0).unwrap();

    // Warm the term and month caches.
    almanac.query_at(late, &ctx).unwrap();

    c.bench_function("query late zi hour (warm)", |b| {
        b.iter(|| almanac.query_at(black_box(late), &ctx).unwrap())
    });

    c.bench_function("query cold almanac", |b| {
        b.iter(|| Almanac::default().query_at(black_box(late), &ctx).unwrap())
    });
}

criterion_group!(benches, bench_query);
criterion_main!(benches);
