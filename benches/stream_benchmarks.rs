use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use lazystream::prelude::*;

fn bench_element_wise(c: &mut Criterion) {
    let mut group = c.benchmark_group("element_wise");

    for size in [100i64, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("map_filter", size), size, |b, &size| {
            let s = Stream::range(0..size)
                .map(|x| black_box(x * 2))
                .filter(|x| x % 3 == 0);
            b.iter(|| black_box(s.sum::<i64>()));
        });

        group.bench_with_input(BenchmarkId::new("native_iter", size), size, |b, &size| {
            b.iter(|| {
                black_box(
                    (0..size)
                        .map(|x| black_box(x * 2))
                        .filter(|x| x % 3 == 0)
                        .sum::<i64>(),
                )
            });
        });
    }

    group.finish();
}

fn bench_whole_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("whole_sequence");

    for size in [1000i64, 10000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("sort", size), size, |b, &size| {
            let values: Vec<i64> = (0..size).map(|x| (x * 7919) % size).collect();
            b.iter(|| {
                let s = Stream::of(values.clone()).sort();
                black_box(s.count())
            });
        });

        group.bench_with_input(BenchmarkId::new("unique", size), size, |b, &size| {
            b.iter(|| {
                let s = Stream::range(0..size).map(|x| x % 100).unique();
                black_box(s.count())
            });
        });

        group.bench_with_input(BenchmarkId::new("group_by", size), size, |b, &size| {
            b.iter(|| {
                let s = Stream::range(0..size).group_by(|x| x % 10);
                black_box(s.map(|(_, g)| g.count()).sum::<usize>())
            });
        });
    }

    group.finish();
}

fn bench_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv");
    let size = 5000i64;
    group.throughput(Throughput::Elements(size as u64));

    let mut text = Vec::new();
    Stream::range(0..size)
        .map(|x| (x, x as f64 / 3.0, "label"))
        .write_csv(&mut text, &[Some("id"), Some("ratio"), Some("name")], &Dialect::default())
        .unwrap();

    group.bench_function("write", |b| {
        let rows = Stream::range(0..size).map(|x| (x, x as f64 / 3.0, "label"));
        b.iter(|| {
            let mut out = Vec::with_capacity(text.len());
            black_box(rows.write_csv(&mut out, &[], &Dialect::default()).unwrap())
        });
    });

    group.bench_function("read_sniffed", |b| {
        b.iter(|| {
            let rows = Stream::read_csv(
                std::io::Cursor::new(text.clone()),
                vec![Column::int(), Column::float()],
                CsvReadOptions::default(),
            )
            .unwrap();
            black_box(rows.count())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_element_wise, bench_whole_sequence, bench_csv);
criterion_main!(benches);
