//! Benchmark for the parse -> format -> chunk pipeline
//! Run: cargo bench -p logqa-core --bench pipeline

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use logqa_core::{format_entries, Chunker, ChunkerConfig, LogParser};
use std::hint::black_box;

const LINE: &str = "[2026-02-10 14:30:45] payment-service ERROR: Failed to connect to database: connection refused";
const NOISE: &str = "    at com.example.payments.Db.connect(Db.java:42)";
const BAD_TS: &str = "[2026-02-30 14:30:45] payment-service WARN: retrying";

fn sample_log(lines: usize) -> String {
    (0..lines)
        .map(|i| match i % 10 {
            3 => NOISE,
            7 => BAD_TS,
            _ => LINE,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_parse_line(c: &mut Criterion) {
    let parser = LogParser::new();

    c.bench_function("parse_line_single", |b| {
        b.iter(|| parser.parse_line(1, black_box(LINE)))
    });
}

fn bench_parse_batch(c: &mut Criterion) {
    let parser = LogParser::new();
    let mut group = c.benchmark_group("parse_batch");

    for size in [100, 1_000, 10_000] {
        let raw = sample_log(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &raw, |b, raw| {
            b.iter(|| parser.parse(black_box(raw)))
        });
    }

    group.finish();
}

fn bench_format_and_chunk(c: &mut Criterion) {
    let parser = LogParser::new();
    let entries = parser.parse(&sample_log(1_000)).entries;
    let context = format_entries(&entries);

    c.bench_function("format_1000_entries", |b| {
        b.iter(|| format_entries(black_box(&entries)))
    });

    let mut group = c.benchmark_group("chunk");
    group.throughput(Throughput::Bytes(context.len() as u64));

    for (size, overlap) in [(1000, 0), (500, 100)] {
        let chunker = Chunker::new(ChunkerConfig::new(size, overlap)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("split", format!("{}/{}", size, overlap)),
            &context,
            |b, text| b.iter(|| chunker.split(black_box(text))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse_line, bench_parse_batch, bench_format_and_chunk);
criterion_main!(benches);
