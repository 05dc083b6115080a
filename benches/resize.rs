//! Benchmarks for grid derivation and column resizing.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tablegrid::{adjust_width, derive_grid, DeclaredLayout, Document, ResizeBehaviour, SizingMode};

/// A pixel-sized table of `rows x cols` cells, every third row spanning two columns
fn table_markup(rows: usize, cols: usize) -> String {
    let mut html = format!(r#"<table style="width: {}px;"><tbody>"#, cols * 50);
    for r in 0..rows {
        html.push_str("<tr>");
        let mut c = 0;
        while c < cols {
            if r % 3 == 2 && c + 1 < cols {
                html.push_str(r#"<td colspan="2">x</td>"#);
                c += 2;
            } else {
                html.push_str(r#"<td style="width: 50px;">x</td>"#);
                c += 1;
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// Benchmark parsing markup into the document arena
fn bench_parse(c: &mut Criterion) {
    let html = table_markup(100, 10);

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(html.len() as u64));
    group.bench_function("parse_100x10", |b| {
        b.iter(|| Document::parse(black_box(&html)).expect("Failed to parse"))
    });
    group.finish();
}

/// Compare grid derivation across table sizes
fn bench_derive_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_grid");

    for (rows, cols) in [(10, 5), (100, 10), (500, 20)] {
        let doc = Document::parse(&table_markup(rows, cols)).expect("Failed to parse");
        let table = doc.first_table().expect("No table");

        group.throughput(Throughput::Elements((rows * cols) as u64));
        group.bench_with_input(
            BenchmarkId::new("cells", rows * cols),
            &(doc, table),
            |b, (doc, table)| b.iter(|| derive_grid(black_box(doc), *table)),
        );
    }

    group.finish();
}

/// Benchmark one column resize under each behaviour
fn bench_adjust_width(c: &mut Criterion) {
    let base = Document::parse(&table_markup(50, 10)).expect("Failed to parse");
    let table = base.first_table().expect("No table");
    let port = DeclaredLayout::default();

    let mut group = c.benchmark_group("adjust_width");
    for behaviour in [ResizeBehaviour::PreserveTable, ResizeBehaviour::ResizeTable] {
        group.bench_function(format!("{behaviour:?}"), |b| {
            b.iter_batched(
                || base.clone(),
                |mut doc| {
                    adjust_width(
                        &mut doc,
                        &port,
                        table,
                        black_box(25.0),
                        3,
                        behaviour,
                        SizingMode::Pixel,
                    );
                    doc
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_derive_grid, bench_adjust_width);

criterion_main!(benches);
