//! Integration tests for the column resize engine.
//!
//! The engine's contract, checked across sizing modes and table shapes:
//! - `preservetable` keeps the sum of column widths (and the table width)
//! - `resizetable` changes only the pivot, and the table by the same amount
//! - no column is pushed below the minimum cell width
//! - a zero delta leaves the markup byte-identical
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{assert_close, assert_table_width, column_widths, load, numbers};
use fixtures::{cell, TableBuilder};
use tablegrid::sizing::{
    classify, convert_to_none_size, convert_to_percent_size, convert_to_pixel_size,
    get_raw_width, is_none_sizing, is_percent_sizing, is_pixel_sizing, SizingMode,
};
use tablegrid::{adjust_width, derive_grid, DeclaredLayout, ResizeBehaviour};
use test_case::test_case;

fn pixel_table() -> String {
    TableBuilder::new()
        .width("300px")
        .row(vec![
            cell("a").width("100px"),
            cell("b").width("100px"),
            cell("c").width("100px"),
        ])
        .row(vec![cell("d"), cell("e"), cell("f")])
        .build()
}

fn percent_table() -> String {
    TableBuilder::new()
        .width("50%")
        .row(vec![
            cell("a").width("20%"),
            cell("b").width("30%"),
            cell("c").width("50%"),
        ])
        .build()
}

// ============================================================================
// PRESERVE TABLE
// ============================================================================

#[test_case(0, 30.0; "grow first")]
#[test_case(1, -45.0; "shrink middle")]
#[test_case(1, 7.0; "odd split")]
#[test_case(2, 500.0; "clamped to capacity")]
#[test_case(0, -500.0; "clamped at floor")]
fn test_preserve_keeps_pixel_sum(pivot: usize, delta: f64) {
    let (mut doc, table) = load(&pixel_table());
    let port = DeclaredLayout::default();
    adjust_width(&mut doc, &port, table, delta, pivot, ResizeBehaviour::PreserveTable, SizingMode::Pixel);

    let widths = numbers(&column_widths(&doc, table));
    assert_eq!(widths.iter().sum::<f64>(), 300.0, "{widths:?}");
    assert!(widths.iter().all(|w| *w >= 10.0 && w.fract() == 0.0), "{widths:?}");
    assert_table_width(&doc, table, "300px");
}

#[test_case(0, 40.0; "grow first")]
#[test_case(2, -120.0; "shrink last")]
#[test_case(1, 1000.0; "clamped")]
fn test_preserve_keeps_percent_sum(pivot: usize, delta: f64) {
    let (mut doc, table) = load(&percent_table());
    let port = DeclaredLayout::new(800.0);
    adjust_width(&mut doc, &port, table, delta, pivot, ResizeBehaviour::PreserveTable, SizingMode::Percent);

    let widths = numbers(&column_widths(&doc, table));
    assert_close(widths.iter().sum::<f64>(), 100.0, 0.001);
    assert_table_width(&doc, table, "50%");
}

#[test]
fn test_preserve_moves_neighbours_proportionally() {
    let (mut doc, table) = load(&percent_table());
    let port = DeclaredLayout::new(800.0);
    // 400px table: 40px is 10 points, taken 3:5 from columns b and c
    adjust_width(&mut doc, &port, table, 40.0, 0, ResizeBehaviour::PreserveTable, SizingMode::Percent);

    let widths = numbers(&column_widths(&doc, table));
    assert_close(widths[0], 30.0, 1e-4);
    assert_close(widths[1], 26.25, 1e-4);
    assert_close(widths[2], 43.75, 1e-4);
}

#[test]
fn test_single_column_cannot_preserve() {
    let html = TableBuilder::new()
        .width("200px")
        .row(vec![cell("a").width("200px")])
        .build();
    let (mut doc, table) = load(&html);
    let before = doc.to_html();
    adjust_width(
        &mut doc,
        &DeclaredLayout::default(),
        table,
        25.0,
        0,
        ResizeBehaviour::PreserveTable,
        SizingMode::Pixel,
    );
    assert_eq!(doc.to_html(), before);
}

// ============================================================================
// RESIZE TABLE
// ============================================================================

#[test_case(0, 25.0, &["125px", "100px", "100px"], "325px"; "grow first")]
#[test_case(2, -40.0, &["100px", "100px", "60px"], "260px"; "shrink last")]
#[test_case(2, -95.0, &["100px", "100px", "10px"], "210px"; "clamped at floor")]
fn test_resize_table_changes_only_pivot(pivot: usize, delta: f64, expected: &[&str], table_width: &str) {
    let (mut doc, table) = load(&pixel_table());
    let port = DeclaredLayout::default();
    adjust_width(&mut doc, &port, table, delta, pivot, ResizeBehaviour::ResizeTable, SizingMode::Pixel);

    assert_eq!(column_widths(&doc, table), expected);
    assert_table_width(&doc, table, table_width);
}

#[test]
fn test_resize_table_percent_keeps_other_columns_rendered() {
    let (mut doc, table) = load(&percent_table());
    let port = DeclaredLayout::new(800.0);
    let before = port.column_widths(&doc, table);
    assert_eq!(before, vec![80.0, 120.0, 200.0]);

    adjust_width(&mut doc, &port, table, 40.0, 1, ResizeBehaviour::ResizeTable, SizingMode::Percent);

    assert_table_width(&doc, table, "55%");
    let after = port.column_widths(&doc, table);
    assert_close(after[0], 80.0, 0.01);
    assert_close(after[1], 160.0, 0.01);
    assert_close(after[2], 200.0, 0.01);
}

#[test]
fn test_unsized_pixel_table_keeps_no_width() {
    // Pixel sized through its columns only: the table gains no width
    let html = TableBuilder::new()
        .cols(&["100px", "100px"])
        .grid(1, 2)
        .build();
    let (mut doc, table) = load(&html);
    assert_eq!(classify(&doc, table), SizingMode::Pixel);

    adjust_width(
        &mut doc,
        &DeclaredLayout::default(),
        table,
        30.0,
        0,
        ResizeBehaviour::ResizeTable,
        SizingMode::Pixel,
    );
    assert_eq!(column_widths(&doc, table), ["130px", "100px"]);
    assert_table_width(&doc, table, "");
}

// ============================================================================
// SPANS AND NO-OPS
// ============================================================================

#[test]
fn test_spanning_cell_takes_sum_of_columns() {
    let html = TableBuilder::new()
        .width("300px")
        .row(vec![cell("a").colspan(2)])
        .row(vec![cell("b").width("100px"), cell("c").width("200px")])
        .build();
    let (mut doc, table) = load(&html);
    adjust_width(
        &mut doc,
        &DeclaredLayout::default(),
        table,
        20.0,
        0,
        ResizeBehaviour::PreserveTable,
        SizingMode::Pixel,
    );

    let wh = derive_grid(&doc, table);
    let width_of = |r: usize, c: usize| get_raw_width(&doc, wh.cell_at(r, c).unwrap().element);
    assert_eq!(width_of(0, 0), "300px");
    assert_eq!(width_of(1, 0), "120px");
    assert_eq!(width_of(1, 1), "180px");
}

#[test]
fn test_legacy_width_attributes_are_replaced() {
    let html = TableBuilder::new()
        .attr("width", "200")
        .row(vec![cell("a").width_attr("100"), cell("b").width_attr("100")])
        .build();
    let (mut doc, table) = load(&html);
    adjust_width(
        &mut doc,
        &DeclaredLayout::default(),
        table,
        20.0,
        1,
        ResizeBehaviour::ResizeTable,
        SizingMode::Pixel,
    );

    assert_table_width(&doc, table, "220px");
    assert!(!doc.has_attr(table, "width"));
    assert_eq!(column_widths(&doc, table), ["100px", "120px"]);
    let wh = derive_grid(&doc, table);
    assert!(wh.cells().iter().all(|c| !doc.has_attr(c.element, "width")));
}

#[test]
fn test_zero_delta_leaves_markup_untouched() {
    let fixtures = [
        pixel_table(),
        percent_table(),
        TableBuilder::new().grid(2, 2).build(),
        TableBuilder::new().cols(&["40px", "60px"]).grid(1, 2).build(),
    ];
    let port = DeclaredLayout::default();
    for html in &fixtures {
        let (mut doc, table) = load(html);
        let before = doc.to_html();
        let mode = classify(&doc, table);
        for behaviour in [ResizeBehaviour::PreserveTable, ResizeBehaviour::ResizeTable] {
            for pivot in 0..3 {
                adjust_width(&mut doc, &port, table, 0.0, pivot, behaviour, mode);
            }
        }
        assert_eq!(doc.to_html(), before);
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

#[test]
fn test_percent_then_pixel_round_trip() {
    let (mut doc, table) = load(&pixel_table());
    let port = DeclaredLayout::new(800.0);

    convert_to_percent_size(&mut doc, &port, table);
    assert!(is_percent_sizing(&doc, table));
    assert_table_width(&doc, table, "37.5%");
    assert_eq!(column_widths(&doc, table), ["33.3333%", "33.3333%", "33.3333%"]);

    convert_to_pixel_size(&mut doc, &port, table);
    assert!(is_pixel_sizing(&doc, table));
    assert_table_width(&doc, table, "300px");
    assert_eq!(column_widths(&doc, table), ["100px", "100px", "100px"]);
}

#[test]
fn test_none_strips_every_width() {
    let (mut doc, table) = load(&pixel_table());
    convert_to_none_size(&mut doc, table);

    assert!(is_none_sizing(&doc, table));
    let wh = derive_grid(&doc, table);
    assert!(wh
        .cells()
        .iter()
        .all(|c| get_raw_width(&doc, c.element).is_empty()));
}

#[test]
fn test_unsized_table_resizes_relative() {
    let (mut doc, table) = load(&TableBuilder::new().grid(2, 3).build());
    let port = DeclaredLayout::new(800.0);
    adjust_width(&mut doc, &port, table, 30.0, 0, ResizeBehaviour::PreserveTable, SizingMode::None);

    assert_eq!(classify(&doc, table), SizingMode::Percent);
    let widths = numbers(&column_widths(&doc, table));
    assert_close(widths.iter().sum::<f64>(), 100.0, 0.001);
    assert!(widths[0] > widths[1]);
}
