//! Test fixtures for generating table markup.
//!
//! This module provides builders for writing HTML tables programmatically,
//! useful for testing the grid model and resize engine with known inputs.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{cell, TableBuilder};
//!
//! let html = TableBuilder::new()
//!     .width("300px")
//!     .cols(&["100px", "200px"])
//!     .row(vec![cell("a"), cell("b")])
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

// ============================================================================
// Cell Builder
// ============================================================================

/// One `<td>`/`<th>` of a fixture table
#[derive(Debug, Clone, Default)]
pub struct CellSpec {
    text: String,
    header: bool,
    colspan: Option<usize>,
    rowspan: Option<usize>,
    width: Option<String>,
    width_attr: Option<String>,
}

/// Start a body cell holding `text`
pub fn cell(text: &str) -> CellSpec {
    CellSpec {
        text: text.to_string(),
        ..CellSpec::default()
    }
}

/// Start a `<th>` holding `text`
pub fn header(text: &str) -> CellSpec {
    CellSpec {
        header: true,
        ..cell(text)
    }
}

impl CellSpec {
    pub fn colspan(mut self, n: usize) -> Self {
        self.colspan = Some(n);
        self
    }

    pub fn rowspan(mut self, n: usize) -> Self {
        self.rowspan = Some(n);
        self
    }

    /// Inline `width` style
    pub fn width(mut self, w: &str) -> Self {
        self.width = Some(w.to_string());
        self
    }

    /// Legacy `width` attribute
    pub fn width_attr(mut self, w: &str) -> Self {
        self.width_attr = Some(w.to_string());
        self
    }

    fn render(&self) -> String {
        let tag = if self.header { "th" } else { "td" };
        let mut attrs = String::new();
        if let Some(n) = self.colspan {
            attrs.push_str(&format!(r#" colspan="{n}""#));
        }
        if let Some(n) = self.rowspan {
            attrs.push_str(&format!(r#" rowspan="{n}""#));
        }
        if let Some(w) = &self.width_attr {
            attrs.push_str(&format!(r#" width="{w}""#));
        }
        if let Some(w) = &self.width {
            attrs.push_str(&format!(r#" style="width: {w};""#));
        }
        format!("<{tag}{attrs}>{}</{tag}>", self.text)
    }
}

// ============================================================================
// Table Builder
// ============================================================================

/// Builder for a complete `<table>`
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    styles: Vec<(String, String)>,
    attrs: Vec<(String, String)>,
    cols: Option<Vec<String>>,
    head: Vec<Vec<CellSpec>>,
    body: Vec<Vec<CellSpec>>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inline `width` style on the table
    pub fn width(self, w: &str) -> Self {
        self.style("width", w)
    }

    pub fn style(mut self, prop: &str, value: &str) -> Self {
        self.styles.push((prop.to_string(), value.to_string()));
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// A `<colgroup>` with one `<col>` per width; `""` leaves a col unsized
    pub fn cols(mut self, widths: &[&str]) -> Self {
        self.cols = Some(widths.iter().map(|w| (*w).to_string()).collect());
        self
    }

    /// A row inside `<thead>`
    pub fn header_row(mut self, cells: Vec<CellSpec>) -> Self {
        self.head.push(cells);
        self
    }

    /// A row inside `<tbody>`
    pub fn row(mut self, cells: Vec<CellSpec>) -> Self {
        self.body.push(cells);
        self
    }

    /// `rows` rows of `columns` plain cells named `r{row}c{col}`
    pub fn grid(mut self, rows: usize, columns: usize) -> Self {
        for r in 0..rows {
            let cells = (0..columns).map(|c| cell(&format!("r{r}c{c}"))).collect();
            self.body.push(cells);
        }
        self
    }

    pub fn build(&self) -> String {
        let mut html = String::from("<table");
        for (name, value) in &self.attrs {
            html.push_str(&format!(r#" {name}="{value}""#));
        }
        if !self.styles.is_empty() {
            let style: Vec<String> = self
                .styles
                .iter()
                .map(|(p, v)| format!("{p}: {v};"))
                .collect();
            html.push_str(&format!(r#" style="{}""#, style.join(" ")));
        }
        html.push('>');

        if let Some(cols) = &self.cols {
            html.push_str("<colgroup>");
            for w in cols {
                if w.is_empty() {
                    html.push_str("<col>");
                } else {
                    html.push_str(&format!(r#"<col style="width: {w};">"#));
                }
            }
            html.push_str("</colgroup>");
        }
        if !self.head.is_empty() {
            html.push_str("<thead>");
            html.push_str(&render_rows(&self.head));
            html.push_str("</thead>");
        }
        html.push_str("<tbody>");
        html.push_str(&render_rows(&self.body));
        html.push_str("</tbody></table>");
        html
    }
}

fn render_rows(rows: &[Vec<CellSpec>]) -> String {
    rows.iter()
        .map(|cells| {
            let inner: String = cells.iter().map(CellSpec::render).collect();
            format!("<tr>{inner}</tr>")
        })
        .collect()
}
