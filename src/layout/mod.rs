//! Rendered geometry of tables.
//!
//! This module handles:
//! - The [`StylePort`] through which rendered sizes are read
//! - A declared-size implementation for hosts without a rendering engine
//! - Pre-computing column/row edges for bars and hit testing

mod port;
mod table_layout;

pub use port::{
    DeclaredLayout, StylePort, DEFAULT_COLUMN_WIDTH, DEFAULT_CONTAINER_WIDTH, DEFAULT_ROW_HEIGHT,
};
pub use table_layout::{CellRect, TableLayout};
