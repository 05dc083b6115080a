//! Structured error types for tablegrid.
//!
//! Malformed tables are never errors (spans are clamped, empty grids are
//! no-ops); these cover markup that cannot be read and bad host input.

/// All errors that can occur while loading tables or host configuration.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// General parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The markup holds no `<table>` element.
    #[error("No table element found")]
    NoTable,

    /// Host configuration or measurements JSON could not be read.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;

impl From<String> for TableError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for TableError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<TableError> for wasm_bindgen::JsValue {
    fn from(e: TableError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
