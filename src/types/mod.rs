//! Plain value types shared by the grid model, resize engine and picker.

mod geometry;
mod selection;

pub use geometry::*;
pub use selection::*;
