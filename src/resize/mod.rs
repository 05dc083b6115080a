//! Column width and row height adjustment.
//!
//! [`adjust_width`] applies one resize delta to a table under a
//! [`ResizeBehaviour`]. The delta arrives in pixels and is converted to the
//! table's unit once; all new widths are computed before the first write.

mod adjustments;
mod behaviour;
mod deltas;

pub use adjustments::{adjust_height, adjust_width};
pub use behaviour::ResizeBehaviour;
