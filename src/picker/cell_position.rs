use crate::types::{Address, Coords, Dimensions, GridSize};

/// Index of the equal band `offset` falls into, clamped to `[0, count - 1]`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn band(offset: f64, extent: f64, count: usize) -> usize {
    if count == 0 || extent <= 0.0 || !offset.is_finite() {
        return 0;
    }
    let size = extent / count as f64;
    let index = (offset / size).floor().max(0.0);
    (index as usize).min(count - 1)
}

/// Map a pointer position onto the picker grid.
///
/// The picker at `position` with pixel `dimensions` is split into
/// `grid.columns x grid.rows` equal cells. Pointers outside the picker are
/// clamped to the nearest cell.
pub fn find_cell(position: Coords, dimensions: Dimensions, grid: GridSize, mouse: Coords) -> Address {
    Address::new(
        band(mouse.y - position.y, dimensions.height, grid.rows),
        band(mouse.x - position.x, dimensions.width, grid.columns),
    )
}
