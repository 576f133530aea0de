//! Toroidal grid geometry
//!
//! The board has no walls: a coordinate leaving one edge re-enters at the
//! opposite edge. All functions here are pure.

use glam::IVec2;

/// A board position in cell units. Both components are in `0..dimension`
/// for any cell that has passed through [`wrap_cell`].
pub type Cell = IVec2;

/// Wrap a single coordinate onto `0..dimension`.
///
/// Movement is by single cells, so the only out-of-range inputs that can
/// occur are `-1` and `dimension` - but any underflow maps to the far edge
/// and any overflow maps to zero, matching the portal behavior.
#[inline]
pub fn wrap(coord: i32, dimension: i32) -> i32 {
    if coord < 0 {
        dimension - 1
    } else if coord >= dimension {
        0
    } else {
        coord
    }
}

/// Wrap both components of a cell onto the board.
#[inline]
pub fn wrap_cell(cell: Cell, dimension: i32) -> Cell {
    Cell::new(wrap(cell.x, dimension), wrap(cell.y, dimension))
}

/// True if the cell touches any board edge (where the portal highlight is
/// drawn and wrapping occurs).
#[inline]
pub fn on_edge(cell: Cell, dimension: i32) -> bool {
    cell.x == 0 || cell.x == dimension - 1 || cell.y == 0 || cell.y == dimension - 1
}
