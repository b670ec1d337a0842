//! Sampling functions onto grids

use crate::grid::SparseGrid;
use pointset_core::Point;

/// Evaluate `f` at the centre of every cell in the grid's window and store
/// the result as that cell's mark
///
/// Walks the full dense cell range, so the cost grows with the window's
/// cell count rather than with the number of marked cells.
pub fn evaluate_at_cell_centers<M, F>(grid: &mut SparseGrid<M>, mut f: F)
where
    F: FnMut(&Point) -> M,
{
    for cell in grid.dense_cells() {
        let center = grid.region(&cell).centroid();
        let mark = f(&center);
        grid.set(cell, mark);
    }
}
