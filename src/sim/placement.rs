//! Random free-cell placement shared by food and obstacles

use rand::Rng;

use super::grid::{Cell, GridModel};
use crate::consts::PLACEMENT_RETRIES;

/// Pick a uniformly random cell inside the placement area for which
/// `occupied` returns false.
///
/// Rejection sampling first; after [`PLACEMENT_RETRIES`] misses every free
/// cell is collected and one is drawn from that list. Returns None only when
/// the area is saturated.
pub fn find_free_cell<R, F>(rng: &mut R, grid: &GridModel, occupied: F) -> Option<Cell>
where
    R: Rng,
    F: Fn(Cell) -> bool,
{
    let margin = grid.wall_margin();
    let (lo, hi) = (margin, grid.tile_count - margin);
    if lo >= hi {
        return None;
    }

    for _ in 0..PLACEMENT_RETRIES {
        let cell = Cell::new(rng.random_range(lo..hi), rng.random_range(lo..hi));
        if !occupied(cell) {
            return Some(cell);
        }
    }

    log::debug!("placement retries exhausted, scanning free cells");
    let free: Vec<Cell> = grid.placement_cells().filter(|c| !occupied(*c)).collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.random_range(0..free.len())])
    }
}
