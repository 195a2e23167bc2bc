//! Grid coordinate space
//!
//! Cells are signed so a candidate head may sit outside the grid; the caller
//! decides whether that is a wrap or a wall collision.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell offset by a direction
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Continuous position of the cell origin (grid units)
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Nearest cell to a continuous position
    pub fn from_vec2(pos: Vec2) -> Self {
        Self::new(pos.x.round() as i32, pos.y.round() as i32)
    }
}

/// Unit movement direction (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Parse a raw velocity; anything but a unit axis vector is rejected
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The two directions at right angles to this one
    pub fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
            Direction::Up | Direction::Down => [Direction::Right, Direction::Left],
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        let (dx, dy) = self.delta();
        Vec2::new(dx as f32, dy as f32)
    }
}

/// Edge behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    /// Leaving one side re-enters on the opposite side
    Wrap,
    /// The outer ring of cells is a lethal wall
    Walled,
}

/// Shared coordinate space for every entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridModel {
    pub tile_count: i32,
    pub boundary: Boundary,
}

impl GridModel {
    pub fn new(tile_count: i32, boundary: Boundary) -> Self {
        Self {
            tile_count,
            boundary,
        }
    }

    pub fn walls_enabled(&self) -> bool {
        self.boundary == Boundary::Walled
    }

    /// Cells kept clear of the border when placing food and obstacles
    pub fn wall_margin(&self) -> i32 {
        if self.walls_enabled() { 1 } else { 0 }
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.tile_count).contains(&cell.x) && (0..self.tile_count).contains(&cell.y)
    }

    /// True when the cell is part of the wall ring or beyond it
    pub fn is_wall(&self, cell: Cell) -> bool {
        let last = self.tile_count - 1;
        self.walls_enabled() && (cell.x <= 0 || cell.y <= 0 || cell.x >= last || cell.y >= last)
    }

    /// Wrap each axis into `[0, tile_count)`
    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell::new(
            cell.x.rem_euclid(self.tile_count),
            cell.y.rem_euclid(self.tile_count),
        )
    }

    /// Every cell inside the placement area, row by row
    pub fn placement_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let margin = self.wall_margin();
        let range = margin..(self.tile_count - margin);
        range
            .clone()
            .flat_map(move |y| range.clone().map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_both_axes() {
        let grid = GridModel::new(20, Boundary::Wrap);
        assert_eq!(grid.wrap(Cell::new(-1, 5)), Cell::new(19, 5));
        assert_eq!(grid.wrap(Cell::new(20, 20)), Cell::new(0, 0));
        assert_eq!(grid.wrap(Cell::new(7, 8)), Cell::new(7, 8));
    }

    #[test]
    fn test_wall_ring() {
        let grid = GridModel::new(20, Boundary::Walled);
        assert!(grid.is_wall(Cell::new(0, 10)));
        assert!(grid.is_wall(Cell::new(19, 10)));
        assert!(grid.is_wall(Cell::new(10, -1)));
        assert!(!grid.is_wall(Cell::new(1, 1)));
        assert!(!grid.is_wall(Cell::new(18, 18)));

        let open = GridModel::new(20, Boundary::Wrap);
        assert!(!open.is_wall(Cell::new(0, 0)));
    }

    #[test]
    fn test_perpendicular_never_reverses() {
        for dir in Direction::ALL {
            for p in dir.perpendicular() {
                assert_ne!(p, dir);
                assert_ne!(p, dir.opposite());
            }
        }
    }

    #[test]
    fn test_from_delta_rejects_non_unit() {
        assert_eq!(Direction::from_delta(1, 0), Some(Direction::Right));
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(2, 0), None);
    }

    #[test]
    fn test_placement_cells_respect_margin() {
        let grid = GridModel::new(5, Boundary::Walled);
        let cells: Vec<_> = grid.placement_cells().collect();
        assert_eq!(cells.len(), 9);
        assert!(cells.iter().all(|c| !grid.is_wall(*c)));
    }
}
