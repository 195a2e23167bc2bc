//! Destructible obstacle blocks

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::grid::{Cell, GridModel};
use super::placement::find_free_cell;

/// Palette used in random colouring mode
pub const OBSTACLE_PALETTE: [Rgb; 7] = [
    Rgb::new(0x8b, 0x00, 0x00), // Dark red
    Rgb::new(0x00, 0x64, 0x00), // Dark green
    Rgb::new(0x00, 0x00, 0x80), // Navy
    Rgb::new(0x80, 0x00, 0x80), // Purple
    Rgb::new(0x8b, 0x45, 0x13), // Saddle brown
    Rgb::new(0x2f, 0x4f, 0x4f), // Dark slate gray
    Rgb::new(0x4b, 0x00, 0x82), // Indigo
];

/// How obstacle colours are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleColorMode {
    Random,
    Single(Rgb),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub cell: Cell,
    pub color: Rgb,
    pub health: u8,
}

/// Result of a projectile striking an obstacle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleHit {
    /// Obstacle state after the hit
    pub obstacle: Obstacle,
    pub destroyed: bool,
}

/// Fixed roster of obstacles for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// Place `count` single-hit obstacles on distinct free cells
    pub fn generate<R, F>(
        rng: &mut R,
        count: usize,
        grid: &GridModel,
        occupied: F,
        color_mode: ObstacleColorMode,
    ) -> Self
    where
        R: Rng,
        F: Fn(Cell) -> bool,
    {
        Self::generate_with_health(rng, count, grid, occupied, color_mode, 1)
    }

    /// Same as [`ObstacleField::generate`] with multi-hit obstacles
    pub fn generate_with_health<R, F>(
        rng: &mut R,
        count: usize,
        grid: &GridModel,
        occupied: F,
        color_mode: ObstacleColorMode,
        health: u8,
    ) -> Self
    where
        R: Rng,
        F: Fn(Cell) -> bool,
    {
        let mut obstacles: Vec<Obstacle> = Vec::with_capacity(count);
        for _ in 0..count {
            let taken = |c: Cell| occupied(c) || obstacles.iter().any(|o| o.cell == c);
            let Some(cell) = find_free_cell(rng, grid, taken) else {
                log::warn!("grid full after {} of {} obstacles", obstacles.len(), count);
                break;
            };
            let color = match color_mode {
                ObstacleColorMode::Random => OBSTACLE_PALETTE[rng.random_range(0..OBSTACLE_PALETTE.len())],
                ObstacleColorMode::Single(color) => color,
            };
            obstacles.push(Obstacle { cell, color, health });
        }
        log::info!("placed {} obstacles", obstacles.len());
        Self { obstacles }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.obstacles.iter().map(|o| o.cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells().any(|c| c == cell)
    }

    /// Damage the obstacle at `cell`, if any
    pub fn resolve_hit(&mut self, cell: Cell) -> Option<ObstacleHit> {
        let obstacle = self.obstacles.iter_mut().find(|o| o.cell == cell)?;
        obstacle.health = obstacle.health.saturating_sub(1);
        Some(ObstacleHit {
            obstacle: obstacle.clone(),
            destroyed: obstacle.health == 0,
        })
    }

    /// Remove the obstacle at `cell`; returns whether one was removed
    pub fn remove(&mut self, cell: Cell) -> bool {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.cell != cell);
        self.obstacles.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Boundary;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generate_distinct_and_free() {
        let grid = GridModel::new(20, Boundary::Walled);
        let mut rng = Pcg32::seed_from_u64(5);
        let snake = Cell::new(10, 10);
        let field = ObstacleField::generate(&mut rng, 30, &grid, |c| c == snake, ObstacleColorMode::Random);
        assert_eq!(field.len(), 30);
        let mut cells: Vec<_> = field.iter().map(|o| o.cell).collect();
        cells.sort_by_key(|c| (c.x, c.y));
        cells.dedup();
        assert_eq!(cells.len(), 30);
        assert!(!field.contains(snake));
        assert!(field.iter().all(|o| !grid.is_wall(o.cell) && o.health == 1));
        assert!(field.iter().all(|o| OBSTACLE_PALETTE.contains(&o.color)));
    }

    #[test]
    fn test_single_color_mode() {
        let grid = GridModel::new(20, Boundary::Wrap);
        let mut rng = Pcg32::seed_from_u64(5);
        let color = Rgb::new(1, 2, 3);
        let field = ObstacleField::generate(&mut rng, 5, &grid, |_| false, ObstacleColorMode::Single(color));
        assert!(field.iter().all(|o| o.color == color));
    }

    #[test]
    fn test_resolve_hit_multi_health() {
        let cell = Cell::new(7, 5);
        let mut field = ObstacleField::from_obstacles(vec![Obstacle {
            cell,
            color: OBSTACLE_PALETTE[0],
            health: 2,
        }]);
        let first = field.resolve_hit(cell).unwrap();
        assert!(!first.destroyed);
        assert_eq!(first.obstacle.health, 1);
        let second = field.resolve_hit(cell).unwrap();
        assert!(second.destroyed);
        assert!(field.remove(cell));
        assert!(field.resolve_hit(cell).is_none());
    }
}
