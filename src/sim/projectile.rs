//! Player-fired projectiles
//!
//! Projectiles never wrap, even when the snake does: a shot that leaves
//! `[0, tile_count)` is gone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction, GridModel};
use super::obstacle::{ObstacleField, ObstacleHit};
use crate::consts::PROJECTILE_MAX_AGE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Continuous position in grid units
    pub pos: Vec2,
    /// Grid units per tick
    pub vel: Vec2,
    pub age: u32,
    pub max_age: u32,
}

impl Projectile {
    pub fn cell(&self) -> Cell {
        Cell::from_vec2(self.pos)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectileSystem {
    projectiles: Vec<Projectile>,
}

impl ProjectileSystem {
    /// Launch from `origin` along the snake's travel direction
    ///
    /// A stationary snake cannot shoot. Returns whether a projectile was
    /// created.
    pub fn fire(&mut self, origin: Cell, velocity: Option<Direction>, speed_multiplier: f32) -> bool {
        let Some(dir) = velocity else {
            return false;
        };
        self.projectiles.push(Projectile {
            pos: origin.as_vec2(),
            vel: dir.as_vec2() * speed_multiplier,
            age: 0,
            max_age: PROJECTILE_MAX_AGE,
        });
        true
    }

    /// Advance all projectiles one tick
    ///
    /// Each projectile moves, ages, and is dropped once too old, outside the
    /// grid, or inside the wall ring when walls are enabled. Survivors are
    /// tested against obstacles by rounded cell; a hit calls `on_hit` and
    /// consumes the projectile (one hit per projectile per tick).
    pub fn tick<F>(&mut self, obstacles: &mut ObstacleField, grid: &GridModel, mut on_hit: F)
    where
        F: FnMut(ObstacleHit),
    {
        let tile = grid.tile_count as f32;
        self.projectiles.retain_mut(|p| {
            p.pos += p.vel;
            p.age += 1;

            if p.age > p.max_age {
                return false;
            }
            if p.pos.x < 0.0 || p.pos.y < 0.0 || p.pos.x >= tile || p.pos.y >= tile {
                return false;
            }
            let cell = p.cell();
            if grid.is_wall(cell) {
                return false;
            }
            match obstacles.resolve_hit(cell) {
                Some(hit) => {
                    on_hit(hit);
                    false
                }
                None => true,
            }
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Cells currently covered by projectiles
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.projectiles.iter().map(Projectile::cell)
    }
}
