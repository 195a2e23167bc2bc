//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, wall-clock time passed in explicitly
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod color;
pub mod effects;
pub mod food;
pub mod grid;
pub mod obstacle;
pub mod particle;
pub mod placement;
pub mod projectile;
pub mod snake;
pub mod state;
pub mod tick;

pub use color::{Color, ColorParseError, Rgb, SnakePattern, segment_color};
pub use effects::{EffectEvent, EffectPhase, StatusEffects};
pub use food::{FOOD_TABLE, Food, FoodEffect, FoodKind, FoodSpawner};
pub use grid::{Boundary, Cell, Direction, GridModel};
pub use obstacle::{Obstacle, ObstacleColorMode, ObstacleField};
pub use particle::{Particle, ParticleSystem};
pub use projectile::{Projectile, ProjectileSystem};
pub use snake::Snake;
pub use state::{DeathCause, GamePhase, GameState};
pub use tick::{TickInput, tick};
