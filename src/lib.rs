//! Snake Arcade - a grid snake game with projectiles and timed food effects
//!
//! Core modules:
//! - `sim`: Pure simulation (grid, snake, food, obstacles, projectiles, effects)
//! - `session`: Fixed-timestep scheduler, commands and death sequence
//! - `snapshot`: Read-only per-frame view handed to the renderer and HUD
//! - `renderer`: Stateless scene builder and WebGPU pipeline
//! - `platform`: Wall clock and key-value storage
//! - `settings` / `highscores`: Configuration and the top-10 leaderboard

pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use highscores::HighScores;
pub use session::{Command, Session};
pub use settings::{GameConfig, Settings};
pub use snapshot::RenderSnapshot;

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (tiles per side, pixels per tile)
    pub const TILE_COUNT: i32 = 20;
    pub const GRID_SIZE: f32 = 20.0;

    /// Snake spawn cell
    pub const SNAKE_START: (i32, i32) = (10, 10);

    /// Food disappears after this long (ms)
    pub const FOOD_LIFETIME_MS: f64 = 5000.0;

    /// Intoxication onset and duration (ms)
    pub const INTOXICATION_DELAY_MS: f64 = 1000.0;
    pub const INTOXICATION_DURATION_MS: f64 = 3000.0;

    /// Visual food effect onset and duration (ms)
    pub const FOOD_EFFECT_DELAY_MS: f64 = 200.0;
    pub const FOOD_EFFECT_DURATION_MS: f64 = 5000.0;

    /// Death animation length before the game-over overlay (ms)
    pub const DYING_DURATION_MS: f64 = 1500.0;

    /// Maximum elapsed time fed into the accumulator per frame (ms).
    /// Prevents a spiral of death after a tab stall.
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Obstacles placed at session start
    pub const OBSTACLE_COUNT: usize = 5;
    /// Score awarded for destroying an obstacle
    pub const OBSTACLE_BONUS: u32 = 5;

    /// Projectile lifetime in ticks
    pub const PROJECTILE_MAX_AGE: u32 = 40;

    /// Particle caps (oldest evicted first)
    pub const MAX_TRAIL_PARTICLES: usize = 100;
    pub const MAX_BURST_PARTICLES: usize = 50;

    /// Random placement attempts before falling back to a full scan
    pub const PLACEMENT_RETRIES: u32 = 256;

    /// HUD log length
    pub const MAX_LOG_MESSAGES: usize = 5;
}

/// A step on the speed ladder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLevel {
    pub multiplier: f32,
    /// Milliseconds between simulation ticks
    pub delay_ms: f64,
    pub label: &'static str,
}

/// Selectable tick periods, slowest first
pub const SPEEDS: [SpeedLevel; 6] = [
    SpeedLevel { multiplier: 1.0, delay_ms: 150.0, label: "1x" },
    SpeedLevel { multiplier: 1.5, delay_ms: 100.0, label: "1.5x" },
    SpeedLevel { multiplier: 2.0, delay_ms: 75.0, label: "2x" },
    SpeedLevel { multiplier: 3.0, delay_ms: 50.0, label: "3x" },
    SpeedLevel { multiplier: 4.0, delay_ms: 37.0, label: "4x" },
    SpeedLevel { multiplier: 10.0, delay_ms: 15.0, label: "10x" },
];
