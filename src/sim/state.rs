//! Game state definitions

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::color::{Rgb, SnakePattern};
use super::effects::StatusEffects;
use super::food::FoodSpawner;
use super::grid::{Cell, GridModel};
use super::obstacle::ObstacleField;
use super::particle::ParticleSystem;
use super::projectile::ProjectileSystem;
use super::snake::Snake;
use crate::consts::{MAX_LOG_MESSAGES, SNAKE_START};
use crate::settings::GameConfig;
use crate::SPEEDS;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Running; the snake may still be at rest waiting for a direction
    Playing,
    /// Death animation in progress
    Dying {
        /// Wall-clock ms when the collision happened
        since: f64,
    },
    /// Run ended
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Wall,
    SelfBite,
    Obstacle,
    Toxic,
}

impl DeathCause {
    pub fn message(&self) -> &'static str {
        match self {
            DeathCause::Wall => "Hit the wall!",
            DeathCause::SelfBite => "Bit yourself!",
            DeathCause::Obstacle => "Crashed into an obstacle!",
            DeathCause::Toxic => "☠️ Toxic! You died!",
        }
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: GameConfig,
    pub grid: GridModel,
    pub snake: Snake,
    pub food: FoodSpawner,
    pub obstacles: ObstacleField,
    pub projectiles: ProjectileSystem,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    pub effects: StatusEffects,
    pub score: u32,
    /// Index into [`SPEEDS`]
    pub speed_index: usize,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub death: Option<DeathCause>,
    /// Latest status line
    pub status: String,
    /// Most recent status lines, oldest first
    pub log: VecDeque<String>,
}

impl GameState {
    /// Create a fresh run: snake at rest in the centre, obstacles placed,
    /// first food spawned
    pub fn new(config: GameConfig, seed: u64, now: f64) -> Self {
        let grid = config.grid;
        let mut rng = Pcg32::seed_from_u64(seed);
        let start = Cell::new(SNAKE_START.0, SNAKE_START.1);

        let obstacles = ObstacleField::generate(
            &mut rng,
            config.obstacle_count,
            &grid,
            |cell| cell == start,
            config.obstacle_colors,
        );

        let mut state = Self {
            seed,
            rng,
            config,
            grid,
            snake: Snake::new(start),
            food: FoodSpawner::default(),
            obstacles,
            projectiles: ProjectileSystem::default(),
            particles: ParticleSystem::default(),
            effects: StatusEffects::default(),
            score: 0,
            speed_index: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            death: None,
            status: String::new(),
            log: VecDeque::with_capacity(MAX_LOG_MESSAGES),
        };
        state.spawn_food(now);
        state.notify("Ready");
        state
    }

    /// Spawn food on a cell free of snake, obstacles and projectiles.
    /// Leaves the slot empty when the board is saturated.
    pub fn spawn_food(&mut self, now: f64) {
        let snake = &self.snake;
        let obstacles = &self.obstacles;
        let projectiles = &self.projectiles;
        self.food.spawn(
            &mut self.rng,
            &self.grid,
            |cell| {
                snake.check_self_collision(cell)
                    || obstacles.contains(cell)
                    || projectiles.cells().any(|c| c == cell)
            },
            now,
        );
    }

    /// Set the status line and append it to the HUD log
    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        if self.log.len() == MAX_LOG_MESSAGES {
            self.log.pop_front();
        }
        self.log.push_back(message.clone());
        self.status = message;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Start the death sequence
    pub fn die(&mut self, cause: DeathCause, now: f64) {
        self.phase = GamePhase::Dying { since: now };
        self.death = Some(cause);
        self.notify(cause.message());
    }

    /// Colour and pattern currently shown, including any food effect override
    pub fn display_style(&self) -> (Rgb, SnakePattern) {
        match self.effects.visual.display() {
            Some(effect) => (effect.color, effect.pattern),
            None => (self.config.snake_color, self.config.pattern),
        }
    }

    /// Milliseconds between ticks at the current speed
    pub fn tick_period_ms(&self) -> f64 {
        SPEEDS[self.speed_index].delay_ms
    }

    /// Step the speed ladder by `delta`, wrapping at both ends.
    ///
    /// Only honoured while the snake is moving or after game over; returns
    /// whether the speed changed.
    pub fn change_speed(&mut self, delta: isize) -> bool {
        if !(self.snake.is_moving() || self.is_game_over()) {
            return false;
        }
        let len = SPEEDS.len() as isize;
        self.speed_index = (self.speed_index as isize + delta).rem_euclid(len) as usize;
        self.notify(format!("Speed: {}", SPEEDS[self.speed_index].label));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new(GameConfig::default(), 42, 0.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.snake.len(), 1);
        assert!(!state.snake.is_moving());
        assert_eq!(state.obstacles.len(), 5);

        let start = Cell::new(SNAKE_START.0, SNAKE_START.1);
        assert!(!state.obstacles.contains(start));

        let food = state.food.current().expect("food spawned");
        assert_ne!(food.cell, start);
        assert!(!state.obstacles.contains(food.cell));
        assert_eq!(state.status, "Ready");
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(GameConfig::default(), 7, 0.0);
        let b = GameState::new(GameConfig::default(), 7, 0.0);
        let cells = |s: &GameState| s.obstacles.cells().collect::<Vec<_>>();
        assert_eq!(cells(&a), cells(&b));
        assert_eq!(a.food.current().map(|f| f.cell), b.food.current().map(|f| f.cell));
    }

    #[test]
    fn test_food_avoids_projectiles() {
        use super::super::grid::Direction;

        let mut state = GameState::new(GameConfig::default(), 3, 0.0);
        state.obstacles = ObstacleField::default();
        state.food = FoodSpawner::default();
        let free = Cell::new(3, 3);
        let cells: Vec<Cell> = state.grid.placement_cells().collect();
        for cell in cells {
            if cell != free && cell != state.snake.head() {
                state.projectiles.fire(cell, Some(Direction::Up), 1.0);
            }
        }

        state.spawn_food(5.0);
        assert_eq!(state.food.current().map(|f| f.cell), Some(free));

        // The last free cell taken too: spawn is deferred
        state.food = FoodSpawner::default();
        state.projectiles.fire(free, Some(Direction::Up), 1.0);
        state.spawn_food(6.0);
        assert!(state.food.current().is_none());
    }

    #[test]
    fn test_log_is_capped() {
        let mut state = GameState::new(GameConfig::default(), 1, 0.0);
        for i in 0..10 {
            state.notify(format!("msg {i}"));
        }
        assert_eq!(state.log.len(), MAX_LOG_MESSAGES);
        assert_eq!(state.log.front().map(String::as_str), Some("msg 5"));
        assert_eq!(state.status, "msg 9");
    }

    #[test]
    fn test_speed_requires_motion_or_game_over() {
        let mut state = GameState::new(GameConfig::default(), 1, 0.0);
        assert!(!state.change_speed(1));
        assert_eq!(state.speed_index, 0);

        state.snake.set_velocity(super::super::grid::Direction::Right);
        assert!(state.change_speed(-1));
        assert_eq!(state.speed_index, SPEEDS.len() - 1);
        assert_eq!(state.status, "Speed: 10x");
        assert!(state.change_speed(1));
        assert_eq!(state.speed_index, 0);

        let mut over = GameState::new(GameConfig::default(), 1, 0.0);
        over.phase = GamePhase::GameOver;
        assert!(over.change_speed(1));
        assert_eq!(over.tick_period_ms(), 100.0);
    }
}
