//! Game session: fixed-timestep scheduling, commands and the death sequence
//!
//! The host calls [`Session::frame`] once per display refresh with the
//! current wall-clock time. Elapsed time is accumulated and drained in whole
//! tick periods of the current speed; the remainder becomes the
//! interpolation factor for the returned snapshot.

use crate::consts::{DYING_DURATION_MS, MAX_FRAME_DELTA_MS};
use crate::highscores::{HighScores, ScoreBoard};
use crate::platform::KeyValueStore;
use crate::settings::{GameConfig, HudFlags, ProjectileStyle, Settings};
use crate::sim::grid::Direction;
use crate::sim::state::{GamePhase, GameState};
use crate::sim::tick::{TickInput, tick};
use crate::snapshot::RenderSnapshot;

/// Player commands, usually mapped from keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetDirection(Direction),
    Fire,
    SpeedUp,
    SpeedDown,
    /// Start a new run (also restarts after game over)
    Start,
}

/// Seeds for consecutive runs are spread with the golden ratio constant
const SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct Session {
    settings: Settings,
    state: GameState,
    input: TickInput,
    scores: ScoreBoard,
    high_scores: HighScores,
    accumulator: f64,
    last_frame: Option<f64>,
    alpha: f32,
    running: bool,
    seed: u64,
    last_rank: Option<usize>,
}

impl Session {
    /// New idle session; nothing ticks until [`Command::Start`]
    pub fn new(settings: Settings, store: Box<dyn KeyValueStore>, seed: u64, now: f64) -> Self {
        let scores = ScoreBoard::new(store);
        let high_scores = scores.load();
        let state = GameState::new(settings.resolve(), seed, now);
        Self {
            settings,
            state,
            input: TickInput::default(),
            scores,
            high_scores,
            accumulator: 0.0,
            last_frame: None,
            alpha: 0.0,
            running: false,
            seed,
            last_rank: None,
        }
    }

    /// Begin a fresh run, discarding the previous one
    pub fn start(&mut self, now: f64) {
        self.seed = self.seed.wrapping_add(SEED_STRIDE);
        let config = self.settings.resolve();
        log::info!(
            "Starting run (seed {:#x}, walls {}, pattern {})",
            self.seed,
            config.grid.walls_enabled(),
            config.pattern.as_str()
        );
        self.state = GameState::new(config, self.seed, now);
        self.input.clear();
        self.accumulator = 0.0;
        self.last_frame = None;
        self.alpha = 0.0;
        self.last_rank = None;
        self.running = true;
    }

    /// Cancel the loop; no further ticks happen until the next start
    pub fn stop(&mut self) {
        self.running = false;
        self.last_frame = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for scripted setups (tests, demos)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.state.config
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Leaderboard rank of the last finished run, if it placed
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Apply cosmetic changes to the running session
    pub fn update_cosmetics(&mut self, projectile: ProjectileStyle, hud: HudFlags) {
        self.state.config.projectile = projectile;
        self.state.config.hud = hud;
    }

    pub fn command(&mut self, command: Command, now: f64) {
        match command {
            Command::Start => self.start(now),
            _ if !self.running => {}
            Command::SetDirection(dir) if self.state.is_playing() => {
                self.input.direction = Some(dir);
            }
            Command::Fire if self.state.is_playing() => {
                self.input.shots = self.input.shots.saturating_add(1);
            }
            Command::SpeedUp => {
                self.state.change_speed(1);
            }
            Command::SpeedDown => {
                self.state.change_speed(-1);
            }
            _ => {}
        }
    }

    /// Advance to wall-clock `now` and return the frame to draw
    pub fn frame(&mut self, now: f64) -> RenderSnapshot {
        if self.running {
            let elapsed = match self.last_frame {
                Some(last) => (now - last).clamp(0.0, MAX_FRAME_DELTA_MS),
                None => 0.0,
            };
            self.last_frame = Some(now);

            match self.state.phase {
                GamePhase::Playing => {
                    self.accumulator += elapsed;
                    loop {
                        let period = self.state.tick_period_ms();
                        if self.accumulator < period {
                            self.alpha = (self.accumulator / period) as f32;
                            break;
                        }
                        self.accumulator -= period;
                        self.step(now);
                        if !self.state.is_playing() {
                            self.accumulator = 0.0;
                            self.alpha = 1.0;
                            break;
                        }
                    }
                }
                GamePhase::Dying { since } if now - since >= DYING_DURATION_MS => {
                    self.finish(now);
                }
                _ => {}
            }

            self.state.snake.animation_frame = self.state.snake.animation_frame.wrapping_add(1);
            self.state.particles.tick();
        }
        self.snapshot(now)
    }

    /// Run exactly one simulation tick, consuming pending input
    pub fn step(&mut self, now: f64) {
        tick(&mut self.state, &self.input, now);
        self.input.clear();
    }

    /// Snapshot without advancing anything
    pub fn snapshot(&self, now: f64) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state, self.alpha, now)
    }

    fn finish(&mut self, now: f64) {
        self.state.phase = GamePhase::GameOver;
        let score = self.state.score;
        self.state.notify(format!("Game over! Final score: {score}"));
        if score > 0 {
            let player = self.state.config.player_name.clone();
            self.high_scores = self.scores.record(score, &player, now);
            self.last_rank = self
                .high_scores
                .entries
                .iter()
                .position(|e| e.score == score && e.timestamp == now)
                .map(|i| i + 1);
        }
    }
}
