//! Read-only per-frame view of a session
//!
//! Built after the ticks for a frame have run. The renderer and the HUD only
//! ever see this value, never the live [`GameState`].

use glam::Vec2;
use serde::Serialize;

use crate::consts::{DYING_DURATION_MS, GRID_SIZE};
use crate::settings::HudFlags;
use crate::sim::color::segment_color;
use crate::sim::food::FoodKind;
use crate::sim::grid::{Cell, Direction};
use crate::sim::particle::Particle;
use crate::sim::state::{GamePhase, GameState};
use crate::SPEEDS;

/// Head jitter amplitude while dying (grid units)
const DEATH_SHAKE: f32 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentView {
    /// Interpolated cell origin (grid units)
    pub pos: Vec2,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodView {
    pub kind: FoodKind,
    pub name: &'static str,
    pub emoji: &'static str,
    pub cell: Cell,
    /// Lifetime left in `[0, 1]`
    pub remaining: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub cell: Cell,
    pub color: [f32; 4],
    pub health: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    /// Centre position (grid units)
    pub pos: Vec2,
    pub color: [f32; 4],
    pub life: f32,
}

impl From<&Particle> for ParticleView {
    fn from(p: &Particle) -> Self {
        let life = p.life_fraction();
        Self {
            pos: p.pos,
            color: p.color.to_rgba(life),
            life,
        }
    }
}

/// Everything needed to draw one frame and refresh the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tile_count: i32,
    /// Pixels per tile
    pub grid_size: f32,
    /// Wall ring colour, when walls are on
    pub walls: Option<[f32; 4]>,

    /// Head first
    pub segments: Vec<SegmentView>,
    /// Travel direction; None while the snake is at rest
    pub head_direction: Option<Direction>,
    /// Colour of the head itself (the configured snake colour)
    pub head_color: [f32; 4],
    pub frame: u32,
    /// Death animation progress in `[0, 1]` while dying
    pub dying_progress: Option<f32>,
    pub intoxicated: bool,

    pub food: Option<FoodView>,
    pub obstacles: Vec<ObstacleView>,
    pub projectiles: Vec<Vec2>,
    pub projectile_color: [f32; 4],
    /// Radius in pixels
    pub projectile_size: f32,
    pub explosions: Vec<ParticleView>,
    pub trail: Vec<ParticleView>,

    pub score: u32,
    pub speed_label: &'static str,
    pub status: String,
    /// Recent status lines, oldest first
    pub log: Vec<String>,
    pub phase: GamePhase,
    pub game_over: bool,
    pub final_score: Option<u32>,
    pub hud: HudFlags,
}

impl RenderSnapshot {
    /// Capture `state` at interpolation factor `alpha` and wall-clock `now`
    pub fn capture(state: &GameState, alpha: f32, now: f64) -> Self {
        let dying_progress = match state.phase {
            GamePhase::Dying { since } => {
                Some(((now - since) / DYING_DURATION_MS).clamp(0.0, 1.0) as f32)
            }
            _ => None,
        };

        let frame = state.snake.animation_frame;
        let (base, pattern) = state.display_style();
        let body_alpha = 1.0 - dying_progress.unwrap_or(0.0);
        let total = state.snake.len();

        let mut segments: Vec<SegmentView> = state
            .snake
            .interpolated(alpha)
            .into_iter()
            .enumerate()
            .map(|(i, pos)| SegmentView {
                pos,
                color: segment_color(i, total, frame, pattern, base).to_rgba(body_alpha),
            })
            .collect();

        if let (Some(head), Some(_)) = (segments.first_mut(), dying_progress) {
            let t = frame as f32;
            head.pos += Vec2::new((t * 1.7).sin(), (t * 2.3).cos()) * DEATH_SHAKE;
        }

        let config = &state.config;
        let game_over = state.is_game_over();

        Self {
            tile_count: state.grid.tile_count,
            grid_size: GRID_SIZE,
            walls: state
                .grid
                .walls_enabled()
                .then(|| config.wall_color.to_rgba(1.0)),

            segments,
            head_direction: state.snake.velocity(),
            head_color: base.to_rgba(1.0),
            frame,
            dying_progress,
            intoxicated: state.effects.intoxication.is_active(),

            food: state.food.current().map(|food| FoodView {
                kind: food.kind,
                name: food.name(),
                emoji: food.emoji(),
                cell: food.cell,
                remaining: state.food.remaining_fraction(now),
            }),
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    cell: o.cell,
                    color: o.color.to_rgba(1.0),
                    health: o.health,
                })
                .collect(),
            projectiles: state.projectiles.iter().map(|p| p.pos).collect(),
            projectile_color: config.projectile.color.to_rgba(1.0),
            projectile_size: config.projectile.size,
            explosions: state.particles.bursts().map(ParticleView::from).collect(),
            trail: state.particles.trail().map(ParticleView::from).collect(),

            score: state.score,
            speed_label: SPEEDS[state.speed_index].label,
            status: state.status.clone(),
            log: state.log.iter().cloned().collect(),
            phase: state.phase,
            game_over,
            final_score: game_over.then_some(state.score),
            hud: config.hud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::snake::Snake;

    #[test]
    fn test_capture_basics() {
        let state = GameState::new(GameConfig::default(), 5, 0.0);
        let snap = RenderSnapshot::capture(&state, 1.0, 0.0);
        assert_eq!(snap.segments.len(), 1);
        assert_eq!(snap.segments[0].pos, Vec2::new(10.0, 10.0));
        assert_eq!(snap.obstacles.len(), 5);
        assert_eq!(snap.speed_label, "1x");
        assert_eq!(snap.status, "Ready");
        assert!(snap.walls.is_some());
        assert!(snap.dying_progress.is_none());
        assert!(!snap.game_over);
        assert_eq!(snap.final_score, None);
        assert_eq!(snap.food.as_ref().map(|f| f.remaining), Some(1.0));
    }

    #[test]
    fn test_interpolated_segments() {
        let mut state = GameState::new(GameConfig::default(), 5, 0.0);
        state.snake = Snake::from_cells([Cell::new(5, 5)], Some(Direction::Right));
        state.snake.grow_or_advance(Cell::new(6, 5), false);
        let snap = RenderSnapshot::capture(&state, 0.5, 0.0);
        assert_eq!(snap.segments[0].pos, Vec2::new(5.5, 5.0));
    }

    #[test]
    fn test_dying_fades_body() {
        let mut state = GameState::new(GameConfig::default(), 5, 0.0);
        state.snake = Snake::from_cells([Cell::new(5, 5), Cell::new(4, 5)], Some(Direction::Right));
        state.phase = GamePhase::Dying { since: 1000.0 };
        let snap = RenderSnapshot::capture(&state, 1.0, 1000.0 + DYING_DURATION_MS / 2.0);
        assert_eq!(snap.dying_progress, Some(0.5));
        assert!((snap.segments[1].color[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_game_over_reports_final_score() {
        let mut state = GameState::new(GameConfig::default(), 5, 0.0);
        state.score = 17;
        state.phase = GamePhase::GameOver;
        let snap = RenderSnapshot::capture(&state, 1.0, 0.0);
        assert!(snap.game_over);
        assert_eq!(snap.final_score, Some(17));
    }

    #[test]
    fn test_serializes_to_json() {
        let state = GameState::new(GameConfig::default(), 5, 0.0);
        let json = serde_json::to_string(&RenderSnapshot::capture(&state, 1.0, 0.0)).unwrap();
        assert!(json.contains("\"speed_label\":\"1x\""));
    }
}
