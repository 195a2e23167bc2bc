//! Game settings and preferences
//!
//! `Settings` is what the settings form produces (plain strings and numbers).
//! It is resolved once per session start into a validated [`GameConfig`].

use serde::{Deserialize, Serialize};

use crate::consts::{OBSTACLE_COUNT, TILE_COUNT};
use crate::sim::color::{Rgb, SnakePattern};
use crate::sim::grid::{Boundary, GridModel};
use crate::sim::obstacle::ObstacleColorMode;

/// Obstacle colouring choice as presented in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleColoring {
    #[default]
    Random,
    Single,
}

/// Allowed projectile radius (pixels)
pub const BULLET_SIZE_RANGE: (u32, u32) = (1, 10);
/// Allowed projectile speed multiplier
pub const BULLET_SPEED_RANGE: (u32, u32) = (1, 3);

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub player_name: String,

    // === Snake ===
    /// `#rrggbb`
    pub snake_color: String,
    pub template: SnakePattern,

    // === Obstacles ===
    pub obstacle_color_mode: ObstacleColoring,
    pub single_obstacle_color: String,

    // === Projectiles ===
    pub bullet_color: String,
    /// Radius in pixels
    pub bullet_size: u32,
    /// Cells per tick
    pub bullet_speed: u32,

    // === Arena ===
    pub enable_walls: bool,
    pub wall_color: String,
    pub enable_food_effects: bool,

    // === HUD ===
    pub show_scoreboard: bool,
    pub show_logging: bool,
    pub show_status: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),

            snake_color: "#0000ff".to_string(),
            template: SnakePattern::Classic,

            obstacle_color_mode: ObstacleColoring::Random,
            single_obstacle_color: "#8B0000".to_string(),

            bullet_color: "#ffff00".to_string(),
            bullet_size: 3,
            bullet_speed: 1,

            enable_walls: true,
            wall_color: "#555555".to_string(),
            enable_food_effects: true,

            show_scoreboard: true,
            show_logging: false,
            show_status: false,
        }
    }
}

impl Settings {
    /// Parse settings JSON from the UI layer, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Validate and resolve into the typed session configuration
    ///
    /// Malformed colours fall back to a safe colour, out-of-range numbers are
    /// clamped and a blank name becomes "Player"; each fix is logged.
    pub fn resolve(&self) -> GameConfig {
        let player_name = match self.player_name.trim() {
            "" => "Player".to_string(),
            name => name.to_string(),
        };

        let obstacle_colors = match self.obstacle_color_mode {
            ObstacleColoring::Random => ObstacleColorMode::Random,
            ObstacleColoring::Single => {
                ObstacleColorMode::Single(Rgb::parse_or_fallback(&self.single_obstacle_color))
            }
        };

        GameConfig {
            player_name,
            snake_color: Rgb::parse_or_fallback(&self.snake_color),
            pattern: self.template,
            obstacle_colors,
            obstacle_count: OBSTACLE_COUNT,
            projectile: ProjectileStyle {
                color: Rgb::parse_or_fallback(&self.bullet_color),
                size: clamp_logged("bulletSize", self.bullet_size, BULLET_SIZE_RANGE) as f32,
            },
            projectile_speed: clamp_logged("bulletSpeed", self.bullet_speed, BULLET_SPEED_RANGE) as f32,
            grid: GridModel::new(
                TILE_COUNT,
                if self.enable_walls { Boundary::Walled } else { Boundary::Wrap },
            ),
            wall_color: Rgb::parse_or_fallback(&self.wall_color),
            food_effects: self.enable_food_effects,
            hud: HudFlags {
                scoreboard: self.show_scoreboard,
                logging: self.show_logging,
                status: self.show_status,
            },
        }
    }
}

fn clamp_logged(name: &str, value: u32, (lo, hi): (u32, u32)) -> u32 {
    let clamped = value.clamp(lo, hi);
    if clamped != value {
        log::warn!("{name} {value} out of range {lo}..={hi}, using {clamped}");
    }
    clamped
}

/// Cosmetic projectile appearance (may change mid-session)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileStyle {
    pub color: Rgb,
    /// Radius in pixels
    pub size: f32,
}

/// HUD visibility toggles (may change mid-session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudFlags {
    pub scoreboard: bool,
    pub logging: bool,
    pub status: bool,
}

/// Validated configuration for one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub player_name: String,
    pub snake_color: Rgb,
    pub pattern: SnakePattern,
    pub obstacle_colors: ObstacleColorMode,
    pub obstacle_count: usize,
    pub projectile: ProjectileStyle,
    pub projectile_speed: f32,
    pub grid: GridModel,
    pub wall_color: Rgb,
    pub food_effects: bool,
    pub hud: HudFlags,
}

impl Default for GameConfig {
    fn default() -> Self {
        Settings::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::color::FALLBACK_COLOR;

    #[test]
    fn test_defaults_resolve() {
        let config = GameConfig::default();
        assert_eq!(config.player_name, "Player");
        assert_eq!(config.snake_color, Rgb::new(0, 0, 255));
        assert_eq!(config.grid.boundary, Boundary::Walled);
        assert_eq!(config.obstacle_colors, ObstacleColorMode::Random);
        assert_eq!(config.projectile.size, 3.0);
        assert!(config.food_effects);
        assert!(!config.hud.logging);
    }

    #[test]
    fn test_bad_values_are_repaired() {
        let settings = Settings {
            player_name: "   ".to_string(),
            snake_color: "blue-ish".to_string(),
            obstacle_color_mode: ObstacleColoring::Single,
            single_obstacle_color: "#12".to_string(),
            bullet_size: 99,
            bullet_speed: 0,
            ..Settings::default()
        };
        let config = settings.resolve();
        assert_eq!(config.player_name, "Player");
        assert_eq!(config.snake_color, FALLBACK_COLOR);
        assert_eq!(config.obstacle_colors, ObstacleColorMode::Single(FALLBACK_COLOR));
        assert_eq!(config.projectile.size, 10.0);
        assert_eq!(config.projectile_speed, 1.0);
    }

    #[test]
    fn test_json_partial_and_malformed() {
        let settings = Settings::from_json(r#"{"playerName":"Ada","enableWalls":false,"template":"neon"}"#);
        assert_eq!(settings.player_name, "Ada");
        assert!(!settings.enable_walls);
        assert_eq!(settings.template, SnakePattern::Neon);
        assert_eq!(settings.bullet_size, 3);

        let fallback = Settings::from_json("{not json");
        assert_eq!(fallback.player_name, "Player");
    }
}
