//! Fixed timestep simulation tick

use super::food::FoodKind;
use super::state::{DeathCause, GameState};
use super::grid::{Cell, Direction};
use crate::consts::OBSTACLE_BONUS;
use crate::SPEEDS;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested travel direction (reversals are ignored)
    pub direction: Option<Direction>,
    /// Projectiles to fire from the head, one per key press
    pub shots: u8,
}

impl TickInput {
    /// Clear one-shot requests after they have been consumed
    pub fn clear(&mut self) {
        self.direction = None;
        self.shots = 0;
    }
}

/// Advance the game state by one tick at wall-clock time `now` (ms)
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) {
    if !state.is_playing() {
        return;
    }
    state.time_ticks += 1;

    // Input
    if let Some(dir) = input.direction {
        state.snake.set_velocity(dir);
    }
    for _ in 0..input.shots {
        let speed = state.config.projectile_speed;
        if state.projectiles.fire(state.snake.head(), state.snake.velocity(), speed) {
            state.notify("Shot fired!");
        }
    }

    // Food lifetime, plus any spawn deferred by a full board
    if state.food.is_expired(now) {
        state.notify("Food disappeared!");
        state.spawn_food(now);
    } else if state.food.current().is_none() {
        state.spawn_food(now);
    }

    for event in state.effects.update(now) {
        state.notify(event.message());
    }

    let Some(base) = state.snake.velocity() else {
        return;
    };
    let dir = state.effects.intoxication.steer(&mut state.rng, base);
    let walled = state.grid.walls_enabled();
    let head = state.snake.compute_next_head(dir, &state.grid, !walled);

    if let Some(cause) = collision_at(state, head) {
        state.die(cause, now);
        return;
    }

    match state.food.take_at(head) {
        Some(food) if food.kind.is_lethal() => {
            // The head moves onto the toxin; nothing is trimmed
            state.snake.grow_or_advance(head, true);
            state.die(DeathCause::Toxic, now);
            return;
        }
        Some(food) => {
            state.snake.grow_or_advance(head, true);
            state.score += food.points;
            state.notify(format!("{} {} +{}", food.emoji(), food.name(), food.points));

            if food.kind == FoodKind::Beer {
                state.effects.intoxication.arm(now);
                state.notify("🍺 Beer consumed! Drunk effect starting soon...");
            } else if let Some(effect) = food.effect.filter(|_| state.config.food_effects) {
                state.effects.visual.arm(effect, now);
            }
            state.spawn_food(now);
        }
        None => state.snake.grow_or_advance(head, false),
    }

    update_projectiles(state);

    let segments: Vec<Cell> = state.snake.segments().collect();
    let (_, pattern) = state.display_style();
    let frame = state.snake.animation_frame;
    state
        .particles
        .spawn_trail(&mut state.rng, &segments, pattern, state.speed_index, frame);
    state.particles.enforce_caps();

    log::trace!(
        "tick {} head=({}, {}) len={} score={} speed={}",
        state.time_ticks,
        head.x,
        head.y,
        state.snake.len(),
        state.score,
        SPEEDS[state.speed_index].label
    );
}

/// Lethal contact for a candidate head, checked wall, self, obstacle
fn collision_at(state: &GameState, head: Cell) -> Option<DeathCause> {
    if state.grid.walls_enabled() && state.grid.is_wall(head) {
        Some(DeathCause::Wall)
    } else if state.snake.check_self_collision(head) {
        Some(DeathCause::SelfBite)
    } else if state.obstacles.contains(head) {
        Some(DeathCause::Obstacle)
    } else {
        None
    }
}

fn update_projectiles(state: &mut GameState) {
    let mut hits = Vec::new();
    state
        .projectiles
        .tick(&mut state.obstacles, &state.grid, |hit| hits.push(hit));

    for hit in hits {
        let center = hit.obstacle.cell.as_vec2() + 0.5;
        state
            .particles
            .spawn_burst(&mut state.rng, center, hit.obstacle.color);
        if hit.destroyed {
            state.obstacles.remove(hit.obstacle.cell);
            state.score += OBSTACLE_BONUS;
            state.notify("Obstacle destroyed!");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FOOD_LIFETIME_MS, INTOXICATION_DELAY_MS};
    use crate::settings::{GameConfig, Settings};
    use crate::sim::food::Food;
    use crate::sim::obstacle::{Obstacle, ObstacleField};
    use crate::sim::snake::Snake;
    use crate::sim::color::Rgb;
    use crate::sim::state::GamePhase;

    fn config(walls: bool) -> GameConfig {
        Settings { enable_walls: walls, ..Settings::default() }.resolve()
    }

    /// State with no obstacles and food parked in a far corner
    fn open_state(walls: bool) -> GameState {
        let mut state = GameState::new(config(walls), 3, 0.0);
        state.obstacles = ObstacleField::default();
        state.food.place(Food::new(FoodKind::Apple, Cell::new(2, 17), 0.0));
        state
    }

    fn moving(mut state: GameState, cells: &[(i32, i32)], dir: Direction) -> GameState {
        state.snake = Snake::from_cells(cells.iter().map(|&(x, y)| Cell::new(x, y)), Some(dir));
        state
    }

    #[test]
    fn test_moves_one_cell() {
        let mut state = moving(open_state(true), &[(10, 10)], Direction::Right);
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.snake.head(), Cell::new(11, 10));
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_stationary_snake_does_not_move() {
        let mut state = open_state(true);
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.snake.head(), Cell::new(10, 10));
        assert!(state.is_playing());
    }

    #[test]
    fn test_eat_apple_grows_and_scores() {
        let mut state = moving(open_state(true), &[(10, 10), (9, 10)], Direction::Right);
        state.food.place(Food::new(FoodKind::Apple, Cell::new(11, 10), 0.0));
        tick(&mut state, &TickInput::default(), 10.0);

        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 3);
        let food = state.food.current().expect("respawned");
        assert!(!state.snake.check_self_collision(food.cell));
    }

    #[test]
    fn test_wall_collision_at_border_ring() {
        let mut state = moving(open_state(true), &[(18, 5)], Direction::Right);
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.phase, GamePhase::Dying { since: 10.0 });
        assert_eq!(state.death, Some(DeathCause::Wall));
        assert_eq!(state.snake.head(), Cell::new(18, 5));
    }

    #[test]
    fn test_wraps_without_walls() {
        let mut state = moving(open_state(false), &[(19, 5)], Direction::Right);
        tick(&mut state, &TickInput::default(), 10.0);
        assert!(state.is_playing());
        assert_eq!(state.snake.head(), Cell::new(0, 5));
    }

    #[test]
    fn test_self_collision() {
        let cells = [(5, 5), (5, 6), (6, 6), (6, 5), (6, 4)];
        let mut state = moving(open_state(true), &cells, Direction::Left);
        let input = TickInput { direction: Some(Direction::Down), shots: 0 };
        tick(&mut state, &input, 10.0);
        assert_eq!(state.death, Some(DeathCause::SelfBite));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut state = moving(open_state(true), &[(10, 10), (9, 10)], Direction::Right);
        let input = TickInput { direction: Some(Direction::Left), shots: 0 };
        tick(&mut state, &input, 10.0);
        assert!(state.is_playing());
        assert_eq!(state.snake.head(), Cell::new(11, 10));
    }

    #[test]
    fn test_obstacle_collision() {
        let mut state = moving(open_state(true), &[(10, 10)], Direction::Up);
        state.obstacles = ObstacleField::from_obstacles(vec![Obstacle {
            cell: Cell::new(10, 9),
            color: Rgb::new(0x8b, 0, 0),
            health: 1,
        }]);
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.death, Some(DeathCause::Obstacle));
    }

    #[test]
    fn test_toxic_food_kills_without_trimming() {
        let mut state = moving(open_state(true), &[(10, 10), (9, 10)], Direction::Right);
        state.food.place(Food::new(FoodKind::Toxic, Cell::new(11, 10), 0.0));
        tick(&mut state, &TickInput::default(), 10.0);

        assert_eq!(state.death, Some(DeathCause::Toxic));
        assert_eq!(state.snake.head(), Cell::new(11, 10));
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.status, "☠️ Toxic! You died!");
    }

    #[test]
    fn test_food_expires_and_respawns() {
        let mut state = open_state(true);
        tick(&mut state, &TickInput::default(), FOOD_LIFETIME_MS);
        assert_eq!(state.food.current().map(|f| f.spawned_at), Some(0.0));

        tick(&mut state, &TickInput::default(), FOOD_LIFETIME_MS + 1.0);
        assert_eq!(state.food.current().map(|f| f.spawned_at), Some(FOOD_LIFETIME_MS + 1.0));
        assert!(state.log.iter().any(|m| m == "Food disappeared!"));
    }

    #[test]
    fn test_fire_destroys_obstacle() {
        let mut state = moving(open_state(true), &[(5, 10)], Direction::Right);
        state.obstacles = ObstacleField::from_obstacles(vec![Obstacle {
            cell: Cell::new(8, 10),
            color: Rgb::new(0x8b, 0, 0),
            health: 1,
        }]);

        let fire = TickInput { direction: None, shots: 1 };
        tick(&mut state, &fire, 10.0);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.log.iter().any(|m| m == "Shot fired!"));

        // Snake turns away so it does not follow the projectile into the obstacle
        let turn = TickInput { direction: Some(Direction::Up), shots: 0 };
        tick(&mut state, &turn, 20.0);
        tick(&mut state, &TickInput::default(), 30.0);

        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, OBSTACLE_BONUS);
        assert!(state.projectiles.is_empty());
        assert!(state.particles.bursts().count() > 0);
    }

    #[test]
    fn test_every_queued_shot_fires() {
        let mut state = moving(open_state(true), &[(5, 10)], Direction::Right);
        tick(&mut state, &TickInput { direction: None, shots: 2 }, 10.0);
        assert_eq!(state.projectiles.len(), 2);
        assert_eq!(state.log.iter().filter(|m| *m == "Shot fired!").count(), 2);
    }

    #[test]
    fn test_stationary_snake_cannot_fire() {
        let mut state = open_state(true);
        tick(&mut state, &TickInput { direction: None, shots: 1 }, 10.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_beer_arms_intoxication() {
        let mut state = moving(open_state(false), &[(10, 10)], Direction::Right);
        state.food.place(Food::new(FoodKind::Beer, Cell::new(11, 10), 0.0));
        tick(&mut state, &TickInput::default(), 100.0);
        assert!(!state.effects.intoxication.is_active());

        tick(&mut state, &TickInput::default(), 100.0 + INTOXICATION_DELAY_MS);
        assert!(state.effects.intoxication.is_active());
        assert!(state.log.iter().any(|m| m.contains("DRUNK")));
    }

    #[test]
    fn test_food_effects_toggle() {
        let mut off = Settings { enable_food_effects: false, ..Settings::default() };
        off.enable_walls = false;
        let mut state = GameState::new(off.resolve(), 3, 0.0);
        state.obstacles = ObstacleField::default();
        state.snake = Snake::from_cells([Cell::new(10, 10)], Some(Direction::Right));
        state.food.place(Food::new(FoodKind::Cherry, Cell::new(11, 10), 0.0));
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.score, 3);
        assert!(state.effects.visual.display().is_none());
        assert_eq!(state.effects.visual.phase(), crate::sim::effects::EffectPhase::Idle);
    }

    #[test]
    fn test_no_tick_after_death() {
        let mut state = moving(open_state(true), &[(18, 5)], Direction::Right);
        tick(&mut state, &TickInput::default(), 10.0);
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), 20.0);
        assert_eq!(state.time_ticks, ticks);
    }
}
