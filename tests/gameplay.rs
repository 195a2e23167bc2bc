use snake_arcade::consts::{DYING_DURATION_MS, OBSTACLE_BONUS};
use snake_arcade::highscores::STORAGE_KEY;
use snake_arcade::platform::{KeyValueStore, MemoryStore};
use snake_arcade::sim::{
    Cell, DeathCause, Direction, Food, FoodKind, GamePhase, GameState, Obstacle, ObstacleField,
    Rgb, Snake, TickInput, tick,
};
use snake_arcade::{Command, GameConfig, Session, Settings};

fn open_state(settings: Settings) -> GameState {
    let mut state = GameState::new(settings.resolve(), 42, 0.0);
    state.obstacles = ObstacleField::default();
    state.food.place(Food::new(FoodKind::Apple, Cell::new(1, 18), 0.0));
    state
}

fn step(state: &mut GameState, dir: Option<Direction>, now: f64) {
    let input = TickInput {
        direction: dir,
        shots: 0,
    };
    tick(state, &input, now);
}

#[test]
fn stepwise_food_collection_and_wall_collision() {
    let mut state = open_state(Settings::default());
    state.snake = Snake::from_cells([Cell::new(15, 3)], Some(Direction::Right));
    state.food.place(Food::new(FoodKind::Watermelon, Cell::new(16, 3), 0.0));

    step(&mut state, None, 100.0);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 3);
    assert_eq!(state.snake.len(), 2);
    assert_eq!(state.snake.head(), Cell::new(16, 3));
    state.food.place(Food::new(FoodKind::Apple, Cell::new(1, 18), 100.0));

    step(&mut state, Some(Direction::Up), 200.0);
    assert_eq!(state.snake.head(), Cell::new(16, 2));
    step(&mut state, None, 300.0);
    assert_eq!(state.snake.head(), Cell::new(16, 1));

    // Row 0 is the wall ring
    step(&mut state, None, 400.0);
    assert_eq!(state.death, Some(DeathCause::Wall));
    assert!(matches!(state.phase, GamePhase::Dying { .. }));
}

#[test]
fn wraparound_on_every_edge() {
    let settings = Settings {
        enable_walls: false,
        ..Settings::default()
    };
    let cases = [
        (Cell::new(0, 7), Direction::Left, Cell::new(19, 7)),
        (Cell::new(19, 7), Direction::Right, Cell::new(0, 7)),
        (Cell::new(7, 0), Direction::Up, Cell::new(7, 19)),
        (Cell::new(7, 19), Direction::Down, Cell::new(7, 0)),
    ];
    for (start, dir, expected) in cases {
        let mut state = open_state(settings.clone());
        state.snake = Snake::from_cells([start], Some(dir));
        step(&mut state, None, 100.0);
        assert_eq!(state.snake.head(), expected, "{dir:?} from {start:?}");
        assert_eq!(state.phase, GamePhase::Playing);
    }
}

#[test]
fn multi_hit_obstacle_needs_several_shots() {
    let mut state = open_state(Settings::default());
    state.snake = Snake::from_cells([Cell::new(3, 10)], Some(Direction::Right));
    state.obstacles = ObstacleField::from_obstacles(vec![Obstacle {
        cell: Cell::new(12, 10),
        color: Rgb::new(0x8b, 0, 0),
        health: 2,
    }]);

    let fire = TickInput {
        direction: None,
        shots: 1,
    };
    tick(&mut state, &fire, 100.0);
    tick(&mut state, &fire, 200.0);
    assert_eq!(state.projectiles.len(), 2);
    step(&mut state, Some(Direction::Down), 300.0);
    for i in 0..12 {
        step(&mut state, None, 400.0 + i as f64 * 100.0);
        if state.obstacles.is_empty() {
            break;
        }
    }

    // First shot chips, second destroys
    assert!(state.obstacles.is_empty());
    assert_eq!(state.score, OBSTACLE_BONUS);
    assert!(state.log.iter().any(|m| m == "Obstacle destroyed!"));
}

#[test]
fn projectile_expires_without_target() {
    let settings = Settings {
        enable_walls: false,
        ..Settings::default()
    };
    let mut state = open_state(settings);
    state.snake = Snake::from_cells([Cell::new(3, 10)], Some(Direction::Right));
    let fire = TickInput {
        direction: None,
        shots: 1,
    };
    tick(&mut state, &fire, 0.0);
    assert_eq!(state.projectiles.len(), 1);

    step(&mut state, Some(Direction::Down), 100.0);
    for i in 0..20 {
        step(&mut state, None, 200.0 + i as f64 * 10.0);
    }
    // Travelled off the right edge long before its age limit
    assert!(state.projectiles.is_empty());
}

#[test]
fn session_records_high_score_after_death() {
    let mut session = Session::new(Settings::default(), Box::new(MemoryStore::new()), 3, 0.0);
    session.command(Command::Start, 0.0);
    {
        let state = session.state_mut();
        state.obstacles = ObstacleField::default();
        state.snake = Snake::from_cells([Cell::new(17, 4), Cell::new(16, 4)], Some(Direction::Right));
        state.food.place(Food::new(FoodKind::Cherry, Cell::new(18, 4), 0.0));
    }

    let mut now = 0.0;
    while !session.state().is_game_over() && now < 10_000.0 {
        session.frame(now);
        now += 16.0;
    }

    let snap = session.snapshot(now);
    assert!(snap.game_over);
    assert_eq!(snap.final_score, Some(3));
    assert_eq!(session.high_scores().top_score(), Some(3));
    assert!(now >= DYING_DURATION_MS);
}

#[test]
fn high_scores_survive_between_sessions() {
    #[derive(Clone, Default)]
    struct Shared(std::rc::Rc<std::cell::RefCell<MemoryStore>>);

    impl KeyValueStore for Shared {
        fn get(&self, key: &str) -> Result<Option<String>, snake_arcade::platform::StorageError> {
            self.0.borrow().get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), snake_arcade::platform::StorageError> {
            self.0.borrow_mut().set(key, value)
        }
    }

    let store = Shared::default();
    let mut first = Session::new(Settings::default(), Box::new(store.clone()), 1, 0.0);
    first.command(Command::Start, 0.0);
    first.state_mut().score = 9;
    first.state_mut().snake = Snake::from_cells([Cell::new(18, 9)], Some(Direction::Right));
    first.step(0.0);
    first.frame(0.0);
    first.frame(DYING_DURATION_MS);
    assert!(first.state().is_game_over());

    assert!(store.0.borrow().get(STORAGE_KEY).unwrap().is_some());
    let second = Session::new(Settings::default(), Box::new(store), 2, 0.0);
    assert_eq!(second.high_scores().top_score(), Some(9));
    assert_eq!(second.high_scores().entries[0].player, "Player");
}

#[test]
fn default_config_matches_defaults() {
    let config = GameConfig::default();
    assert!(config.grid.walls_enabled());
    assert_eq!(config.grid.tile_count, 20);
    assert_eq!(config.obstacle_count, 5);
}
