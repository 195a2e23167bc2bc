//! Snake Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use snake_arcade::consts::{GRID_SIZE, TILE_COUNT};
    use snake_arcade::highscores::format_date;
    use snake_arcade::platform::now_ms;
    use snake_arcade::platform::storage::LocalStorage;
    use snake_arcade::renderer::{RenderState, build_scene};
    use snake_arcade::sim::Direction;
    use snake_arcade::{Command, RenderSnapshot, Session, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        /// Leaderboard length last written to the DOM
        shown_scores: Option<usize>,
        last_game_over: bool,
        /// An animation frame callback is pending
        looping: bool,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                session: Session::new(settings, Box::new(LocalStorage), seed, now_ms()),
                render_state: None,
                shown_scores: None,
                last_game_over: false,
                looping: false,
            }
        }

        /// Render the current frame
        fn render(&mut self, snap: &RenderSnapshot) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&build_scene(snap)) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document, snap: &RenderSnapshot) {
            set_text(document, "score", &snap.score.to_string());
            set_text(document, "speed", snap.speed_label);

            set_visible(document, "status", snap.hud.status);
            if snap.hud.status {
                set_text(document, "status", &snap.status);
            }

            set_visible(document, "log", snap.hud.logging);
            if snap.hud.logging {
                if let Some(el) = document.get_element_by_id("log") {
                    let html: String = snap.log.iter().map(|m| format!("<li>{m}</li>")).collect();
                    el.set_inner_html(&html);
                }
            }

            set_visible(document, "game-over", snap.game_over);
            if snap.game_over && !self.last_game_over {
                if let Some(score) = snap.final_score {
                    set_text(document, "final-score", &score.to_string());
                }
            }
            self.last_game_over = snap.game_over;

            set_visible(document, "scoreboard", snap.hud.scoreboard);
            let scores = self.session.high_scores();
            if snap.hud.scoreboard && (self.shown_scores != Some(scores.len()) || snap.game_over) {
                if let Some(el) = document.get_element_by_id("high-scores") {
                    let now = now_ms();
                    let html: String = scores
                        .entries
                        .iter()
                        .enumerate()
                        .map(|(i, e)| {
                            format!(
                                "<li>{}. {} {} <small>{}</small></li>",
                                i + 1,
                                e.player,
                                e.score,
                                format_date(e.timestamp, now)
                            )
                        })
                        .collect();
                    el.set_inner_html(&html);
                }
                self.shown_scores = Some(scores.len());
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Settings JSON embedded by the page, if any
    fn page_settings(document: &Document) -> Settings {
        document
            .get_element_by_id("settings")
            .and_then(|el| el.text_content())
            .map(|json| Settings::from_json(&json))
            .unwrap_or_default()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }

        log::info!("Snake Arcade starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("no canvas element");
            return;
        };

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(page_settings(&document), seed)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let board = TILE_COUNT as f32 * GRID_SIZE;
                        match RenderState::new(surface, &adapter, width, height, board).await {
                            Ok(state) => game.borrow_mut().render_state = Some(state),
                            Err(e) => log::error!("Failed to create device: {e}"),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {e}"),
                }
            }
            Err(e) => log::error!("Failed to create surface: {e}"),
        }

        setup_input_handlers(game.clone());
        setup_button(game.clone(), "start-btn");
        setup_button(game.clone(), "restart-btn");

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // First frame draws the idle board
        game.borrow_mut().looping = true;
        request_animation_frame(game);

        log::info!("Snake Arcade running! Press Enter to start");
    }

    fn key_command(key: &str) -> Option<Command> {
        Some(match key {
            "ArrowUp" | "w" | "W" => Command::SetDirection(Direction::Up),
            "ArrowDown" | "s" | "S" => Command::SetDirection(Direction::Down),
            "ArrowLeft" | "a" | "A" => Command::SetDirection(Direction::Left),
            "ArrowRight" | "d" | "D" => Command::SetDirection(Direction::Right),
            " " => Command::Fire,
            "+" | "=" => Command::SpeedUp,
            "-" | "_" => Command::SpeedDown,
            "Enter" => Command::Start,
            _ => return None,
        })
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(command) = key_command(&event.key()) else {
                return;
            };
            // Keep arrows and space from scrolling the page
            event.prevent_default();

            {
                let mut g = game.borrow_mut();
                let restartable = !g.session.is_running() || g.session.state().is_game_over();
                if command == Command::Start && !restartable {
                    return;
                }
                g.session.command(command, now_ms());
            }
            ensure_loop(&game);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_button(game: Rc<RefCell<Game>>, id: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.command(Command::Start, now_ms());
                ensure_loop(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Restart the frame loop if the session is running without one
    fn ensure_loop(game: &Rc<RefCell<Game>>) {
        let resume = {
            let mut g = game.borrow_mut();
            let resume = g.session.is_running() && !g.looping;
            g.looping |= resume;
            resume
        };
        if resume {
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let running = {
            let mut g = game.borrow_mut();
            // Session timing runs on the same wall clock as food and effects
            let snap = g.session.frame(now_ms());
            g.render(&snap);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document, &snap);
            }
            g.looping = g.session.is_running();
            g.looping
        };

        // A stopped session draws its last frame and lets the loop lapse
        if running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Snake Arcade (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);
    let result = autopilot::run(seed, 20_000);
    println!(
        "\nAutopilot finished after {} ticks: score {}, length {}{}",
        result.ticks,
        result.score,
        result.length,
        result
            .death
            .map(|d| format!(" ({})", d.message()))
            .unwrap_or_default()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use snake_arcade::platform::MemoryStore;
    use snake_arcade::sim::{Cell, DeathCause, Direction, GameState};
    use snake_arcade::{Command, Session, Settings};

    /// Simulated display refresh (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub struct DemoResult {
        pub ticks: u64,
        pub score: u32,
        pub length: usize,
        pub death: Option<DeathCause>,
    }

    /// Drive a session with a greedy player until game over or `max_frames`
    pub fn run(seed: u64, max_frames: u32) -> DemoResult {
        let mut session = Session::new(Settings::default(), Box::new(MemoryStore::new()), seed, 0.0);
        let mut now = 0.0;
        session.command(Command::Start, now);

        for _ in 0..max_frames {
            if session.state().is_game_over() {
                break;
            }
            if session.state().is_playing() {
                if let Some(dir) = choose(session.state()) {
                    session.command(Command::SetDirection(dir), now);
                }
                if obstacle_ahead(session.state()) {
                    session.command(Command::Fire, now);
                }
            }
            session.frame(now);
            now += FRAME_MS;
        }

        let state = session.state();
        DemoResult {
            ticks: state.time_ticks,
            score: state.score,
            length: state.snake.len(),
            death: state.death,
        }
    }

    fn blocked(state: &GameState, cell: Cell) -> bool {
        (state.grid.walls_enabled() && state.grid.is_wall(cell))
            || state.snake.check_self_collision(cell)
            || state.obstacles.contains(cell)
            || state
                .food
                .current()
                .is_some_and(|f| f.kind.is_lethal() && f.cell == cell)
    }

    /// Safe direction closest to edible food, if any
    fn choose(state: &GameState) -> Option<Direction> {
        let target = state
            .food
            .current()
            .filter(|f| !f.kind.is_lethal())
            .map(|f| f.cell);
        let wrap = !state.grid.walls_enabled();
        let current = state.snake.velocity();

        Direction::ALL
            .into_iter()
            .filter(|d| current != Some(d.opposite()))
            .map(|d| (d, state.snake.compute_next_head(d, &state.grid, wrap)))
            .filter(|&(_, cell)| !blocked(state, cell))
            .min_by_key(|&(d, cell)| {
                let distance = target.map_or(0, |t| (t.x - cell.x).abs() + (t.y - cell.y).abs());
                // Prefer going straight on ties
                (distance, i32::from(Some(d) != current))
            })
            .map(|(d, _)| d)
    }

    fn obstacle_ahead(state: &GameState) -> bool {
        let Some(dir) = state.snake.velocity() else {
            return false;
        };
        let mut cell = state.snake.head();
        for _ in 0..5 {
            cell = cell.step(dir);
            if state.obstacles.contains(cell) {
                return true;
            }
        }
        false
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_autopilot_scores() {
            let result = run(0x5eed, 3_000);
            assert!(result.ticks > 0);
        }
    }
}
