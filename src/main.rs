//! Portal Snake entry point
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

    use portal_snake::BestScore;
    use portal_snake::consts::*;
    use portal_snake::render;
    use portal_snake::render::canvas::CanvasSurface;
    use portal_snake::sim::{self, Action, Game, Phase, Turn};
    use portal_snake::tuning::ProfileId;

    /// Game instance holding all state
    struct App {
        game: Game,
        surface: CanvasSurface,
        best: BestScore,
        // Track phase so the pause scrim is painted exactly once
        last_phase: Phase,
    }

    impl App {
        /// One animation frame: advance due timers, persist the best
        /// score, refresh the HUD, redraw.
        fn frame(&mut self) {
            let now = js_sys::Date::now();
            sim::advance(&mut self.game, now);

            if self.best.record(self.game.score.best) {
                self.best.save();
            }

            self.update_hud();

            match self.game.phase {
                Phase::Running => {
                    render::draw_frame(&self.game, now, CELL_PX, &mut self.surface);
                }
                Phase::Paused => {
                    if self.last_phase != Phase::Paused {
                        render::draw_pause_overlay(&mut self.surface);
                    }
                }
                // The last live frame stays behind the game-over panel.
                Phase::GameOver => {}
            }
            self.last_phase = self.game.phase;
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            set_text(&document, "score", &self.game.score.current.to_string());
            set_text(&document, "highScore", &self.game.score.best.to_string());

            // Power-up indicator
            if let Some(el) = document.get_element_by_id("powerUp") {
                let class = if self.game.boost_active() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            // Active speed button
            for (id, profile) in SPEED_BUTTONS {
                if let Some(btn) = document.get_element_by_id(id) {
                    let list = btn.class_list();
                    if self.game.speed.profile() == profile {
                        let _ = list.add_1("active");
                    } else {
                        let _ = list.remove_1("active");
                    }
                }
            }

            // Game over panel with final score
            if let Some(el) = document.get_element_by_id("gameOver") {
                if self.game.phase == Phase::GameOver {
                    let _ = el.set_attribute("class", "");
                    set_text(&document, "finalScore", &self.game.score.current.to_string());
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    const SPEED_BUTTONS: [(&str, ProfileId); 3] = [
        ("slowBtn", ProfileId::Slow),
        ("normalBtn", ProfileId::Normal),
        ("fastBtn", ProfileId::Fast),
    ];

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Portal Snake starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(SURFACE_PX as u32);
        canvas.set_height(SURFACE_PX as u32);

        let ctx = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");
        let surface = CanvasSurface::new(ctx, SURFACE_PX, SURFACE_PX);

        let best = BestScore::load();
        let now = js_sys::Date::now();
        let seed = now as u64;
        let game = Game::new(GRID_SIZE, seed, best.score, now);

        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            surface,
            best,
            last_phase: Phase::Running,
        }));

        setup_key_handlers(app.clone());
        setup_speed_buttons(app.clone());
        setup_restart_button(app.clone());
        setup_auto_pause(app.clone());

        request_animation_frame(app);

        log::info!("Portal Snake running!");
    }

    fn setup_key_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let action = match event.key().as_str() {
                "ArrowUp" => Some(Action::Steer(Turn::Up)),
                "ArrowDown" => Some(Action::Steer(Turn::Down)),
                "ArrowLeft" => Some(Action::Steer(Turn::Left)),
                "ArrowRight" => Some(Action::Steer(Turn::Right)),
                " " => Some(Action::TogglePause),
                "p" | "P" => Some(Action::PowerUp),
                _ => None,
            };

            if let Some(action) = action {
                // Recognized game keys must not scroll the page.
                event.prevent_default();
                let mut app = app.borrow_mut();
                sim::apply_action(&mut app.game, action, js_sys::Date::now());
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_speed_buttons(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for (id, profile) in SPEED_BUTTONS {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let mut app = app.borrow_mut();
                    sim::apply_action(
                        &mut app.game,
                        Action::SelectProfile(profile),
                        js_sys::Date::now(),
                    );
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("restartBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut app = app.borrow_mut();
                sim::apply_action(&mut app.game, Action::Restart, js_sys::Date::now());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Tab switch or minimize while running pauses the session.
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut app = app.borrow_mut();
                if app.game.phase == Phase::Running {
                    sim::apply_action(&mut app.game, Action::TogglePause, js_sys::Date::now());
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            app.borrow_mut().frame();
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Portal Snake (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless_demo();
}

/// Drive a scripted session against a synthetic clock and report how it
/// went. Exercises the full tick/consume/collide loop without a browser.
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use portal_snake::consts::GRID_SIZE;
    use portal_snake::sim::{self, Action, Game, Phase, Turn};

    let mut game = Game::new(GRID_SIZE, 0xC0FFEE, 0, 0.0);
    let mut now = 0.0;
    sim::apply_action(&mut game, Action::Steer(Turn::Right), now);

    // Patrol a loop, turning once a second, until collision or timeout.
    let patrol = [Turn::Down, Turn::Left, Turn::Up, Turn::Right];
    let mut leg = 0;
    let mut next_turn = 1000.0;
    while game.phase == Phase::Running && now < 120_000.0 {
        now += 16.0;
        sim::advance(&mut game, now);
        if now >= next_turn {
            sim::apply_action(&mut game, Action::Steer(patrol[leg]), now);
            leg = (leg + 1) % patrol.len();
            next_turn += 1000.0;
        }
    }

    log::info!(
        "headless session over after {:.1}s: phase {:?}, score {}, best {}, length {}",
        now / 1000.0,
        game.phase,
        game.score.current,
        game.score.best,
        game.snake.len()
    );
    println!(
        "final score: {} (best {}), snake length {}",
        game.score.current,
        game.score.best,
        game.snake.len()
    );
}
