//! Bubble Pop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement,
        MouseEvent, TouchEvent,
    };

    use bubble_pop::audio::{AudioManager, SoundEffect};
    use bubble_pop::demo::Autoplayer;
    use bubble_pop::platform::{Clock, SystemClock};
    use bubble_pop::renderer::canvas::draw_frame;
    use bubble_pop::sim::{GamePhase, PlayBounds, TickStatus};
    use bubble_pop::{GameConfig, ResultsSnapshot, Session, SessionSnapshot, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session,
        clock: SystemClock,
        audio: AudioManager,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        bounds: PlayBounds,
        autoplayer: Autoplayer,
        idle_mode: bool,
        sfx_rng: Pcg32,
    }

    impl Game {
        /// Match the backing store to the CSS size and device pixel ratio
        fn resize(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let client_w = self.canvas.client_width().max(1);
            let client_h = self.canvas.client_height().max(1);
            self.canvas.set_width((client_w as f64 * dpr) as u32);
            self.canvas.set_height((client_h as f64 * dpr) as u32);
            // Setting the size resets the transform
            self.ctx.scale(dpr, dpr).ok();

            self.bounds = PlayBounds::new(client_w as f32, client_h as f32);
            self.session.resize(self.bounds);
        }

        fn click_at(&mut self, x: f32, y: f32) {
            self.audio.resume();
            let now = self.clock.now_ms();
            if let Some(outcome) = self.session.click(Vec2::new(x, y), now) {
                log::debug!("Click at ({x:.0}, {y:.0}): {outcome:?}");
            }
        }

        fn frame(&mut self, now: f64) {
            if self.idle_mode && self.session.phase() == GamePhase::Playing {
                if let Some(point) = self.autoplayer.next_click(self.session.bubbles(), self.bounds, now)
                {
                    self.session.click(point, now);
                }
            }

            if self.session.tick(now) == TickStatus::Expired {
                self.autoplayer.reset();
            }

            for event in self.session.drain_events() {
                if let Some(effect) = SoundEffect::for_event(event, &mut self.sfx_rng) {
                    self.audio.play(effect);
                }
            }

            draw_frame(
                &self.ctx,
                self.session.bubbles(),
                self.bounds.width as f64,
                self.bounds.height as f64,
            );
            self.update_hud(now);
        }

        /// Update HTML HUD elements
        fn update_hud(&self, now: f64) {
            if self.session.phase() != GamePhase::Playing {
                return;
            }
            let metrics = self.session.metrics();
            set_text("hud-time", &self.session.time_remaining_secs(now).to_string());
            set_text("hud-hits", &metrics.hits.to_string());
            set_text("hud-misses", &metrics.misses.to_string());
            set_text("hud-streak", &metrics.streak.to_string());
            set_text("hud-accuracy", &format!("{:.0}%", metrics.derived.accuracy));
            set_text(
                "hud-speed",
                &format!("x{:.1}", self.session.speed_multiplier()),
            );
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn input_value(id: &str) -> Option<String> {
        let el = document()?.get_element_by_id(id)?;
        match el.dyn_into::<HtmlInputElement>() {
            Ok(input) => Some(input.value()),
            Err(el) => el.dyn_into::<HtmlSelectElement>().ok().map(|s| s.value()),
        }
    }

    /// Build a config from the setup form, keeping defaults for missing fields
    fn read_setup_form() -> GameConfig {
        let mut config = GameConfig::default();
        if let Some(name) = input_value("player-name") {
            config.player_name = name;
        }
        if let Some(icon) = input_value("player-icon") {
            config.icon = icon;
        }
        if let Some(secs) = input_value("game-time").and_then(|v| v.parse().ok()) {
            config.game_time_secs = secs;
        }
        if let Some(count) = input_value("bubble-count").and_then(|v| v.parse().ok()) {
            config.bubble_count = count;
        }
        if let Some(age) = input_value("player-age").and_then(|v| v.parse().ok()) {
            config.player_age = age;
        }
        config
    }

    /// Show the panel for the current phase and fill in results
    fn show_phase(snapshot: &SessionSnapshot) {
        set_visible("setup", snapshot.phase == GamePhase::Setup);
        set_visible("hud", snapshot.phase == GamePhase::Playing);
        set_visible("results", snapshot.phase == GamePhase::Completed);

        if snapshot.phase == GamePhase::Completed {
            let results = ResultsSnapshot::new(snapshot.config.clone(), snapshot.metrics.clone());
            let m = &results.metrics;
            let mut rng = Pcg32::seed_from_u64(js_sys::Date::now() as u64);
            set_text("results-message", results.personality_message(&mut rng));
            set_text("results-hits", &m.hits.to_string());
            set_text("results-misses", &m.misses.to_string());
            set_text("results-accuracy", &format!("{:.1}%", m.derived.accuracy));
            set_text("results-rt", &format!("{:.0} ms", m.derived.avg_reaction_time));
            set_text("results-streak", &m.best_streak.to_string());
            set_text("results-tpm", &format!("{:.1}", m.derived.targets_per_minute));
            set_text("results-csv", &results.to_csv());
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bubble Pop starting...");

        let document = document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let mut session = Session::default();
        session.subscribe(Box::new(show_phase));

        let game = Rc::new(RefCell::new(Game {
            session,
            clock: SystemClock::new(),
            audio: AudioManager::new(Settings::default()),
            ctx,
            canvas: canvas.clone(),
            bounds: PlayBounds::default(),
            autoplayer: Autoplayer::new(450.0, 0.1, seed),
            idle_mode: false,
            sfx_rng: Pcg32::seed_from_u64(seed),
        }));
        game.borrow_mut().resize();
        show_phase(&game.borrow().session.snapshot());

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        request_animation_frame(game);

        log::info!("Bubble Pop running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let y = event.client_y() as f32 - rect.top() as f32;
                game.borrow_mut().click_at(x, y);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let rect = canvas_clone.get_bounding_client_rect();
                let touches = event.changed_touches();
                let mut g = game.borrow_mut();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let x = touch.client_x() as f32 - rect.left() as f32;
                        let y = touch.client_y() as f32 - rect.top() as f32;
                        g.click_at(x, y);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "i" | "I" => {
                        g.idle_mode = !g.idle_mode;
                        g.autoplayer.reset();
                        log::info!("Idle mode: {}", g.idle_mode);
                    }
                    "Escape" => {
                        if let Err(e) = g.session.abandon() {
                            log::debug!("{e}");
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let config = read_setup_form();
                let now = g.clock.now_ms();
                let bounds = g.bounds;
                let seed = js_sys::Date::now() as u64;
                let started = g
                    .session
                    .set_config(config)
                    .and_then(|_| g.session.start(now, bounds, seed));
                match started {
                    Ok(()) => set_text("setup-error", ""),
                    Err(e) => set_text("setup-error", &e.to_string()),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("end-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Err(e) = game.borrow_mut().session.abandon() {
                    log::debug!("{e}");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Err(e) = game.borrow_mut().session.reset() {
                    log::debug!("{e}");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bubble Pop (native) starting...");
    log::info!("Running a headless round in idle mode - run with `trunk serve` to play");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use bubble_pop::demo::Autoplayer;
    use bubble_pop::platform::{Clock, ManualClock};
    use bubble_pop::sim::{PlayBounds, TickStatus};
    use bubble_pop::{GameConfig, Session};

    /// 60 fps
    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn load_config() -> GameConfig {
        let mut config = match std::env::var("BUBBLE_POP_CONFIG") {
            Ok(path) => GameConfig::load(&path).unwrap_or_else(|e| {
                log::warn!("Could not load config from {path}: {e}; using defaults");
                GameConfig::default()
            }),
            Err(_) => GameConfig::default(),
        };
        if config.player_name.trim().is_empty() {
            config.player_name = "Player".to_string();
        }
        config
    }

    pub fn run() {
        let config = load_config();
        let seed = std::env::var("BUBBLE_POP_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(42);

        let clock = ManualClock::new(0.0);
        let bounds = PlayBounds::default();
        let mut session = Session::new(config);
        let mut player = Autoplayer::new(450.0, 0.1, seed);

        if let Err(e) = session.start(clock.now_ms(), bounds, seed) {
            log::error!("Could not start round: {e}");
            return;
        }

        loop {
            clock.advance(FRAME_MS);
            let now = clock.now_ms();
            if let Some(point) = player.next_click(session.bubbles(), bounds, now) {
                session.click(point, now);
            }
            let status = session.tick(now);
            for event in session.drain_events() {
                log::debug!("{:>8.0} ms  {event:?}", now);
            }
            if status != TickStatus::Running {
                break;
            }
        }

        match session.results() {
            Some(results) => {
                let m = &results.metrics;
                log::info!(
                    "Hits {}  Misses {}  Accuracy {:.1}%  Avg RT {:.0} ms  Best streak {}  TPM {:.1}",
                    m.hits,
                    m.misses,
                    m.derived.accuracy,
                    m.derived.avg_reaction_time,
                    m.best_streak,
                    m.derived.targets_per_minute
                );
                let mut rng = rand::rng();
                log::info!("{}", results.personality_message(&mut rng));
                println!("{}", results.to_csv());
            }
            None => log::warn!("Round ended without results"),
        }
    }
}
