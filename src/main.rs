//! Tunnel Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop. The 3D
//! scene is drawn by an external renderer that reads the state snapshot
//! published on `window.__tunnelRunnerState` every frame.

#[cfg(not(target_arch = "wasm32"))]
use tunnel_runner::Tuning;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use tunnel_runner::audio::{self, AudioManager, SoundEffect};
    use tunnel_runner::platform::input::prevents_default;
    use tunnel_runner::platform::storage::LocalStore;
    use tunnel_runner::platform::{FrameClock, Intent, SwipeTracker, intent_for_key};
    use tunnel_runner::sim::RunEvent;
    use tunnel_runner::tuning::Tuning;
    use tunnel_runner::{Session, Settings};

    const SCREENS: [&str; 3] = ["main-menu", "game-screen", "game-over"];

    /// Which screen is showing
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Screen {
        Menu,
        Playing,
        GameOver,
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        audio: AudioManager,
        clock: FrameClock,
        swipe: SwipeTracker,
        screen: Screen,
        /// Clock value (seconds) of the latest animation frame
        now: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(session: Session) -> Self {
            let audio = AudioManager::new(&session.settings);
            Self {
                session,
                audio,
                clock: FrameClock::new(),
                swipe: SwipeTracker::new(),
                screen: Screen::Menu,
                now: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Start (or restart) a run from the current frame time
        fn start_run(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.audio.resume();
            self.session.start(self.now, seed);
            self.swipe.cancel();
            self.screen = Screen::Playing;
            show_screen("game-screen");
        }

        fn intent(&mut self, intent: Intent) {
            if self.screen != Screen::Playing {
                return;
            }
            if self.session.handle_intent(intent, self.now) {
                let events = self.session.state.drain_events();
                self.present_events(events);
            }
        }

        /// Change, persist and apply the player settings
        fn change_settings(&mut self, edit: impl FnOnce(&mut Settings)) {
            let mut settings = self.session.settings.clone();
            edit(&mut settings);
            self.session.update_settings(settings);
            self.audio.apply_settings(&self.session.settings);
            self.show_settings();
        }

        /// Mark each settings toggle with its current value
        fn show_settings(&self) {
            let Some(document) = document() else { return };
            let settings = &self.session.settings;
            for (id, on) in [
                ("mute-btn", settings.muted),
                ("vibration-btn", settings.vibration),
                ("fps-btn", settings.show_fps),
                ("motion-btn", settings.reduced_motion),
            ] {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.class_list().toggle_with_force("active", on);
                }
            }
        }

        /// Advance one animation frame
        fn update(&mut self, time: f64) {
            let frame = self.clock.advance(time);
            self.now = frame.now;

            if self.screen == Screen::Playing {
                let events = self.session.frame(frame.now, frame.delta);
                self.present_events(events);
                if self.session.is_over() {
                    self.screen = Screen::GameOver;
                    self.show_game_over();
                }
            }

            // FPS over the last 60 frames
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Play sounds/vibration for everything the last step produced
        fn present_events(&mut self, events: Vec<RunEvent>) {
            for event in events {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                if self.session.settings.vibration {
                    if let Some(pattern) = audio::vibration_pattern(&event) {
                        audio::vibrate(pattern);
                    }
                }
                match event {
                    RunEvent::Paused => set_text("pause-btn", "\u{25B6}"),
                    RunEvent::Resumed => set_text("pause-btn", "||"),
                    _ => {}
                }
            }
        }

        /// Publish the state for the renderer
        fn publish_snapshot(&self) {
            let Some(window) = web_sys::window() else { return };
            match self.session.snapshot_json() {
                Ok(json) => {
                    let _ = js_sys::Reflect::set(
                        &window,
                        &JsValue::from_str("__tunnelRunnerState"),
                        &JsValue::from_str(&json),
                    );
                }
                Err(e) => log::warn!("Snapshot failed: {e}"),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else { return };
            let state = &self.session.state;

            set_text("current-score", &state.score.to_string());

            if let Some(container) = document.get_element_by_id("lives-container") {
                container.set_text_content(Some(&"\u{2665}".repeat(state.lives as usize)));
            }

            set_text(
                "collectible-count",
                &state.run_stats.collectibles_collected.to_string(),
            );

            // CSS draws the cooldown sweep from data-cooldown (1 = just used)
            for (kind, skill) in state.skills.iter() {
                let id = format!("skill-{}", kind.as_str());
                if let Some(el) = document.get_element_by_id(&id) {
                    let _ = el.class_list().toggle_with_force("cooldown", !skill.is_ready());
                    let _ = el.set_attribute(
                        "data-cooldown",
                        &format!("{:.2}", skill.cooldown_fraction()),
                    );
                }
            }

            if let Some(el) = document.get_element_by_id("shield-indicator") {
                let _ = el.class_list().toggle_with_force("active", state.has_shield);
            }

            if let Some(canvas) = document.get_element_by_id("game-canvas") {
                let hidden = self.session.settings.effective_blink() && state.blink_hidden();
                let _ = canvas.class_list().toggle_with_force("blink-hidden", hidden);
            }

            if let Some(el) = document.get_element_by_id("fps") {
                if self.session.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                } else {
                    el.set_text_content(None);
                }
            }
        }

        fn show_game_over(&self) {
            let Some(summary) = self.session.summary() else { return };
            set_text("final-score", &summary.score.to_string());
            set_text("best-score", &summary.best_score.to_string());
            set_text("game-time", &summary.elapsed_label());
            set_text("stat-jumps", &summary.stats.jumps.to_string());
            set_text("stat-dashes", &summary.stats.dashes.to_string());
            set_text("stat-powerups", &summary.stats.powerups_collected.to_string());
            set_text("stat-dodged", &summary.stats.obstacles_dodged.to_string());
            set_text("stat-collectibles", &summary.stats.collectibles_collected.to_string());
            if let Some(el) = document().and_then(|d| d.get_element_by_id("new-best")) {
                let _ = el.class_list().toggle_with_force("active", summary.new_best);
            }
            show_screen("game-over");
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    /// Make exactly one screen active
    fn show_screen(active: &str) {
        let Some(document) = document() else { return };
        for id in SCREENS {
            if let Some(el) = document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("active", id == active);
            }
        }
    }

    /// Whether the browser can give us a WebGL context for the renderer
    fn rendering_supported(canvas: &HtmlCanvasElement) -> bool {
        ["webgl2", "webgl"]
            .iter()
            .any(|kind| matches!(canvas.get_context(kind), Ok(Some(_))))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tunnel Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        if !rendering_supported(&canvas) {
            log::error!("WebGL unavailable - showing fallback");
            if let Some(el) = document.get_element_by_id("webgl-fallback") {
                let _ = el.class_list().add_1("active");
            }
            return;
        }

        let store = LocalStore::open();
        let session = Session::new(
            Tuning::default(),
            Box::new(store),
            0.0,
            js_sys::Date::now() as u64,
        );
        set_text("best-score", &session.best_score().to_string());
        let game = Rc::new(RefCell::new(Game::new(session)));
        game.borrow().show_settings();

        setup_buttons(game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        show_screen("main-menu");
        request_animation_frame(game);
        log::info!("Tunnel Runner running!");
    }

    fn on_click(id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::error!("Element '{id}' not found - no click handler attached");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("play-btn", move |_| game.borrow_mut().start_run());
        }
        {
            let game = game.clone();
            on_click("restart-btn", move |_| game.borrow_mut().start_run());
        }
        {
            let game = game.clone();
            on_click("menu-btn", move |_| {
                game.borrow_mut().screen = Screen::Menu;
                show_screen("main-menu");
            });
        }
        {
            let game = game.clone();
            on_click("pause-btn", move |_| {
                game.borrow_mut().intent(Intent::PauseToggle);
            });
        }

        // Settings toggles
        {
            let game = game.clone();
            on_click("mute-btn", move |_| {
                game.borrow_mut().change_settings(|s| s.muted = !s.muted);
            });
        }
        {
            let game = game.clone();
            on_click("vibration-btn", move |_| {
                game.borrow_mut().change_settings(|s| s.vibration = !s.vibration);
            });
        }
        {
            let game = game.clone();
            on_click("fps-btn", move |_| {
                game.borrow_mut().change_settings(|s| s.show_fps = !s.show_fps);
            });
        }
        on_click("motion-btn", move |_| {
            game.borrow_mut()
                .change_settings(|s| s.reduced_motion = !s.reduced_motion);
        });
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if let Some(intent) = intent_for_key(&code) {
                    if prevents_default(&code) {
                        event.prevent_default();
                    }
                    game.borrow_mut().intent(intent);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut()
                        .swipe
                        .touch_start(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - classify the gesture
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.changed_touches().get(0) else { return };
                let mut g = game.borrow_mut();
                let time_ms = js_sys::Date::now();
                let intent =
                    g.swipe
                        .touch_end(touch.client_x() as f32, touch.client_y() as f32, time_ms);
                if let Some(intent) = intent {
                    g.intent(intent);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            if g.screen != Screen::Menu {
                g.publish_snapshot();
                g.update_hud();
            }
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                if g.session.settings.mute_on_blur {
                    g.audio.set_muted(hidden);
                }
                // The hidden span is not play time
                if !hidden {
                    g.clock.reset();
                }
                if hidden && g.screen == Screen::Playing && !g.session.state.is_paused {
                    g.intent(Intent::PauseToggle);
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.screen == Screen::Playing && !g.session.state.is_paused {
                    g.intent(Intent::PauseToggle);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
    log::info!("Tunnel Runner (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Optional tuning override: path to a JSON file
    let json = std::env::args()
        .nth(1)
        .and_then(|path| match std::fs::read_to_string(&path) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Could not read tuning file {path}: {e}");
                None
            }
        });
    headless_run(Tuning::load_or_default(json.as_deref()));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one run at 60 Hz with a simple autopilot and print the summary
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(tuning: Tuning) {
    use tunnel_runner::Session;
    use tunnel_runner::persistence::MemoryStore;
    use tunnel_runner::platform::Intent;
    use tunnel_runner::sim::{ObjectKind, ObstacleShape};

    const DT: f32 = 1.0 / 60.0;

    let mut session = Session::new(tuning, Box::new(MemoryStore::new()), 0.0, 2024);
    let mut now = 0.0f64;

    // Cap at ten minutes of play
    while !session.is_over() && now < 600.0 {
        now += DT as f64;

        // React to the nearest obstacle about to arrive
        let incoming = session
            .track
            .objects
            .iter()
            .filter(|o| !o.resolved && o.z > -4.0 && o.z < 0.0)
            .find_map(|o| match o.kind {
                ObjectKind::Obstacle(shape) => Some(shape),
                _ => None,
            });
        let intent = match incoming {
            Some(ObstacleShape::Cable) => Some(Intent::Dash),
            Some(ObstacleShape::Pipe | ObstacleShape::LaserNet | ObstacleShape::LowWall { .. }) => {
                Some(Intent::Jump)
            }
            Some(
                ObstacleShape::Grate { gap_lane: open }
                | ObstacleShape::Firewall { safe_lane: open },
            ) => match open.cmp(&session.state.lane) {
                std::cmp::Ordering::Less => Some(Intent::LaneLeft),
                std::cmp::Ordering::Greater => Some(Intent::LaneRight),
                std::cmp::Ordering::Equal => None,
            },
            Some(ObstacleShape::Pillar { lane }) if lane == session.state.lane => {
                Some(if lane == 0 {
                    Intent::LaneRight
                } else {
                    Intent::LaneLeft
                })
            }
            _ => None,
        };
        if let Some(intent) = intent {
            session.handle_intent(intent, now);
        }

        session.frame(now, DT);
    }

    match session.summary() {
        Some(summary) => println!(
            "Run over: score {} in {} (jumps {}, dashes {}, dodged {}, power-ups {}, collectibles {})",
            summary.score,
            summary.elapsed_label(),
            summary.stats.jumps,
            summary.stats.dashes,
            summary.stats.obstacles_dodged,
            summary.stats.powerups_collected,
            summary.stats.collectibles_collected,
        ),
        None => println!(
            "Autopilot survived {:.0}s with score {} and {} lives",
            now, session.state.score, session.state.lives
        ),
    }
}
