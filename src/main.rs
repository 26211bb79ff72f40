//! Sky Hopper entry point
//!
//! Browser builds wire the canvas, DOM controls and input listeners to the
//! game and keep exactly one animation-frame or countdown callback alive.
//! Native builds run a headless autopilot session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent, TouchEvent};

    use sky_hopper::consts::{COUNTDOWN_INTERVAL_MS, TUNING_KEY};
    use sky_hopper::game::GamePhase;
    use sky_hopper::input::{InputEvent, Key};
    use sky_hopper::persistence::{KeyValueStore, LocalStore};
    use sky_hopper::records::{CompletionStatus, HistoryEntry, IdentityProvider};
    use sky_hopper::platform::web::{BrowserStorage, CanvasSurface};
    use sky_hopper::renderer::RenderSurface;
    use sky_hopper::{Game, Identity, LoopDirective, Settings, Tuning};

    type KioskGame = Game<LocalStore<BrowserStorage>>;

    /// Game plus the browser callbacks currently scheduled for it
    struct Driver {
        game: KioskGame,
        surface: Option<CanvasSurface>,
        frame_handle: Option<i32>,
        countdown_handle: Option<i32>,
        on_frame: Option<js_sys::Function>,
        on_countdown: Option<js_sys::Function>,
    }

    impl Driver {
        /// Reconcile scheduled callbacks with what the game wants
        fn apply(&mut self, directive: LoopDirective) {
            let Some(window) = web_sys::window() else {
                return;
            };

            match directive {
                LoopDirective::Frame => {
                    self.stop_countdown(&window);
                    if self.frame_handle.is_none() {
                        if let Some(f) = &self.on_frame {
                            self.frame_handle = window.request_animation_frame(f).ok();
                        }
                    }
                }
                LoopDirective::Countdown => {
                    self.stop_frames(&window);
                    if self.countdown_handle.is_none() {
                        if let Some(f) = &self.on_countdown {
                            self.countdown_handle = window
                                .set_interval_with_callback_and_timeout_and_arguments_0(
                                    f,
                                    COUNTDOWN_INTERVAL_MS,
                                )
                                .ok();
                        }
                    }
                }
                LoopDirective::Idle => {
                    self.stop_frames(&window);
                    self.stop_countdown(&window);
                }
            }

            // Frames draw themselves; everything else needs an explicit redraw
            if directive != LoopDirective::Frame {
                self.redraw();
                self.refresh_reports();
            }
            self.sync_controls();
        }

        fn stop_frames(&mut self, window: &web_sys::Window) {
            if let Some(handle) = self.frame_handle.take() {
                let _ = window.cancel_animation_frame(handle);
            }
        }

        fn stop_countdown(&mut self, window: &web_sys::Window) {
            if let Some(handle) = self.countdown_handle.take() {
                window.clear_interval_with_handle(handle);
            }
        }

        fn redraw(&mut self) {
            if let Some(surface) = self.surface.as_mut() {
                self.game.render(surface);
            }
        }

        fn frame(&mut self) {
            self.frame_handle = None;
            let now = js_sys::Date::now();
            let surface = self.surface.as_mut().map(|s| s as &mut dyn RenderSurface);
            let directive = self.game.frame(now, surface);
            self.apply(directive);
        }

        /// Show only the buttons that make sense in the current phase
        fn sync_controls(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.game.phase();
            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            show("start-btn", phase == GamePhase::Idle);
            show("restart-btn", phase.is_terminal());
            show(
                "quit-btn",
                matches!(phase, GamePhase::CountingDown | GamePhase::Playing),
            );
            show("login-form", self.game.services().current_identity().is_none());

            if let Some(el) = document.get_element_by_id("high-score") {
                el.set_text_content(Some(&self.game.high_score().to_string()));
            }
        }

        /// Player profile, dashboard stats and the filtered history table
        fn refresh_reports(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };

            let player = self.game.services().current_identity();
            set_text("profile-name", player.as_ref().map_or("-", |p| p.name.as_str()));
            set_text("profile-email", player.as_ref().map_or("-", |p| p.email.as_str()));
            set_text("profile-phone", player.as_ref().map_or("-", |p| p.phone.as_str()));

            let history = self.game.services().history();
            let stats = history.stats();
            set_text("stat-total", &stats.total_games.to_string());
            set_text("stat-completed", &stats.completed_games.to_string());
            set_text("stat-average", &stats.average_score.to_string());
            set_text("stat-best", &stats.highest_score.to_string());

            let entries = history.filter_by_name(&input_value(&document, "history-search"));
            set_text("history-count", &entries.len().to_string());
            if let Some(body) = document.get_element_by_id("history-body") {
                body.set_text_content(None);
                // Newest first
                for entry in entries.iter().rev() {
                    if let Some(row) = history_row(&document, entry) {
                        let _ = body.append_child(&row);
                    }
                }
            }
        }
    }

    fn history_row(document: &web_sys::Document, entry: &HistoryEntry) -> Option<web_sys::Element> {
        let result = &entry.result;
        let date = js_sys::Date::new(&JsValue::from_f64(result.timestamp))
            .to_locale_date_string("default", &JsValue::UNDEFINED);
        let status = match result.status {
            CompletionStatus::Completed => "Completed",
            CompletionStatus::Incomplete => "Incomplete",
        };

        let row = document.create_element("tr").ok()?;
        for text in [
            result.player.name.clone(),
            String::from(date),
            result.final_score.to_string(),
            format!("Level {}", result.level),
            status.to_string(),
        ] {
            let cell = document.create_element("td").ok()?;
            cell.set_text_content(Some(&text));
            row.append_child(&cell).ok()?;
        }
        Some(row)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Sky Hopper starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, cannot start");
            return;
        };

        let storage = BrowserStorage::new();
        let tuning = storage
            .get(TUNING_KEY)
            .map(|json| Tuning::from_json(&json))
            .unwrap_or_default();
        let settings = Settings::load(&storage);

        let canvas: Option<HtmlCanvasElement> = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok());
        let surface = canvas.as_ref().and_then(|canvas| {
            canvas.set_width(tuning.width as u32);
            canvas.set_height(tuning.height as u32);
            CanvasSurface::from_canvas(canvas)
        });
        if surface.is_none() {
            log::warn!("No canvas 2D context, the game will run without drawing");
        }

        let game = Game::new(LocalStore::new(storage), tuning, settings);
        let driver = Rc::new(RefCell::new(Driver {
            game,
            surface,
            frame_handle: None,
            countdown_handle: None,
            on_frame: None,
            on_countdown: None,
        }));

        // Callbacks live for the whole page, so they are leaked into JS functions
        {
            let d = driver.clone();
            let on_frame = Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                d.borrow_mut().frame();
            });
            driver.borrow_mut().on_frame = Some(on_frame.into_js_value().unchecked_into());
        }
        {
            let d = driver.clone();
            let on_countdown = Closure::<dyn FnMut()>::new(move || {
                let mut d = d.borrow_mut();
                let directive = d.game.countdown_tick();
                d.apply(directive);
            });
            driver.borrow_mut().on_countdown =
                Some(on_countdown.into_js_value().unchecked_into());
        }

        if let Some(canvas) = &canvas {
            setup_pointer_handlers(canvas, driver.clone());
        }
        setup_keyboard(driver.clone());
        setup_buttons(driver.clone());
        setup_login_form(driver.clone());
        setup_reports(driver.clone());
        setup_auto_pause(driver.clone());

        let directive = driver.borrow().game.directive();
        driver.borrow_mut().apply(directive);

        log::info!("Sky Hopper running!");
    }

    fn on_click(id: &str, driver: Rc<RefCell<Driver>>, action: fn(&mut KioskGame) -> LoopDirective) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut d = driver.borrow_mut();
                let directive = action(&mut d.game);
                d.apply(directive);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(driver: Rc<RefCell<Driver>>) {
        on_click("start-btn", driver.clone(), |g| {
            g.start(js_sys::Date::now() as u64)
        });
        on_click("restart-btn", driver.clone(), |g| {
            g.restart(js_sys::Date::now() as u64)
        });
        on_click("quit-btn", driver.clone(), |g| g.abandon());
        on_click("pause-btn", driver.clone(), |g| g.toggle_pause());
        on_click("logout-btn", driver, |g| {
            g.services_mut().log_out();
            g.directive()
        });
    }

    fn input_value(document: &web_sys::Document, id: &str) -> String {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn setup_login_form(driver: Rc<RefCell<Driver>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id("login-btn") else {
            return;
        };

        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let result = Identity::new(
                &input_value(&doc, "player-name"),
                &input_value(&doc, "player-email"),
                &input_value(&doc, "player-phone"),
            );
            let errors = match result {
                Ok(identity) => {
                    let mut d = driver.borrow_mut();
                    d.game.services_mut().log_in(identity);
                    d.sync_controls();
                    d.refresh_reports();
                    Vec::new()
                }
                Err(errors) => {
                    log::warn!("Login rejected: {:?}", errors);
                    errors
                }
            };

            // One message slot per field, all marked together
            for field in ["name", "email", "phone"] {
                let message = errors
                    .iter()
                    .find(|e| e.field() == field)
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                if let Some(el) = doc.get_element_by_id(&format!("{}-error", field)) {
                    el.set_text_content(Some(&message));
                }
                if let Some(input) = doc.get_element_by_id(&format!("player-{}", field)) {
                    let class = if message.is_empty() { "" } else { "invalid" };
                    let _ = input.set_attribute("class", class);
                }
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_reports(driver: Rc<RefCell<Driver>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(search) = document.get_element_by_id("history-search") else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            driver.borrow().refresh_reports();
        });
        let _ = search.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(driver: Rc<RefCell<Driver>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let driver = driver.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut d = driver.borrow_mut();
                match event.code().as_str() {
                    "Escape" | "KeyP" => {
                        let directive = d.game.toggle_pause();
                        d.apply(directive);
                    }
                    code => {
                        let key = Key::from_code(code);
                        if key != Key::Other {
                            event.prevent_default();
                        }
                        d.game.push_input(InputEvent::KeyDown(key));
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_code(&event.code());
                driver.borrow_mut().game.push_input(InputEvent::KeyUp(key));
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, driver: Rc<RefCell<Driver>>) {
        // Mouse move positions the player directly
        {
            let driver = driver.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let display_width = canvas_clone.client_width() as f32;
                driver.borrow_mut().game.push_input(InputEvent::PointerMove {
                    x: event.offset_x() as f32,
                    display_width,
                });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start picks a screen half
        {
            let driver = driver.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    driver.borrow_mut().game.push_input(InputEvent::TouchStart {
                        x,
                        display_width: rect.width() as f32,
                    });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel release both directions
        for event_name in ["touchend", "touchcancel"] {
            let driver = driver.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                driver.borrow_mut().game.push_input(InputEvent::TouchEnd);
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(driver: Rc<RefCell<Driver>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let driver = driver.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut d = driver.borrow_mut();
                    let directive = d.game.auto_pause();
                    d.apply(directive);
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
                let mut d = driver.borrow_mut();
                let directive = d.game.auto_pause();
                d.apply(directive);
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

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sky_hopper::input::{InputEvent, Key};
    use sky_hopper::persistence::{LocalStore, MemoryStore};
    use sky_hopper::renderer::{PixelSurface, hud_lines};
    use sky_hopper::sim::TickInput;
    use sky_hopper::sim::autopilot::steer;
    use sky_hopper::{Game, Identity, LoopDirective, Settings, Tuning};

    /// Five minutes at 60 fps
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    env_logger::init();
    log::info!("Sky Hopper (native) starting headless autopilot run...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let mut store = LocalStore::new(MemoryStore::default());
    match Identity::new("Autopilot", "autopilot@example.com", "0000") {
        Ok(identity) => store.log_in(identity),
        Err(e) => {
            log::error!("Demo identity rejected: {:?}", e);
            return;
        }
    }

    let tuning = Tuning::default();
    let mut surface = PixelSurface::new(tuning.width as u32, tuning.height as u32);
    let mut game = Game::new(store, tuning, Settings::default());

    let mut now = 0.0;
    let mut directive = game.start(seed);
    while directive == LoopDirective::Countdown {
        log::info!("{}...", game.countdown());
        directive = game.countdown_tick();
        now += 1000.0;
    }

    // Autopilot intents are replayed as key presses
    let mut held = TickInput::default();
    let mut frames = 0;
    while directive == LoopDirective::Frame && frames < MAX_FRAMES {
        if let Some(session) = game.session() {
            let want = steer(session, game.tuning());
            for (key, was, is) in [
                (Key::Left, held.left, want.left),
                (Key::Right, held.right, want.right),
            ] {
                match (was, is) {
                    (false, true) => game.push_input(InputEvent::KeyDown(key)),
                    (true, false) => game.push_input(InputEvent::KeyUp(key)),
                    _ => {}
                }
            }
            held = want;
        }

        directive = game.frame(now, Some(&mut surface));
        now += FRAME_MS;
        frames += 1;

        if frames % 600 == 0 {
            if let Some(session) = game.session() {
                let [score, speed] = hud_lines(session);
                log::info!("[{}s] {} | {}", frames / 60, score, speed);
            }
        }
    }

    println!(
        "Seed {}: {:?} after {} frames with score {} (high score {})",
        seed,
        game.phase(),
        frames,
        game.score(),
        game.high_score()
    );
    let stats = game.services().history().stats();
    println!(
        "History: {} games, {} completed, average {}, best {}",
        stats.total_games, stats.completed_games, stats.average_score, stats.highest_score
    );
    for entry in game.services().history().filter_by_name("autopilot") {
        let result = &entry.result;
        println!(
            "  {} {} score={} level={} {:?}",
            entry.id, result.player.name, result.final_score, result.level, result.status
        );
    }
}
