//! Flappy Modal entry point
//!
//! On the web this wires a [`Session`] to the host page's modal and runs the
//! frame loop. Natively it plays a few autopilot runs headless and logs them.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_modal::Session;
    use flappy_modal::platform::input::{EXIT_BUTTON_ID, RESTART_BUTTON_ID};
    use flappy_modal::platform::{OverlayGate, TapAction};
    use flappy_modal::platform::storage::LocalStore;
    use flappy_modal::sim::{GameEvent, GamePhase, GameState};

    const START_BUTTON_ID: &str = "flappy-start";
    const OVERLAY_ID: &str = "flappy-modal";
    const GAME_ID: &str = "flappy-game";

    /// DOM elements mirroring the simulation
    struct View {
        document: Document,
        root: HtmlElement,
        bird: HtmlElement,
        score: HtmlElement,
        message: HtmlElement,
        game_over: HtmlElement,
        best_score: HtmlElement,
        final_score: HtmlElement,
        pipe_tops: Vec<HtmlElement>,
        pipe_bottoms: Vec<HtmlElement>,
        clouds: Vec<HtmlElement>,
    }

    fn create(document: &Document, parent: &Element, class: &str) -> Option<HtmlElement> {
        let el: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
        el.set_class_name(class);
        parent.append_child(&el).ok()?;
        Some(el)
    }

    fn create_button(document: &Document, parent: &Element, id: &str, label: &str) -> Option<()> {
        let el = document.create_element("button").ok()?;
        el.set_id(id);
        el.set_text_content(Some(label));
        parent.append_child(&el).ok()?;
        Some(())
    }

    fn px(el: &HtmlElement, property: &str, value: f32) {
        let _ = el.style().set_property(property, &format!("{}px", value));
    }

    fn set_hidden(el: &HtmlElement, hidden: bool) {
        let _ = el.class_list().toggle_with_force("hidden", hidden);
    }

    /// Grow `pool` to `needed` elements and hide the surplus
    fn sync_pool(
        document: &Document,
        root: &HtmlElement,
        pool: &mut Vec<HtmlElement>,
        needed: usize,
        class: &str,
    ) {
        while pool.len() < needed {
            match create(document, root, class) {
                Some(el) => pool.push(el),
                None => break,
            }
        }
        for (i, el) in pool.iter().enumerate() {
            set_hidden(el, i >= needed);
        }
    }

    impl View {
        fn mount(document: &Document, root: HtmlElement) -> Option<Self> {
            root.set_inner_html("");
            let bird = create(document, &root, "bird")?;
            let score = create(document, &root, "score")?;
            let message = create(document, &root, "game-message")?;
            message.set_text_content(Some("Tap to start"));

            let game_over = create(document, &root, "game-over-screen hidden")?;
            let best_score = create(document, &game_over, "high-score")?;
            let final_score = create(document, &game_over, "final-score")?;
            create_button(document, &game_over, RESTART_BUTTON_ID, "Play again")?;
            create_button(document, &game_over, EXIT_BUTTON_ID, "Exit")?;

            Some(Self {
                document: document.clone(),
                root,
                bird,
                score,
                message,
                game_over,
                best_score,
                final_score,
                pipe_tops: Vec::new(),
                pipe_bottoms: Vec::new(),
                clouds: Vec::new(),
            })
        }

        fn unmount(&self) {
            self.root.set_inner_html("");
        }

        fn render(&mut self, state: &GameState, high_score: u32, new_record: bool) {
            let tuning = &state.tuning;

            px(&self.bird, "top", state.bird.y);
            px(&self.bird, "left", tuning.bird_x);
            px(&self.bird, "width", tuning.bird_size);
            px(&self.bird, "height", tuning.bird_size);
            let _ = self
                .bird
                .style()
                .set_property("transform", &format!("rotate({}deg)", state.bird.rotation));

            let n = state.pipes.len();
            sync_pool(&self.document, &self.root, &mut self.pipe_tops, n, "pipe pipe-top");
            sync_pool(&self.document, &self.root, &mut self.pipe_bottoms, n, "pipe pipe-bottom");
            for (pipe, (top, bottom)) in state
                .pipes
                .iter()
                .zip(self.pipe_tops.iter().zip(&self.pipe_bottoms))
            {
                px(top, "left", pipe.x);
                px(top, "top", 0.0);
                px(top, "width", tuning.pipe_width);
                px(top, "height", pipe.gap_top);

                let gap_bottom = pipe.gap_bottom(tuning);
                px(bottom, "left", pipe.x);
                px(bottom, "top", gap_bottom);
                px(bottom, "width", tuning.pipe_width);
                px(bottom, "height", tuning.field_height - gap_bottom);
            }

            sync_pool(&self.document, &self.root, &mut self.clouds, state.clouds.len(), "cloud");
            for (el, cloud) in self.clouds.iter().zip(&state.clouds) {
                px(el, "left", cloud.x);
                px(el, "top", cloud.y);
                px(el, "width", tuning.cloud_width);
            }

            self.score.set_text_content(Some(&format!("Score: {}", state.score)));
            set_hidden(&self.score, state.phase != GamePhase::Playing);
            set_hidden(&self.message, state.phase != GamePhase::Idle);
            set_hidden(&self.game_over, state.phase != GamePhase::GameOver);

            if state.phase == GamePhase::GameOver {
                let best = if new_record {
                    format!("New record: {}", high_score)
                } else {
                    format!("Your record: {}", high_score)
                };
                self.best_score.set_text_content(Some(&best));
                self.final_score
                    .set_text_content(Some(&format!("Pipes passed: {}", state.score)));
            }
        }
    }

    /// Everything the page event handlers share
    struct App {
        document: Document,
        session: Option<Session<LocalStore>>,
        view: Option<View>,
        gate: OverlayGate,
        /// Pending requestAnimationFrame handle
        frame_handle: Option<i32>,
    }

    impl App {
        fn new(document: Document) -> Self {
            Self {
                document,
                session: None,
                view: None,
                gate: OverlayGate::default(),
                frame_handle: None,
            }
        }

        fn is_open(&self) -> bool {
            self.session.is_some()
        }

        fn render(&mut self) {
            if let (Some(session), Some(view)) = (&self.session, &mut self.view) {
                view.render(session.state(), session.high_score(), session.is_new_record());
            }
        }

        fn cancel_frame(&mut self) {
            if let Some(handle) = self.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
            if let Some(session) = &mut self.session {
                session.suspend();
            }
        }
    }

    fn now_ms() -> f64 {
        js_sys::Date::now()
    }

    /// Show the modal and mount a fresh game
    fn open(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        if a.is_open() {
            return;
        }

        let Some(root) = a
            .document
            .get_element_by_id(GAME_ID)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            log::error!("No #{} container, cannot mount game", GAME_ID);
            return;
        };

        let seed = now_ms() as u64;
        a.session = Some(Session::new(LocalStore::new(), seed));
        a.view = View::mount(&a.document, root);
        if a.view.is_none() {
            log::warn!("Failed to build game view");
        }

        if let Some(overlay) = a.document.get_element_by_id(OVERLAY_ID) {
            let _ = overlay.class_list().add_1("visible");
        }
        a.gate.open(now_ms());
        a.render();
        log::info!("Game opened");
    }

    /// Hide the modal, stop the loop and drop the game
    fn close(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        if !a.is_open() {
            return;
        }
        a.cancel_frame();
        if let Some(view) = a.view.take() {
            view.unmount();
        }
        a.session = None;
        a.gate.close();

        if let Some(overlay) = a.document.get_element_by_id(OVERLAY_ID) {
            let _ = overlay.class_list().remove_1("visible");
        }
        log::info!("Game closed");
    }

    fn press(app: &Rc<RefCell<App>>) {
        let accepted = app
            .borrow_mut()
            .session
            .as_mut()
            .map(|s| s.press(now_ms()))
            .unwrap_or(false);
        if accepted {
            ensure_frame_loop(app);
        }
    }

    fn restart(app: &Rc<RefCell<App>>) {
        if let Some(session) = app.borrow_mut().session.as_mut() {
            session.request_restart();
        }
        ensure_frame_loop(app);
    }

    fn toggle_autopilot(app: &Rc<RefCell<App>>) {
        if let Some(session) = app.borrow_mut().session.as_mut() {
            let on = !session.autopilot();
            session.set_autopilot(on);
        }
        ensure_frame_loop(app);
    }

    /// Start the frame loop if the game needs it and it is not running
    fn ensure_frame_loop(app: &Rc<RefCell<App>>) {
        let wants = {
            let a = app.borrow();
            a.frame_handle.is_none() && a.session.as_ref().is_some_and(|s| s.wants_frames())
        };
        if wants {
            request_animation_frame(app.clone());
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let app_for_frame = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(app_for_frame, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => app.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_going = {
            let mut a = app.borrow_mut();
            a.frame_handle = None;

            let Some(session) = a.session.as_mut() else {
                return;
            };
            for event in session.frame(time) {
                match event {
                    GameEvent::Crashed(cause) => log::info!("Crashed: {:?}", cause),
                    GameEvent::Scored { score } => log::debug!("Score {}", score),
                    _ => {}
                }
            }
            let keep_going = session.wants_frames();
            if !keep_going {
                // Leaving Playing: stop the loop, next start gets a fresh clock
                session.suspend();
            }
            a.render();
            keep_going
        };

        if keep_going {
            request_animation_frame(app);
        }
    }

    fn setup_host_handlers(app: Rc<RefCell<App>>) {
        let document = app.borrow().document.clone();

        // Launch button
        if let Some(btn) = document.get_element_by_id(START_BUTTON_ID) {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                open(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No #{} button on the page", START_BUTTON_ID);
        }

        let Some(overlay) = document.get_element_by_id(OVERLAY_ID) else {
            log::warn!("No #{} overlay on the page", OVERLAY_ID);
            return;
        };

        // Overlay click closes, but not right after opening
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let allowed = app.borrow().gate.allows_close(now_ms());
                if allowed {
                    close(&app);
                }
            });
            let _ = overlay.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Clicks inside the content never reach the overlay
        if let Some(content) = overlay.query_selector(".modal-content").ok().flatten() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
            });
            let _ = content.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn dispatch_tap(app: &Rc<RefCell<App>>, event: &web_sys::Event) {
        let target_id = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .map(|el| el.id())
            .unwrap_or_default();
        match TapAction::for_target(&target_id) {
            TapAction::Flap => press(app),
            TapAction::Restart => restart(app),
            TapAction::Exit => close(app),
        }
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let document = app.borrow().document.clone();
        let Some(game_area) = document.get_element_by_id(GAME_ID) else {
            log::warn!("No #{} container on the page", GAME_ID);
            return;
        };

        // Mouse click - flap, or one of the game over buttons
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                dispatch_tap(&app, &event);
            });
            let _ = game_area.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - flap, or one of the game over buttons.
        // Default is prevented so the tap does not also fire a click.
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                dispatch_tap(&app, &event);
            });
            let _ = game_area
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if !app.borrow().is_open() {
                    return;
                }
                match event.key().as_str() {
                    " " | "Enter" | "ArrowUp" => {
                        event.prevent_default();
                        press(&app);
                    }
                    "r" | "R" => restart(&app),
                    "i" | "I" => toggle_autopilot(&app),
                    "Escape" => close(&app),
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Modal starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let app = Rc::new(RefCell::new(App::new(document)));
        setup_host_handlers(app.clone());
        setup_input_handlers(app);

        log::info!("Flappy Modal ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_modal::Session;
    use flappy_modal::consts::REFERENCE_FRAME_MS;
    use flappy_modal::platform::MemoryStore;
    use flappy_modal::sim::{GameEvent, GamePhase};

    env_logger::init();
    log::info!("Flappy Modal (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - build for wasm32 to play");

    const RUNS: u32 = 3;
    const MAX_FRAMES_PER_RUN: u32 = 60 * 120;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = Session::new(MemoryStore::default(), seed);
    session.set_autopilot(true);

    let mut t = 0.0;
    for run in 1..=RUNS {
        let mut frames = 0;
        while frames < MAX_FRAMES_PER_RUN {
            t += REFERENCE_FRAME_MS;
            frames += 1;
            for event in session.frame(t) {
                if let GameEvent::Crashed(cause) = event {
                    log::info!("Run {} crashed: {:?}", run, cause);
                }
            }
            if session.phase() == GamePhase::GameOver {
                break;
            }
        }
        println!(
            "Run {}: {} pipes in {:.1}s (best {})",
            run,
            session.score(),
            frames as f64 * REFERENCE_FRAME_MS / 1000.0,
            session.high_score()
        );

        // Back to Idle; the autopilot starts the next run on the following frame
        session.request_restart();
        t += REFERENCE_FRAME_MS;
        session.frame(t);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
