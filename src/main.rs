//! Splash entry point
//!
//! Handles platform-specific initialization and wires the browser shell.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlCanvasElement, HtmlElement, MouseEvent, PageTransitionEvent,
        TouchEvent,
    };

    use splash::config::Config;
    use splash::consts::AGENT_MARKER_CLASS;
    use splash::platform::{FrameLoop, Timeout};
    use splash::renderer::{ClientRect, RippleEffect, RippleGpu, RippleSink};
    use splash::sim::{
        Agent, ClickOutcome, Feedback, FeedbackKind, GamePhase, GameSession, RespawnTicket,
        spawn_school,
    };

    const FISH_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M6.5 12c.94-3.46 4.94-6 8.5-6 3.56 0 6.06 2.54 7 6-.94 3.47-3.44 6-7 6s-7.56-2.53-8.5-6Z"/><path d="M18 12v.5"/><path d="M16 17.93a9.77 9.77 0 0 1 0-11.86"/><path d="M7 10.67C7 8 5.58 5.97 2.73 5.5c-1 1.5-1 5 .23 6.5-1.24 1.5-1.24 5-.23 6.5C5.58 18.03 7 16 7 13.33"/><path d="M10.46 7.26C10.2 5.88 9.17 4.24 8 3h5.8a2 2 0 0 1 1.98 1.67l.23 1.4"/><path d="m16.01 17.93-.23 1.4A2 2 0 0 1 13.8 21H9.5a5.4 5.4 0 0 0 1.5-4"/></svg>"#;

    /// One fish on screen: simulation, DOM element and its own frame loop
    struct FishView {
        agent: Agent,
        element: HtmlElement,
        frame: Option<FrameLoop>,
    }

    impl FishView {
        fn show(&mut self) {
            let style = self.element.style();
            let _ = style.set_property("color", self.agent.color());
            let _ = style.set_property("display", "block");
            if let Some(pose) = self.agent.pose() {
                let _ = style.set_property("transform", &pose.css_transform());
            }
        }

        fn hide(&mut self) {
            if let Some(frame) = self.frame.take() {
                frame.cancel();
            }
            let _ = self.element.style().set_property("display", "none");
        }

        /// Give this fish its own animation loop
        fn swim(fish: &Rc<RefCell<FishView>>) {
            let weak = Rc::downgrade(fish);
            let frame = FrameLoop::start(move |_time, dt| {
                let Some(fish) = weak.upgrade() else { return };
                let mut view = fish.borrow_mut();
                if let Some((pose, _)) = view.agent.tick(dt) {
                    let _ = view
                        .element
                        .style()
                        .set_property("transform", &pose.css_transform());
                }
            });
            fish.borrow_mut().frame = Some(frame);
        }
    }

    /// Game instance holding all state
    struct Game {
        config: Config,
        session: GameSession,
        fish: Vec<Rc<RefCell<FishView>>>,
        respawns: Vec<Timeout>,
        feedback_timers: Vec<Timeout>,
        ripples: RippleSink,
        document: Document,
    }

    impl Game {
        fn new(config: Config, ripples: RippleSink, document: Document) -> Self {
            Self {
                session: GameSession::new(config.game.clone()),
                config,
                fish: Vec::new(),
                respawns: Vec::new(),
                feedback_timers: Vec::new(),
                ripples,
                document,
            }
        }

        /// Remove every fish and forget pending respawns
        fn clear_school(&mut self) {
            for timeout in &mut self.respawns {
                timeout.cancel();
            }
            self.respawns.clear();

            for fish in self.fish.drain(..) {
                let mut view = fish.borrow_mut();
                view.hide();
                view.element.remove();
            }
        }

        fn show_feedback(&mut self, feedback: Feedback) {
            let Ok(el) = self.document.create_element("div") else {
                return;
            };
            let (class, text) = match feedback.kind {
                FeedbackKind::Hit => ("feedback hit", "+1"),
                FeedbackKind::Miss => ("feedback miss", "\u{1F494}"),
            };
            let _ = el.set_attribute("class", class);
            let _ = el.set_attribute(
                "style",
                &format!("left: {}px; top: {}px", feedback.x, feedback.y),
            );
            el.set_text_content(Some(text));
            if let Some(body) = self.document.body() {
                let _ = body.append_child(&el);
            }

            self.feedback_timers.retain(Timeout::is_pending);
            if let Some(timer) = Timeout::schedule(feedback.lifetime_ms, move || el.remove()) {
                self.feedback_timers.push(timer);
            }
        }

        /// Update HUD and overlays in DOM
        fn update_hud(&self) {
            let document = &self.document;
            let phase = self.session.phase();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.session.score().to_string()));
            }
            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                let hearts = "\u{2764}\u{FE0F}".repeat(self.session.lives() as usize);
                el.set_text_content(Some(&hearts));
            }
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&self.session.score().to_string()));
            }

            set_hidden(document, "start-screen", phase != GamePhase::Ready);
            set_hidden(document, "hud", phase != GamePhase::Playing);
            set_hidden(document, "game-over", phase != GamePhase::GameOver);
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn viewport_width() -> f32 {
        web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(1024.0) as f32
    }

    /// Device-pixel size of the canvas's CSS box
    fn canvas_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    /// Match the drawing buffer to what the effect actually renders at
    fn sync_canvas(canvas: &HtmlCanvasElement, effect: &RippleEffect<RippleGpu>) {
        let (width, height) = effect.size();
        canvas.set_width(width);
        canvas.set_height(height);
    }

    async fn create_ripple_gpu(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<RippleGpu, splash::renderer::RippleError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RippleGpu::new(surface, &adapter, width, height).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Splash starting...");

        let Some(window) = web_sys::window() else {
            log::error!("no window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };

        let config = Config::load();

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("no canvas");
            return;
        };

        // Ripple background; a failed GPU setup only loses the effect
        let (width, height) = canvas_size(&canvas);
        let backend = match create_ripple_gpu(&canvas, width, height).await {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                log::error!("Ripple background disabled: {e}");
                None
            }
        };
        let effect = Rc::new(RefCell::new(RippleEffect::new(
            backend,
            width,
            height,
            &config.ripple,
        )));
        sync_canvas(&canvas, &effect.borrow());

        let ripple_sink = {
            let canvas = canvas.clone();
            effect.borrow().sink(move || {
                let rect = canvas.get_bounding_client_rect();
                Some(ClientRect {
                    left: rect.left(),
                    top: rect.top(),
                    width: rect.width(),
                    height: rect.height(),
                })
            })
        };

        let ripple_frame = {
            let effect = effect.clone();
            FrameLoop::start(move |_time, _dt| {
                effect.borrow_mut().render_frame();
            })
        };

        let game = Rc::new(RefCell::new(Game::new(config, ripple_sink.clone(), document.clone())));
        game.borrow().update_hud();

        setup_pointer_handlers(game.clone(), ripple_sink);
        setup_resize(&canvas, effect.clone());
        setup_buttons(game.clone());
        setup_teardown(effect, ripple_frame);

        log::info!("Splash running!");
    }

    fn setup_pointer_handlers(game: Rc<RefCell<Game>>, ripples: RippleSink) {
        let Some(window) = web_sys::window() else { return };

        // Clicks anywhere: ripple, then miss detection
        {
            let ripples = ripples.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let (x, y) = (event.client_x() as f64, event.client_y() as f64);
                ripples.publish(x, y);

                let on_agent = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(&format!(".{AGENT_MARKER_CLASS}")).ok().flatten())
                    .is_some();

                let mut g = game.borrow_mut();
                match g.session.global_click(on_agent, x, y) {
                    ClickOutcome::Miss { feedback, lives } => {
                        log::debug!("Miss, {lives} lives left");
                        g.show_feedback(feedback);
                    }
                    ClickOutcome::GameOver { feedback } => {
                        g.show_feedback(feedback);
                        g.clear_school();
                    }
                    ClickOutcome::Ignored | ClickOutcome::Suppressed | ClickOutcome::OnAgent => {}
                }
                g.update_hud();
            });
            let _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: ripple only (the synthesized click handles scoring)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let point = event
                    .touches()
                    .get(0)
                    .map(|t| (t.client_x() as f64, t.client_y() as f64));
                ripples.publish_pointer(point);
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(true);
            let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, effect: Rc<RefCell<RippleEffect<RippleGpu>>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = canvas_size(&canvas);
            let mut effect = effect.borrow_mut();
            effect.resize(w, h);
            sync_canvas(&canvas, &effect);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_teardown(effect: Rc<RefCell<RippleEffect<RippleGpu>>>, frame: FrameLoop) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            // A page going into the back/forward cache comes back with this effect
            if event.persisted() {
                return;
            }
            frame.cancel();
            effect.borrow_mut().teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                start_game(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.clear_school();
                g.session.restart();
                g.update_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn start_game(game: &Rc<RefCell<Game>>) {
        let seed = js_sys::Date::now() as u64;
        let school = {
            let mut g = game.borrow_mut();
            if g.session.phase() != GamePhase::Ready {
                return;
            }
            g.session.start();
            g.update_hud();
            spawn_school(&g.config.fish, g.session.fish_count(), viewport_width(), seed)
        };
        log::info!("Spawning {} fish with seed {}", school.len(), seed);

        for agent in school {
            if let Some(fish) = mount_fish(game, agent) {
                FishView::swim(&fish);
                game.borrow_mut().fish.push(fish);
            }
        }
    }

    /// Create the fish's DOM element and hook up its click handler
    fn mount_fish(game: &Rc<RefCell<Game>>, agent: Agent) -> Option<Rc<RefCell<FishView>>> {
        let document = game.borrow().document.clone();
        let element: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
        let _ = element.set_attribute("class", &format!("fish {AGENT_MARKER_CLASS}"));
        element.set_inner_html(FISH_SVG);
        document
            .get_element_by_id("field")
            .or_else(|| document.body().map(Into::into))?
            .append_child(&element)
            .ok()?;

        let fish = Rc::new(RefCell::new(FishView {
            agent,
            element: element.clone(),
            frame: None,
        }));
        fish.borrow_mut().show();

        let game_weak = Rc::downgrade(game);
        let fish_weak = Rc::downgrade(&fish);
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            // Keep the page-level miss detector out of it
            event.stop_propagation();
            if let (Some(game), Some(fish)) = (game_weak.upgrade(), fish_weak.upgrade()) {
                catch_fish(&game, &fish, &event);
            }
        });
        let _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();

        Some(fish)
    }

    fn catch_fish(game: &Rc<RefCell<Game>>, fish: &Rc<RefCell<FishView>>, event: &MouseEvent) {
        let ticket = {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            let session_id = g.session.id();
            let mut view = fish.borrow_mut();

            let mut feedback = None;
            let ticket = view.agent.on_click(event, session_id, |e| {
                let (x, y) = (e.client_x() as f64, e.client_y() as f64);
                feedback = g.session.score_hit(x, y);
                if feedback.is_some() {
                    g.ripples.publish(x, y);
                }
            });
            if ticket.is_some() {
                view.hide();
            }
            drop(view);

            if let Some(feedback) = feedback {
                g.show_feedback(feedback);
            }
            g.update_hud();
            ticket
        };

        if let Some(ticket) = ticket {
            schedule_respawn(game, fish, ticket);
        }
    }

    fn schedule_respawn(game: &Rc<RefCell<Game>>, fish: &Rc<RefCell<FishView>>, ticket: RespawnTicket) {
        let game_weak: Weak<RefCell<Game>> = Rc::downgrade(game);
        let fish_weak = Rc::downgrade(fish);

        let timeout = Timeout::schedule(ticket.delay_ms, move || {
            let (Some(game), Some(fish)) = (game_weak.upgrade(), fish_weak.upgrade()) else {
                return;
            };
            let current = game.borrow().session.id();
            let respawned = {
                let mut view = fish.borrow_mut();
                let respawned = view.agent.respawn(ticket, current);
                if respawned {
                    view.show();
                }
                respawned
            };
            if respawned {
                FishView::swim(&fish);
            }
        });

        let mut g = game.borrow_mut();
        g.respawns.retain(Timeout::is_pending);
        if let Some(timeout) = timeout {
            g.respawns.push(timeout);
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
    log::info!("Splash (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Swim a school for a few simulated seconds, catch one fish and print where
/// everyone ended up
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use splash::Config;
    use splash::renderer::{ClientRect, RippleEffect, RippleGpu};
    use splash::sim::{GameSession, spawn_school};

    let config = Config::load();
    let mut session = GameSession::new(config.game.clone());
    session.start();

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut school = spawn_school(&config.fish, session.fish_count(), 1280.0, seed);

    let effect = RippleEffect::<RippleGpu>::new(None, 1280, 720, &config.ripple);
    let ripples = effect.sink(|| {
        Some(ClientRect {
            left: 0.0,
            top: 0.0,
            width: 1280.0,
            height: 720.0,
        })
    });

    let mut bounces = 0;
    for _ in 0..600 {
        for fish in &mut school {
            if let Some((_, outcome)) = fish.tick(1.0 / 60.0) {
                bounces += outcome.bounce.any() as u32;
            }
        }
    }
    log::info!("Simulated 10s, {bounces} wall bounces");

    if let Some(fish) = school.first_mut() {
        let pos = fish.motion().position;
        let (x, y) = (pos.x as f64 * 12.8, pos.y as f64 * 7.2);
        let ticket = fish.on_click(&(x, y), session.id(), |&(x, y)| {
            session.score_hit(x, y);
            ripples.publish(x, y);
        });
        if let Some(ticket) = ticket {
            fish.respawn(ticket, session.id());
        }
    }
    log::info!(
        "Score {}, live ripples {}",
        session.score(),
        effect.uniforms(0.0).ripple_count
    );

    let states: Vec<_> = school.iter().map(|f| f.motion()).collect();
    match serde_json::to_string_pretty(&states) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize school: {e}"),
    }
}
