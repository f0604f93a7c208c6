//! Pump Pop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::closure::WasmClosure;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use pump_pop::assets::AssetCache;
    use pump_pop::consts::*;
    use pump_pop::input::{InputManager, PointerEvent};
    use pump_pop::persistence::{NullStorage, Storage};
    use pump_pop::platform::web::{DomReadout, LocalStorage, load_assets};
    use pump_pop::platform::{HudState, ReadoutSync};
    use pump_pop::renderer::{RenderState, paint};
    use pump_pop::sim::Game;
    use pump_pop::{Bounds, Tuning};

    /// Everything the page drives
    struct App {
        game: Game,
        input: InputManager,
        render_state: Option<RenderState>,
        assets: AssetCache,
        hud: ReadoutSync<DomReadout>,
        instructions_visible: bool,
        accumulator: f32,
        last_time: f64,
    }

    impl App {
        /// Run fixed simulation steps for one frame
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.game.update(time);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            // Drop the backlog instead of spiralling
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT);
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let list = paint(&self.game, &self.assets, time);
            let viewport = self.game.bounds();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&list, viewport) {
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

        fn update_hud(&mut self) {
            self.hud.sync(HudState {
                score: self.game.score(),
                high_score: self.game.high_score(),
                loading_visible: !self.game.assets_ready(),
                instructions_visible: self.instructions_visible,
            });
        }

        fn pointer(&mut self, event: PointerEvent) {
            if let Some(outcome) = self.input.handle(&mut self.game, event) {
                log::debug!("Click: {:?}", outcome);
            }
        }
    }

    fn open_storage() -> Box<dyn Storage> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({e}); records will not persist");
                Box::new(NullStorage)
            }
        }
    }

    /// Size the backing store to the CSS size times the pixel ratio
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (Bounds, u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = ((client_w as f64 * dpr) as u32).max(1);
        let height = ((client_h as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (Bounds::new(client_w as f32, client_h as f32), width, height)
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map_or_else(js_sys::Date::now, |p| p.now())
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pump Pop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (bounds, width, height) = fit_canvas(&canvas);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, bounds, Tuning::default(), open_storage(), now());

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .expect("Failed to create renderer");

        let app = Rc::new(RefCell::new(App {
            game,
            input: InputManager::new(),
            render_state: Some(render_state),
            assets: AssetCache::new(),
            hud: ReadoutSync::new(DomReadout::new(document.clone())),
            instructions_visible: false,
            accumulator: 0.0,
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_resize_handler(&canvas, app.clone());
        setup_instructions(app.clone());
        start_asset_load(app.clone());

        request_animation_frame(app);

        log::info!("Pump Pop running!");
    }

    /// Canvas-relative position of the first touch point
    fn touch_position(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        let x = touch.client_x() as f32 - rect.left() as f32;
        let y = touch.client_y() as f32 - rect.top() as f32;
        Some((x, y))
    }

    /// Attach `closure` for the page's lifetime
    fn listen<T: ?Sized + WasmClosure>(target: &web_sys::EventTarget, kind: &str, closure: Closure<T>) {
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse
        {
            let app = app.clone();
            listen(canvas, "mousedown", Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().pointer(PointerEvent::Start {
                    x: event.offset_x() as f32,
                    y: event.offset_y() as f32,
                });
            }));
        }
        {
            let app = app.clone();
            listen(canvas, "mousemove", Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().pointer(PointerEvent::Move {
                    x: event.offset_x() as f32,
                    y: event.offset_y() as f32,
                });
            }));
        }
        for kind in ["mouseup", "mouseleave"] {
            let app = app.clone();
            listen(canvas, kind, Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().pointer(PointerEvent::End);
            }));
        }

        // Touch; default handling is suppressed so the page never scrolls
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            listen(canvas, "touchstart", Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_position(&canvas_clone, &event) {
                    app.borrow_mut().pointer(PointerEvent::Start { x, y });
                }
            }));
        }
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            listen(canvas, "touchmove", Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_position(&canvas_clone, &event) {
                    app.borrow_mut().pointer(PointerEvent::Move { x, y });
                }
            }));
        }
        for kind in ["touchend", "touchcancel"] {
            let app = app.clone();
            listen(canvas, kind, Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().pointer(PointerEvent::End);
            }));
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        listen(&window, "resize", Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (bounds, width, height) = fit_canvas(&canvas);
            let mut a = app.borrow_mut();
            if let Some(ref mut render_state) = a.render_state {
                render_state.resize(width, height);
            }
            a.game.resize(bounds);
            log::debug!("Resized to {}x{}", bounds.width, bounds.height);
        }));
    }

    /// The instruction modal's close button
    fn setup_instructions(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document
            .query_selector("#instructionModal button")
            .ok()
            .flatten()
        {
            listen(&btn, "click", Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().instructions_visible = false;
            }));
        }
    }

    /// Load the image batch in the background, then hand it to the game
    fn start_asset_load(app: Rc<RefCell<App>>) {
        wasm_bindgen_futures::spawn_local(async move {
            let mut cache = AssetCache::new();
            let images = load_assets(&mut cache).await;

            let mut a = app.borrow_mut();
            if let Some(ref mut render_state) = a.render_state {
                for image in &images {
                    render_state.upload_image(image);
                }
            }
            a.game.on_assets_loaded(&cache);
            a.assets = cache;
            a.instructions_visible = true;
        });
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            a.render(time);
            a.update_hud();
        }

        request_animation_frame(app);
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
    log::info!("Pump Pop (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Auto-pump for a simulated minute, popping whatever flies
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use pump_pop::assets::AssetCache;
    use pump_pop::consts::SIM_DT;
    use pump_pop::persistence::MemoryStorage;
    use pump_pop::platform::{HudState, LogReadout, ReadoutSync};
    use pump_pop::renderer::paint;
    use pump_pop::sim::{ClickOutcome, Game};
    use pump_pop::{Bounds, Tuning};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64);
    let bounds = Bounds::default();
    let mut game = Game::new(
        seed,
        bounds,
        Tuning::default(),
        Box::new(MemoryStorage::new()),
        0.0,
    );
    let assets = AssetCache::new();
    let mut hud = ReadoutSync::new(LogReadout);

    let auto = game.pump().auto_button_rect().center();
    game.handle_click(auto.x, auto.y);

    let step_ms = SIM_DT as f64 * 1000.0;
    for step in 0..3600u32 {
        let now = step as f64 * step_ms;
        game.update(now);

        if step % 30 == 0 {
            let target = game
                .balloons()
                .iter()
                .rev()
                .find(|b| b.is_flying() && b.pos.y < bounds.height * 0.6)
                .map(|b| b.pos);
            let outcome = target.map(|pos| game.handle_click(pos.x, pos.y));
            if outcome == Some(ClickOutcome::GameOver) {
                log::info!("Clicked a bird at step {step}");
                break;
            }
        }

        hud.sync(HudState {
            score: game.score(),
            high_score: game.high_score(),
            loading_visible: false,
            instructions_visible: false,
        });
    }

    let frame = paint(&game, &assets, game.now_ms());
    log::info!(
        "Final frame: {} vertices in {} batches",
        frame.vertices().len(),
        frame.batches().len()
    );
    println!("Final score: {} (best {})", game.score(), game.high_score());
}
