//! Egg Patrol entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use egg_patrol::consts::*;
    use egg_patrol::renderer::RenderState;
    use egg_patrol::sim::{GameState, TickInput, tick};
    use egg_patrol::{HudLines, Tuning};

    /// Keys currently held down
    #[derive(Debug, Default)]
    struct HeldKeys {
        left: bool,
        right: bool,
        up: bool,
        down: bool,
        fire: bool,
    }

    impl HeldKeys {
        fn axis(&self) -> Vec2 {
            let x = (self.right as i32 - self.left as i32) as f32;
            let y = (self.up as i32 - self.down as i32) as f32;
            Vec2::new(x, y)
        }

        /// Returns false for keys that are not movement/fire keys
        fn set(&mut self, key: &str, down: bool) -> bool {
            match key {
                "a" | "A" | "ArrowLeft" => self.left = down,
                "d" | "D" | "ArrowRight" => self.right = down,
                "w" | "W" | "ArrowUp" => self.up = down,
                "s" | "S" | "ArrowDown" => self.down = down,
                " " => self.fire = down,
                _ => return false,
            }
            true
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        keys: HeldKeys,
        /// Canvas size in CSS pixels
        canvas_size: Vec2,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed, Tuning::default()),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                keys: HeldKeys::default(),
                canvas_size: Vec2::ONE,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Convert a pointer position on the canvas to world coordinates
        fn pointer_to_world(&self, x: f32, y: f32) -> Vec2 {
            RenderState::main_camera(&self.state).screen_to_world(Vec2::new(x, y), self.canvas_size)
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.input.move_axis = self.keys.axis();
                self.input.fire = self.keys.fire;
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.toggle_control = false;
                self.input.toggle_pause = false;
                self.input.toggle_waypoints = false;
                self.input.toggle_enemy_mode = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state) {
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
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = HudLines::from_state(&self.state);

            let text_fields = [
                ("hud-hero-mode", hud.hero_mode.as_str()),
                ("hud-eggs", hud.egg_count.as_str()),
                ("hud-enemies", hud.enemy_count.as_str()),
                ("hud-destroyed", hud.enemies_destroyed.as_str()),
                ("hud-enemy-mode", hud.enemy_mode.as_str()),
                ("hud-waypoints", hud.waypoints.as_str()),
                ("hud-cooldown", hud.egg_cooldown.as_str()),
            ];
            for (id, text) in text_fields {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                el.set_text_content(Some(&format!("FPS: {}", self.fps)));
            }

            // Show/hide pause menu
            if let Some(el) = document.get_element_by_id("pause-menu") {
                let _ = el.set_attribute("class", if hud.paused { "" } else { "hidden" });
            }

            // Focus camera label over the inset
            if let Some(el) = document.get_element_by_id("focus-label") {
                match &hud.focus_label {
                    Some(label) => {
                        el.set_text_content(Some(label));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Egg Patrol starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No #canvas element found");
                return;
            }
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut().canvas_size = Vec2::new(client_w as f32, client_h as f32);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {e}");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {e}");
                return;
            }
        }

        setup_input_handlers(&window, &canvas, game.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Egg Patrol running!");
    }

    fn setup_input_handlers(window: &web_sys::Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - pointer target for mouse control
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.canvas_size = Vec2::new(
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                let world = g.pointer_to_world(event.offset_x() as f32, event.offset_y() as f32);
                g.input.pointer = Some(world);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key down - held keys and one-shot toggles
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.keys.set(&key, true) {
                    event.prevent_default();
                    return;
                }
                if event.repeat() {
                    return;
                }
                match key.as_str() {
                    "m" | "M" => g.input.toggle_control = true,
                    "q" | "Q" => g.input.toggle_pause = true,
                    "h" | "H" => g.input.toggle_waypoints = true,
                    "j" | "J" => g.input.toggle_enemy_mode = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up - release held keys
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.set(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside) - drop held keys and pause
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys = HeldKeys::default();
                if !g.state.paused {
                    g.input.toggle_pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Egg Patrol (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{path}: {e}");
                return std::process::ExitCode::FAILURE;
            }
        },
        None => egg_patrol::Tuning::default(),
    };

    headless_demo(tuning);
    std::process::ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<egg_patrol::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(egg_patrol::Tuning::from_json(&json)?)
}

/// Thirty seconds of scripted play: strafe while firing, flip patrol modes
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(tuning: egg_patrol::Tuning) {
    use egg_patrol::consts::SIM_DT;
    use egg_patrol::sim::{GameEvent, GameState, TickInput, tick};
    use glam::Vec2;

    const SECONDS: u32 = 30;
    let ticks_per_second = (1.0 / SIM_DT).round() as u32;

    let mut state = GameState::new(0xE66, tuning);
    let mut captures = 0;
    let mut eggs_fired = 0;

    for n in 0..SECONDS * ticks_per_second {
        let t = n as f32 * SIM_DT;
        let input = TickInput {
            move_axis: Vec2::new((t * 0.7).sin(), (t * 0.4).cos() * 0.5),
            fire: true,
            toggle_enemy_mode: n > 0 && n % (10 * ticks_per_second) == 0,
            toggle_waypoints: n == 20 * ticks_per_second || n == 25 * ticks_per_second,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        for event in &state.events {
            match event {
                GameEvent::WaypointCaptured { .. } => captures += 1,
                GameEvent::EggFired { .. } => eggs_fired += 1,
                _ => {}
            }
        }
    }

    let hud = egg_patrol::HudLines::from_state(&state);
    for line in hud.lines() {
        log::info!("{line}");
    }
    log::info!(
        "Demo finished after {}s: {} eggs fired, {} waypoint captures",
        SECONDS,
        eggs_fired,
        captures
    );
    println!(
        "{} | {} | captures: {}",
        hud.enemies_destroyed, hud.enemy_count, captures
    );
}
