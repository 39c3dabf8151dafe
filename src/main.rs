//! Built to Scale entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent};

    use built_to_scale::consts::*;
    use built_to_scale::render::{Fill, RenderSink, draw_frame};
    use built_to_scale::sim::{GameEvent, GameState, InputState, LevelRegistry, tick};
    use built_to_scale::Settings;

    /// Canvas 2D implementation of the render sink
    struct CanvasSink {
        ctx: CanvasRenderingContext2d,
        images: HashMap<String, HtmlImageElement>,
    }

    impl CanvasSink {
        fn image(&mut self, src: &str) -> Option<&HtmlImageElement> {
            if !self.images.contains_key(src) {
                let img = HtmlImageElement::new().ok()?;
                img.set_src(src);
                self.images.insert(src.to_string(), img);
            }
            self.images.get(src)
        }
    }

    impl RenderSink for CanvasSink {
        fn clear_frame(&mut self, size: Vec2) {
            let (w, h) = (size.x as f64, size.y as f64);
            self.ctx.clear_rect(0.0, 0.0, w, h);
            self.ctx.set_fill_style_str("black");
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }

        fn draw_body(&mut self, pos: Vec2, size: Vec2, sprite: Option<&str>, fallback: Fill) {
            let ctx = self.ctx.clone();
            if let Some(img) = sprite.and_then(|src| self.image(src)) {
                if img.complete() {
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        pos.x as f64,
                        pos.y as f64,
                        size.x as f64,
                        size.y as f64,
                    );
                    return;
                }
            }
            ctx.set_fill_style_str(fallback.css());
            ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
        }

        fn draw_text(&mut self, text: &str, size: &str, pos: Vec2) {
            self.ctx.set_fill_style_str("white");
            self.ctx.set_font(&format!("{} Arial", size));
            let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        settings: Settings,
        sink: CanvasSink,
    }

    impl Game {
        fn frame(&mut self) {
            let input = self.input.snapshot();
            tick(&mut self.state, &input);
            for event in self.state.drain_events() {
                match event {
                    GameEvent::LevelAdvanced { from, to } => {
                        log::info!("Level {} complete, entering level {}", from + 1, to + 1)
                    }
                    GameEvent::PlayerDied(cause) => log::info!("Died: {:?}", cause),
                    _ => {}
                }
            }
            draw_frame(&self.state, &mut self.sink, self.settings.show_labels);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Built to Scale starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(VIEWPORT_WIDTH as u32);
        canvas.set_height(VIEWPORT_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let settings = Settings::load();
        settings.save();
        let registry = LevelRegistry::builtin(&settings.tuning)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let state = GameState::new(registry, settings.tuning.clone());

        let game = Rc::new(RefCell::new(Game {
            state,
            input: InputState::new(),
            settings,
            sink: CanvasSink {
                ctx,
                images: HashMap::new(),
            },
        }));

        setup_input_handlers(&window, game.clone());
        request_animation_frame(game);

        log::info!("Built to Scale running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(key) = g.settings.bindings.lookup(&event.key()) {
                    g.input.key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            if let Some(key) = g.settings.bindings.lookup(&event.key()) {
                g.input.key_up(key);
            }
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
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
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Built to Scale (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the playable version");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted headless run through the tutorial level
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use built_to_scale::sim::{GameEvent, GameState, InputState, Key, tick};

    /// (tick, key, pressed)
    const SCRIPT: &[(u64, Key, bool)] = &[
        (1, Key::Up, true),
        (40, Key::FireForward, true),
        (41, Key::FireForward, false),
        (60, Key::Right, true),
        (90, Key::Right, false),
        (91, Key::FireBackward, true),
        (92, Key::FireBackward, false),
        (200, Key::Up, false),
        (210, Key::Reset, true),
        (211, Key::Reset, false),
    ];

    pub fn run() {
        let mut state = match GameState::with_builtin_levels() {
            Ok(state) => state,
            Err(e) => {
                log::error!("Built-in levels are invalid: {}", e);
                return;
            }
        };
        let mut input = InputState::new();

        for t in 1..=240u64 {
            for &(_, key, pressed) in SCRIPT.iter().filter(|(at, _, _)| *at == t) {
                if pressed {
                    input.key_down(key);
                } else {
                    input.key_up(key);
                }
            }
            tick(&mut state, &input.snapshot());

            for event in state.drain_events() {
                match event {
                    GameEvent::Enlarged { target, identity } => {
                        log::info!("tick {}: enlarged {:?} {}", t, target, identity)
                    }
                    other => log::info!("tick {}: {:?}", t, other),
                }
            }
        }

        log::info!(
            "Demo finished on {} at {:?}, {} projectile(s) in flight",
            state.level().name,
            state.player.pos,
            state.projectiles.len()
        );
    }
}
