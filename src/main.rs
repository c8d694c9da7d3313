//! Symbiote Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use symbiote_rush::QualityPreset;
    use symbiote_rush::audio::WebAudio;
    use symbiote_rush::persistence::{LocalStorage, NoStorage, Persistence};
    use symbiote_rush::platform::FrameInput;
    use symbiote_rush::renderer::{Renderer, WebCanvas};
    use symbiote_rush::sim::Director;

    /// Game instance: the director plus the input gathered between frames
    struct Game {
        director: Director<WebCanvas>,
        input: FrameInput,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            self.director.frame(time, &self.input);
            self.input.consume_edges();
        }

        /// Jump press from any source; on the game-over card it restarts
        fn press_jump(&mut self) {
            if self.director.is_game_over() {
                self.director.restart();
                log::info!("Run restarted");
                return;
            }
            self.input.jump_pressed = true;
            self.input.jump_held = true;
        }

        fn release_jump(&mut self) {
            self.input.jump_held = false;
        }
    }

    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    fn open_storage() -> Box<dyn Persistence> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(err) => {
                log::warn!("localStorage unavailable, scores will not persist: {err}");
                Box::new(NoStorage)
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Symbiote Rush starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = match WebCanvas::new(canvas.clone()) {
            Ok(ctx) => ctx,
            Err(err) => {
                log::error!("Canvas 2D unavailable: {err}");
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let mut renderer = Renderer::new(ctx, QualityPreset::High);
        renderer.resize(width, height);
        let director = Director::new(renderer, seed)
            .with_audio(Box::new(WebAudio::new()))
            .with_persistence(open_storage());

        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            director,
            input: FrameInput::default(),
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_resize_handler(canvas, game.clone());
        request_animation_frame(game);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Keyboard: space/up jump, down ducks
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" | "ArrowUp" | "KeyW" => {
                        event.prevent_default();
                        if !event.repeat() {
                            g.press_jump();
                        }
                    }
                    "ArrowDown" | "KeyS" => {
                        event.prevent_default();
                        g.input.duck_held = true;
                    }
                    _ => {}
                }
            });
            let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" | "ArrowUp" | "KeyW" => g.release_jump(),
                    "ArrowDown" | "KeyS" => g.input.duck_held = false,
                    _ => {}
                }
            });
            let _ = document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().press_jump();
            });
            let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().release_jump();
            });
            let _ = document.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().press_jump();
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().release_jump();
            });
            let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.director.is_game_over() {
                    g.director.restart();
                    log::info!("Run restarted from button");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let (width, height) = canvas_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            game.borrow_mut().director.resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
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

/// Scripted headless session: start, hop a few times, report what was drawn
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use symbiote_rush::QualityPreset;
    use symbiote_rush::persistence::MemoryStorage;
    use symbiote_rush::platform::FrameInput;
    use symbiote_rush::renderer::{RecordingCanvas, Renderer};
    use symbiote_rush::sim::Director;

    env_logger::init();
    log::info!("Symbiote Rush (native) starting...");
    log::info!("Native mode renders headless - build for wasm32 to play in a browser");

    let mut renderer = Renderer::new(RecordingCanvas::new(1200, 800), QualityPreset::Medium);
    renderer.resize(1200, 800);
    let mut director = Director::new(renderer, 7).with_persistence(Box::new(MemoryStorage::with_consent(true)));

    let frames = 60 * 30;
    let mut ts = 0.0;
    for i in 0..frames {
        let input = FrameInput {
            jump_pressed: i % 45 == 0,
            jump_held: i % 45 < 10,
            duck_held: false,
        };
        director.frame(ts, &input);
        ts += 1000.0 / 60.0;
        if director.is_game_over() {
            log::info!(
                "Run ended at frame {}: {} (score {})",
                i,
                director.death_reason().unwrap_or("unknown"),
                director.score()
            );
            break;
        }
    }

    let stats = director.renderer().ctx().stats();
    log::info!("Score {} / high {}", director.score(), director.high_score());
    log::info!("Draw stats: {:?}", stats);
    println!(
        "score={} high={} frames={} effects={}",
        director.score(),
        director.high_score(),
        director.frame_count(),
        director.effects().total_active()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
