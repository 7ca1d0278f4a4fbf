pub mod runner;

pub use runner::GameRunner;

// Re-exported so `export_game!` expands without extra imports in the game crate.
pub use golf_engine;
pub use js_sys;
pub use web_sys;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MinigolfGame;
///
/// golf_web::export_game!(MinigolfGame, "golf-3");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `golf_engine::Game`
///   and has a `new()` constructor
/// - `$game_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Run `f` against the runner, or warn and return `None` before `game_init()`.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => Some(f(runner)),
                None => {
                    $crate::web_sys::console::warn_1(
                        &concat!($game_name, ": not initialized, call game_init() first").into(),
                    );
                    None
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        /// `(ox, oy, oz)` and `(dx, dy, dz)` are the camera ray through the
        /// pointer in world space.
        #[wasm_bindgen]
        #[allow(clippy::too_many_arguments)]
        pub fn game_pointer_down(x: f32, y: f32, ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32) {
            let ray = $crate::golf_engine::PickRay::new(
                $crate::golf_engine::glam::Vec3::new(ox, oy, oz),
                $crate::golf_engine::glam::Vec3::new(dx, dy, dz),
            );
            with_runner(|r| r.push_input($crate::golf_engine::InputEvent::PointerDown { x, y, ray }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::golf_engine::InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::golf_engine::InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input($crate::golf_engine::InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_reset() {
            game_custom_event($crate::golf_engine::CUSTOM_RESET, 0.0, 0.0, 0.0);
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_meshes_ptr() -> *const f32 {
            with_runner(|r| r.meshes_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_mesh_count() -> u32 {
            with_runner(|r| r.mesh_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_mesh_floats() -> u32 {
            with_runner(|r| r.mesh_floats()).unwrap_or(0)
        }

        /// Copy of the mesh buffer, for hosts that do not read wasm memory directly.
        #[wasm_bindgen]
        pub fn get_meshes() -> $crate::js_sys::Float32Array {
            with_runner(|r| $crate::js_sys::Float32Array::from(r.mesh_data()))
                .unwrap_or_else(|| $crate::js_sys::Float32Array::new_with_length(0))
        }

        /// Interpolation factor between the last two fixed steps.
        #[wasm_bindgen]
        pub fn get_render_alpha() -> f32 {
            with_runner(|r| r.alpha()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_scoreboard_json() -> String {
            with_runner(|r| r.scoreboard_json()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_scoreboard_text() -> String {
            with_runner(|r| r.scoreboard_text()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_scoreboard_revision() -> u32 {
            with_runner(|r| r.scoreboard_revision()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn is_halted() -> bool {
            with_runner(|r| r.is_halted()).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn get_halt_reason() -> Option<String> {
            with_runner(|r| r.halt_reason().map(str::to_string)).flatten()
        }
    };
}
