//! Browser entry points for the orrery viewer.
//!
//! One [`ViewerRunner`] lives in a `thread_local!`; every export below borrows it.
//! The host calls `viewer_init` once, then `viewer_tick` per animation frame,
//! polling the JSON outboxes (`take_*`) after each call and reading the frame
//! buffer through `get_frame_ptr`/`get_frame_len`.

pub mod runner;

pub use runner::{CommandRecorder, FetchRequest, HostFetcher, SceneCommand, ViewerRunner};

use std::cell::RefCell;

use orrery_engine::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<ViewerRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. Calls before `viewer_init` are logged and skipped.
fn with_runner<R>(f: impl FnOnce(&mut ViewerRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("Viewer not initialized. Call viewer_init() first.");
                None
            }
        }
    })
}

fn to_js_error(e: orrery_engine::OrreryError) -> JsValue {
    log::error!("viewer_init failed: {}", e);
    js_sys::Error::new(&e.to_string()).into()
}

/// Create the viewer and compose the scene.
/// Both arguments are JSON; empty strings select the built-in defaults.
#[wasm_bindgen]
pub fn viewer_init(config_json: &str, manifest_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let mut runner = ViewerRunner::new(config_json, manifest_json).map_err(to_js_error)?;
    runner.init().map_err(to_js_error)?;

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("orrery: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn viewer_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Input ----

#[wasm_bindgen]
pub fn viewer_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn viewer_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn viewer_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn viewer_wheel(delta_y: f32) {
    with_runner(|r| r.push_input(InputEvent::Wheel { delta_y }));
}

#[wasm_bindgen]
pub fn viewer_resize(width: f32, height: f32) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

// ---- Navigation ----

/// Returns false when the body is unknown.
#[wasm_bindgen]
pub fn viewer_focus(name: &str) -> bool {
    with_runner(|r| r.focus(name)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn viewer_stop_tracking() {
    with_runner(|r| r.stop_tracking());
}

#[wasm_bindgen]
pub fn viewer_apply_preset(name: &str) -> bool {
    with_runner(|r| r.apply_preset(name)).unwrap_or(false)
}

// ---- Texture callbacks ----

#[wasm_bindgen]
pub fn texture_loaded(request: u32, attempt: u32, bytes: &[u8]) -> bool {
    with_runner(|r| r.texture_loaded(request, attempt, bytes)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn texture_pixels_loaded(request: u32, attempt: u32, width: u32, height: u32, rgba: Vec<u8>) -> bool {
    with_runner(|r| r.texture_pixels_loaded(request, attempt, width, height, rgba)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn texture_failed(request: u32, attempt: u32, message: &str) -> bool {
    with_runner(|r| r.texture_failed(request, attempt, message)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn texture_progress(request: u32, attempt: u32, loaded: f64, total: f64) {
    with_runner(|r| r.texture_progress(request, attempt, loaded, total));
}

// ---- Outboxes ----

#[wasm_bindgen]
pub fn take_fetch_requests() -> String {
    with_runner(|r| r.take_fetch_requests()).unwrap_or_else(|| "[]".to_string())
}

#[wasm_bindgen]
pub fn take_fetch_cancellations() -> String {
    with_runner(|r| r.take_fetch_cancellations()).unwrap_or_else(|| "[]".to_string())
}

#[wasm_bindgen]
pub fn take_scene_commands() -> String {
    with_runner(|r| r.take_scene_commands()).unwrap_or_else(|| "[]".to_string())
}

#[wasm_bindgen]
pub fn take_notices() -> String {
    with_runner(|r| r.take_notices()).unwrap_or_else(|| "[]".to_string())
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    with_runner(|r| r.frame_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_frame_len() -> u32 {
    with_runner(|r| r.frame_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_texture_pixels_ptr(node: u32) -> *const u8 {
    with_runner(|r| r.texture_pixels_ptr(node)).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_texture_pixels_len(node: u32) -> u32 {
    with_runner(|r| r.texture_pixels_len(node)).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_texture_width(node: u32) -> u32 {
    with_runner(|r| r.texture_width(node)).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_texture_height(node: u32) -> u32 {
    with_runner(|r| r.texture_height(node)).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_load_percent() -> u32 {
    with_runner(|r| r.load_percent()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn is_ready() -> bool {
    with_runner(|r| r.is_ready()).unwrap_or(false)
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_instances() -> u32 {
    with_runner(|r| r.max_instances()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_instance_data_offset() -> u32 {
    with_runner(|r| r.instance_data_offset()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_event_data_offset() -> u32 {
    with_runner(|r| r.event_data_offset()).unwrap_or(0)
}
