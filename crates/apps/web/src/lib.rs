//! Browser host for the globe scene.
//!
//! JS calls [`mount`] with a canvas id and optional JSON config, and
//! [`unmount`] when the component goes away. Everything else runs off the
//! `requestAnimationFrame` loop and DOM listeners registered through
//! [`DomInputPort`].

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use canvas::FrameRenderer;
use runtime::frame::DeviceClass;
use runtime::input::{InputPort, Viewport};
use runtime::lifecycle::{FrameLoop, TickOutcome};
use scene::{ConfigError, Scene, SceneConfig};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

mod input;
mod surface;

pub use input::DomInputPort;
pub use surface::CanvasSurface;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct Mounted {
    surface: CanvasSurface,
    scene: Scene,
    frame_loop: FrameLoop,
    input: DomInputPort,
    visible: bool,
    frame_callback: FrameCallback,
    pending_frame: Option<i32>,
}

thread_local! {
    static STATE: RefCell<Option<Mounted>> = const { RefCell::new(None) };
}

fn with_mounted<F>(f: F)
where
    F: FnOnce(&mut Mounted),
{
    let _ = STATE.try_with(|state| {
        if let Ok(mut guard) = state.try_borrow_mut() {
            if let Some(mounted) = guard.as_mut() {
                f(mounted);
            }
        }
    });
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Empty or missing input yields the defaults.
fn parse_config(config_json: Option<&str>) -> Result<SceneConfig, ConfigError> {
    match config_json.map(str::trim) {
        None | Some("") => Ok(SceneConfig::default()),
        Some(json) => SceneConfig::from_json(json),
    }
}

/// Maps `Math.random()` output in `[0, 1)` to a scene seed.
fn seed_from_unit(r: f64) -> u64 {
    (r.clamp(0.0, 1.0) * u32::MAX as f64) as u64
}

fn request_frame(callback: &FrameCallback) -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let slot = callback.borrow();
    let closure = slot
        .as_ref()
        .ok_or_else(|| JsValue::from_str("frame callback dropped"))?;
    window.request_animation_frame(closure.as_ref().unchecked_ref())
}

fn document_visible() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .map(|d| !d.hidden())
        .unwrap_or(true)
}

fn on_animation_frame() {
    let visible = document_visible();
    with_mounted(|m| {
        m.pending_frame = None;
        let outcome = m.frame_loop.tick(visible && m.visible);
        if let TickOutcome::Render(frame) = outcome {
            m.scene.update(frame);
            let stats = FrameRenderer::draw(&m.scene, &mut m.surface);
            m.frame_loop.finish_frame(stats.total());
        }
        if outcome.reschedule() {
            match request_frame(&m.frame_callback) {
                Ok(id) => m.pending_frame = Some(id),
                Err(err) => warn!(?err, "requestAnimationFrame failed"),
            }
        }
    });
}

fn attach_listeners(input: &mut DomInputPort) {
    input.on_pointer_move(Box::new(|sample| {
        with_mounted(|m| m.scene.set_pointer(sample));
    }));
    input.on_visibility_change(Box::new(|visible| {
        with_mounted(|m| m.visible = visible);
        debug!(visible, "visibility changed");
    }));
    input.on_resize(Box::new(|_| {
        with_mounted(resize_mounted);
    }));
}

fn resize_mounted(m: &mut Mounted) {
    let pixel_ratio = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0);
    let viewport = m.surface.fit(pixel_ratio);
    apply_resize(m, viewport);
}

fn apply_resize(m: &mut Mounted, viewport: Viewport) {
    m.scene.resize(viewport);
    m.frame_loop
        .notify_resize(viewport.width, viewport.height, m.scene.time_step());
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    Ok(())
}

/// Starts the visualization on the canvas with id `canvas_id`.
///
/// A scene that is already mounted is torn down first.
#[wasm_bindgen]
pub fn mount(canvas_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    unmount();

    let config = parse_config(config_json.as_deref()).map_err(js_error)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing canvas #{canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let surface = CanvasSurface::new(canvas.clone(), ctx);
    let viewport = surface.fit(window.device_pixel_ratio());
    let seed = seed_from_unit(js_sys::Math::random());
    let scene = Scene::new(config, viewport, seed).map_err(js_error)?;
    let mut frame_loop = FrameLoop::new(scene.time_step());
    frame_loop.mount().map_err(js_error)?;

    let mut input = DomInputPort::new(window, document, canvas);
    attach_listeners(&mut input);

    let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
    *frame_callback.borrow_mut() = Some(Closure::new(on_animation_frame));
    let pending_frame = Some(request_frame(&frame_callback)?);

    info!(
        canvas_id,
        seed,
        desktop = scene.device() == DeviceClass::Desktop,
        "globe mounted"
    );

    STATE.with(|state| {
        *state.borrow_mut() = Some(Mounted {
            surface,
            scene,
            frame_loop,
            input,
            visible: document_visible(),
            frame_callback,
            pending_frame,
        });
    });
    Ok(())
}

/// Cancels the pending frame and removes every listener. Safe to call when
/// nothing is mounted.
#[wasm_bindgen]
pub fn unmount() {
    let Some(mut m) = STATE.try_with(|state| state.borrow_mut().take()).ok().flatten() else {
        return;
    };
    if m.frame_loop.unmount() {
        if let (Some(id), Some(window)) = (m.pending_frame.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
    }
    m.input.detach_all();
    m.frame_callback.borrow_mut().take();
    info!(
        canvas = %m.surface.canvas().id(),
        frames = m.frame_loop.metrics().frames_rendered,
        "globe unmounted"
    );
}

/// Loop counters as JSON, for debugging overlays.
#[wasm_bindgen]
pub fn loop_metrics() -> Result<String, JsValue> {
    let mut out = Ok(String::from("null"));
    with_mounted(|m| out = serde_json::to_string(m.frame_loop.metrics()).map_err(js_error));
    out
}

#[cfg(test)]
mod tests {
    use super::{parse_config, seed_from_unit};
    use pretty_assertions::assert_eq;
    use scene::{ConfigError, SceneConfig};

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(parse_config(None).unwrap(), SceneConfig::default());
        assert_eq!(parse_config(Some("  ")).unwrap(), SceneConfig::default());
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config = parse_config(Some(r#"{"mesh_depth": 2}"#)).unwrap();
        assert_eq!(config.mesh_depth, 2);
        assert_eq!(config.damping, SceneConfig::default().damping);
    }

    #[test]
    fn bad_config_is_rejected() {
        assert!(matches!(
            parse_config(Some("{not json")),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn seed_stays_in_range() {
        assert_eq!(seed_from_unit(0.0), 0);
        assert_eq!(seed_from_unit(1.0), u32::MAX as u64);
        assert_eq!(seed_from_unit(-0.5), 0);
        assert_eq!(seed_from_unit(f64::NAN), 0);
    }
}
