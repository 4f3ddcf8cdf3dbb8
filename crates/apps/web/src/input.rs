use std::collections::BTreeMap;

use runtime::input::{
    InputPort, ListenerId, PointerCallback, PointerSample, ResizeCallback, Viewport,
    VisibilityCallback,
};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

struct DomListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// [`InputPort`] over DOM event listeners.
///
/// Every registration adds one listener; `detach` removes it from its target
/// and drops the closure.
pub struct DomInputPort {
    window: Window,
    document: Document,
    canvas: HtmlCanvasElement,
    next_id: u32,
    listeners: BTreeMap<ListenerId, DomListener>,
}

/// Touch devices get `touchmove` instead of `mousemove`.
fn is_touch_device(window: &Window) -> bool {
    window.navigator().max_touch_points() > 0
        || js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("ontouchstart"))
            .unwrap_or(false)
}

/// Sample in canvas-local CSS pixels. `clientX/Y` are window-relative, so the
/// canvas offset on the page is subtracted.
fn pointer_sample(event: &Event, canvas: &HtmlCanvasElement) -> Option<PointerSample> {
    let client = if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        let touch = touch_event.touches().get(0)?;
        PointerSample::new(touch.client_x() as f64, touch.client_y() as f64)
    } else {
        let mouse = event.dyn_ref::<MouseEvent>()?;
        PointerSample::new(mouse.client_x() as f64, mouse.client_y() as f64)
    };
    let rect = canvas.get_bounding_client_rect();
    Some(client.relative_to(rect.left(), rect.top()))
}

impl DomInputPort {
    pub fn new(window: Window, document: Document, canvas: HtmlCanvasElement) -> Self {
        Self {
            window,
            document,
            canvas,
            next_id: 0,
            listeners: BTreeMap::new(),
        }
    }

    fn listen(
        &mut self,
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    ) -> ListenerId {
        if let Err(err) =
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            warn!(event, ?err, "failed to add event listener");
        }
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.insert(
            id,
            DomListener {
                target,
                event,
                closure,
            },
        );
        debug!(event, id = id.0, "listener attached");
        id
    }

    fn remove(listener: DomListener) {
        let _ = listener.target.remove_event_listener_with_callback(
            listener.event,
            listener.closure.as_ref().unchecked_ref(),
        );
    }
}

impl InputPort for DomInputPort {
    fn on_pointer_move(&mut self, mut callback: PointerCallback) -> ListenerId {
        let event = if is_touch_device(&self.window) {
            "touchmove"
        } else {
            "mousemove"
        };
        let canvas = self.canvas.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            if let Some(sample) = pointer_sample(&e, &canvas) {
                callback(sample);
            }
        });
        let target: EventTarget = self.window.clone().into();
        self.listen(target, event, closure)
    }

    fn on_visibility_change(&mut self, mut callback: VisibilityCallback) -> ListenerId {
        let document = self.document.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            callback(!document.hidden());
        });
        let target: EventTarget = self.document.clone().into();
        self.listen(target, "visibilitychange", closure)
    }

    fn on_resize(&mut self, mut callback: ResizeCallback) -> ListenerId {
        let window = self.window.clone();
        let canvas = self.canvas.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            callback(Viewport::new(
                canvas.client_width() as f64,
                canvas.client_height() as f64,
                window.device_pixel_ratio(),
            ));
        });
        let target: EventTarget = self.window.clone().into();
        self.listen(target, "resize", closure)
    }

    fn detach(&mut self, id: ListenerId) -> bool {
        match self.listeners.remove(&id) {
            Some(listener) => {
                Self::remove(listener);
                true
            }
            None => false,
        }
    }

    fn detach_all(&mut self) {
        let count = self.listeners.len();
        for (_, listener) in std::mem::take(&mut self.listeners) {
            Self::remove(listener);
        }
        debug!(count, "listeners detached");
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Drop for DomInputPort {
    fn drop(&mut self) {
        self.detach_all();
    }
}
