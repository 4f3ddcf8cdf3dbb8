//! Injectable input port.
//!
//! The frame core never touches platform event APIs directly. Hosts implement
//! [`InputPort`] over their event system (DOM listeners in the browser) and
//! tests drive [`ManualInputPort`] by hand.

use std::collections::BTreeMap;

/// Pointer or touch position in CSS pixels, relative to the top-left corner
/// of the drawing surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerSample {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }

    /// Converts a window-relative sample to surface-local coordinates, given
    /// the surface's top-left corner in the same space.
    pub fn relative_to(self, left: f64, top: f64) -> Self {
        Self::new(self.client_x - left, self.client_y - top)
    }
}

/// Drawing-surface size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width * 0.5, self.height * 0.5)
    }

    /// Backing-store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u32);

pub type PointerCallback = Box<dyn FnMut(PointerSample)>;
pub type VisibilityCallback = Box<dyn FnMut(bool)>;
pub type ResizeCallback = Box<dyn FnMut(Viewport)>;

pub trait InputPort {
    fn on_pointer_move(&mut self, callback: PointerCallback) -> ListenerId;
    fn on_visibility_change(&mut self, callback: VisibilityCallback) -> ListenerId;
    fn on_resize(&mut self, callback: ResizeCallback) -> ListenerId;
    /// Returns `false` if `id` was not registered.
    fn detach(&mut self, id: ListenerId) -> bool;
    fn detach_all(&mut self);
    fn listener_count(&self) -> usize;
}

enum Listener {
    Pointer(PointerCallback),
    Visibility(VisibilityCallback),
    Resize(ResizeCallback),
}

/// In-memory port. Events are delivered synchronously in registration order.
#[derive(Default)]
pub struct ManualInputPort {
    next_id: u32,
    listeners: BTreeMap<ListenerId, Listener>,
}

impl std::fmt::Debug for ManualInputPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualInputPort")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ManualInputPort {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.insert(id, listener);
        id
    }

    pub fn emit_pointer(&mut self, sample: PointerSample) {
        for listener in self.listeners.values_mut() {
            if let Listener::Pointer(cb) = listener {
                cb(sample);
            }
        }
    }

    pub fn emit_visibility(&mut self, visible: bool) {
        for listener in self.listeners.values_mut() {
            if let Listener::Visibility(cb) = listener {
                cb(visible);
            }
        }
    }

    pub fn emit_resize(&mut self, viewport: Viewport) {
        for listener in self.listeners.values_mut() {
            if let Listener::Resize(cb) = listener {
                cb(viewport);
            }
        }
    }
}

impl InputPort for ManualInputPort {
    fn on_pointer_move(&mut self, callback: PointerCallback) -> ListenerId {
        self.register(Listener::Pointer(callback))
    }

    fn on_visibility_change(&mut self, callback: VisibilityCallback) -> ListenerId {
        self.register(Listener::Visibility(callback))
    }

    fn on_resize(&mut self, callback: ResizeCallback) -> ListenerId {
        self.register(Listener::Resize(callback))
    }

    fn detach(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn detach_all(&mut self) {
        self.listeners.clear();
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
