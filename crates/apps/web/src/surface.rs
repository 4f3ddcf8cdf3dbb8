use std::f64::consts::TAU;

use canvas::{Paint, RadialGradient, Surface};
use foundation::math::Vec2;
use runtime::input::Viewport;
use wasm_bindgen::JsValue;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

/// `Surface` over a browser 2D context. Coordinates are CSS pixels; the
/// context transform maps them onto the device-pixel backing store.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

// The setters take `JsValue` so gradients and CSS strings share one path.
fn ctx_set_style(ctx: &CanvasRenderingContext2d, key: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str(key), value);
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Sizes the backing store to `css size * pixel_ratio` and rescales the
    /// context so drawing stays in CSS pixels.
    pub fn fit(&self, pixel_ratio: f64) -> Viewport {
        let viewport = Viewport::new(
            self.canvas.client_width() as f64,
            self.canvas.client_height() as f64,
            pixel_ratio,
        );
        let (width, height) = viewport.backing_size();
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        let ratio = viewport.pixel_ratio;
        let _ = self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
        viewport
    }

    fn gradient(&self, g: &RadialGradient) -> Option<CanvasGradient> {
        let gradient = self
            .ctx
            .create_radial_gradient(
                g.center.x,
                g.center.y,
                g.inner_radius,
                g.center.x,
                g.center.y,
                g.outer_radius,
            )
            .ok()?;
        for (offset, color) in &g.stops {
            gradient
                .add_color_stop(offset.clamp(0.0, 1.0) as f32, &color.css())
                .ok()?;
        }
        Some(gradient)
    }

    fn paint_value(&self, paint: &Paint) -> Option<JsValue> {
        match paint {
            Paint::Solid(color) => Some(JsValue::from_str(&color.css())),
            Paint::Radial(g) => self.gradient(g).map(JsValue::from),
        }
    }

    fn arc(&self, center: Vec2, radius: f64) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn set_stroke(&mut self, paint: &Paint) {
        if let Some(value) = self.paint_value(paint) {
            ctx_set_style(&self.ctx, "strokeStyle", &value);
        }
    }

    fn set_fill(&mut self, paint: &Paint) {
        if let Some(value) = self.paint_value(paint) {
            ctx_set_style(&self.ctx, "fillStyle", &value);
        }
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        let segments = js_sys::Array::new();
        for v in pattern {
            segments.push(&JsValue::from_f64(*v));
        }
        let _ = self.ctx.set_line_dash(&segments);
    }

    fn line(&mut self, from: Vec2, to: Vec2) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f64) {
        self.arc(center, radius);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64) {
        self.arc(center, radius);
        self.ctx.fill();
    }
}
