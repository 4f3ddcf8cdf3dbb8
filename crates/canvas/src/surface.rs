//! Immediate-mode 2D drawing contract.
//!
//! Mirrors the subset of the HTML canvas 2D API the renderer needs. No
//! retained scene graph: every frame is cleared and redrawn.

use foundation::color::Rgba;
use foundation::math::Vec2;

/// Back-to-front drawing layers, in painter's order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Rings,
    SphereEdges,
    VertexGlows,
    Streams,
    Nodes,
    CoreGlow,
    Pulse,
}

impl Layer {
    pub const COUNT: usize = 7;

    pub const ORDER: [Layer; Layer::COUNT] = [
        Layer::Rings,
        Layer::SphereEdges,
        Layer::VertexGlows,
        Layer::Streams,
        Layer::Nodes,
        Layer::CoreGlow,
        Layer::Pulse,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Rings => "rings",
            Layer::SphereEdges => "sphere_edges",
            Layer::VertexGlows => "vertex_glows",
            Layer::Streams => "streams",
            Layer::Nodes => "nodes",
            Layer::CoreGlow => "core_glow",
            Layer::Pulse => "pulse",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// `(offset in [0, 1], color)`, ascending offsets.
    pub stops: Vec<(f64, Rgba)>,
}

impl RadialGradient {
    /// Solid `color` at the center fading to transparent at `radius`.
    pub fn glow(center: Vec2, radius: f64, color: Rgba) -> Self {
        Self {
            center,
            inner_radius: 0.0,
            outer_radius: radius,
            stops: vec![(0.0, color), (1.0, color.with_alpha(0.0))],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

pub trait Surface {
    /// Marks the start of a layer. Surfaces that do not care ignore it.
    fn begin_layer(&mut self, _layer: Layer) {}

    fn clear(&mut self, width: f64, height: f64);
    /// Fills with the current fill paint.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn set_stroke(&mut self, paint: &Paint);
    fn set_fill(&mut self, paint: &Paint);
    fn set_line_width(&mut self, width: f64);
    /// An empty pattern draws solid lines.
    fn set_line_dash(&mut self, pattern: &[f64]);
    /// Strokes one segment with the current stroke paint.
    fn line(&mut self, from: Vec2, to: Vec2);
    fn stroke_circle(&mut self, center: Vec2, radius: f64);
    fn fill_circle(&mut self, center: Vec2, radius: f64);
}
