//! Per-frame draw orchestration.
//!
//! Layers are drawn in a fixed back-to-front order with no per-point depth
//! sort. Far entities drawn in a later layer can overlap near ones from an
//! earlier layer; that is accepted for a decorative scene.

use foundation::color::Rgba;
use foundation::math::{ProjectedPoint, Vec2};
use scene::Scene;
use scene::config::Tint;
use scene::node::NodeLink;
use tracing::trace;

use crate::surface::{Layer, Paint, RadialGradient, Surface};

const RING_DASH: [f64; 2] = [2.0, 4.0];
const RING_ALPHA: f64 = 0.25;
const RING_WIDTH: f64 = 0.8;
const RING_DOT_RADIUS: f64 = 2.5;

const EDGE_ALPHA: f64 = 0.35;
const EDGE_WIDTH: f64 = 0.6;

const VERTEX_GLOW_RADIUS: f64 = 4.0;
const VERTEX_GLOW_ALPHA: f64 = 0.6;

const TRAIL_ALPHA: f64 = 0.8;
const HEAD_SCALE: f64 = 1.2;

const LINK_WIDTH: f64 = 0.5;
const LINK_DOT_RADIUS: f64 = 1.5;
const NODE_HALO_FACTOR: f64 = 3.0;
const NODE_HALO_ALPHA: f64 = 0.3;

/// Core glow radius in sphere radii.
const CORE_RADIUS: f64 = 0.6;
const PULSE_WIDTH: f64 = 1.5;
const PULSE_ALPHA: f64 = 0.4;

/// Opacity falloff for a camera-space depth: full in front, faint behind.
pub fn depth_fade(z: f64, radius: f64) -> f64 {
    if !(radius > 0.0) || !z.is_finite() {
        return 0.0;
    }
    (0.5 - z / (2.0 * radius)).clamp(0.08, 1.0)
}

/// A projected point is drawable when its scale is finite and positive.
pub fn drawable(p: ProjectedPoint) -> bool {
    p.scale.is_finite() && p.scale > 0.0 && p.x.is_finite() && p.y.is_finite()
}

/// Both ends drawable and apart. Covers the link line and its highlight dot.
pub fn link_drawable(link: &NodeLink, projected: &[ProjectedPoint]) -> bool {
    link.distance > 0.0 && drawable(projected[link.from]) && drawable(projected[link.to])
}

fn usable_radius(r: f64) -> bool {
    r.is_finite() && r > 0.0
}

/// Draw-command counts for one frame, per layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawStats {
    per_layer: [u64; Layer::COUNT],
    /// Terms dropped for the frame because they were degenerate.
    pub skipped: u64,
}

impl DrawStats {
    pub fn layer(&self, layer: Layer) -> u64 {
        self.per_layer[layer.index()]
    }

    pub fn total(&self) -> u64 {
        self.per_layer.iter().sum()
    }
}

/// Forwards to the surface while counting draws against the open layer.
struct Pass<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    layer: Layer,
    stats: DrawStats,
}

impl<'a, S: Surface + ?Sized> Pass<'a, S> {
    fn begin(&mut self, layer: Layer) {
        self.layer = layer;
        self.surface.begin_layer(layer);
    }

    fn count(&mut self) {
        self.stats.per_layer[self.layer.index()] += 1;
    }

    fn skip(&mut self) {
        self.stats.skipped += 1;
    }

    fn stroke(&mut self, color: Rgba, width: f64) {
        self.surface.set_stroke(&Paint::Solid(color));
        self.surface.set_line_width(width);
    }

    fn line(&mut self, a: ProjectedPoint, b: ProjectedPoint) {
        self.surface.line(a.screen(), b.screen());
        self.count();
    }

    fn dot(&mut self, center: Vec2, radius: f64, color: Rgba) {
        if !usable_radius(radius) {
            self.skip();
            return;
        }
        self.surface.set_fill(&Paint::Solid(color));
        self.surface.fill_circle(center, radius);
        self.count();
    }

    fn glow(&mut self, gradient: RadialGradient) {
        if !usable_radius(gradient.outer_radius) {
            self.skip();
            return;
        }
        let (center, radius) = (gradient.center, gradient.outer_radius);
        self.surface.set_fill(&Paint::Radial(gradient));
        self.surface.fill_circle(center, radius);
        self.count();
    }
}

pub struct FrameRenderer;

impl FrameRenderer {
    /// Clears the surface and draws the scene's current frame.
    ///
    /// Call after [`Scene::update`] for the same frame.
    pub fn draw<S: Surface + ?Sized>(scene: &Scene, surface: &mut S) -> DrawStats {
        let viewport = scene.viewport();
        surface.clear(viewport.width, viewport.height);
        let background = scene.palette().background;
        if background.a > 0.0 {
            surface.set_fill(&Paint::Solid(background));
            surface.fill_rect(0.0, 0.0, viewport.width, viewport.height);
        }

        let mut pass = Pass {
            surface,
            layer: Layer::Rings,
            stats: DrawStats::default(),
        };
        draw_rings(scene, &mut pass);
        let vertices = project_mesh(scene);
        draw_sphere_edges(scene, &vertices, &mut pass);
        draw_vertex_glows(scene, &vertices, &mut pass);
        draw_streams(scene, &mut pass);
        draw_nodes(scene, &mut pass);
        draw_core(scene, &mut pass);
        draw_pulse(scene, &mut pass);

        let stats = pass.stats;
        trace!(
            total = stats.total(),
            skipped = stats.skipped,
            edges = stats.layer(Layer::SphereEdges),
            streams = stats.layer(Layer::Streams),
            "frame drawn"
        );
        stats
    }
}

fn draw_rings<S: Surface + ?Sized>(scene: &Scene, pass: &mut Pass<'_, S>) {
    pass.begin(Layer::Rings);
    let t = scene.time().0;
    let rotation = scene.rotation();
    let radius = scene.radius();
    let palette = scene.palette();

    for (i, ring) in scene.rings().iter().enumerate() {
        let color = palette.tint(Tint::ALL[i % Tint::ALL.len()]);
        let points: Vec<ProjectedPoint> = ring
            .points(t, rotation)
            .into_iter()
            .map(|p| scene.project(p))
            .collect();

        pass.surface.set_line_dash(&RING_DASH);
        for (j, &a) in points.iter().enumerate() {
            let b = points[(j + 1) % points.len()];
            if !drawable(a) || !drawable(b) {
                pass.skip();
                continue;
            }
            let fade = depth_fade((a.depth + b.depth) * 0.5, radius);
            pass.stroke(
                color.with_alpha(RING_ALPHA * fade),
                RING_WIDTH * (a.scale + b.scale) * 0.5,
            );
            pass.line(a, b);
        }
        pass.surface.set_line_dash(&[]);

        let dot = scene.project(ring.dot_position(t, rotation));
        if drawable(dot) {
            let fade = depth_fade(dot.depth, radius);
            pass.dot(dot.screen(), RING_DOT_RADIUS * dot.scale, color.with_alpha(fade));
        } else {
            pass.skip();
        }
    }
}

fn project_mesh(scene: &Scene) -> Vec<ProjectedPoint> {
    let scale = scene.mesh_scale();
    scene
        .mesh()
        .vertices()
        .iter()
        .map(|v| scene.project_model(v.scale(scale)))
        .collect()
}

fn draw_sphere_edges<S: Surface + ?Sized>(
    scene: &Scene,
    vertices: &[ProjectedPoint],
    pass: &mut Pass<'_, S>,
) {
    pass.begin(Layer::SphereEdges);
    let radius = scene.radius();
    let color = scene.palette().primary;
    for edge in scene.mesh().edges() {
        let (a, b) = (vertices[edge.a], vertices[edge.b]);
        if !drawable(a) || !drawable(b) {
            pass.skip();
            continue;
        }
        let fade = depth_fade((a.depth + b.depth) * 0.5, radius);
        pass.stroke(
            color.with_alpha(EDGE_ALPHA * fade),
            EDGE_WIDTH * (a.scale + b.scale) * 0.5,
        );
        pass.line(a, b);
    }
}

/// Only the front hemisphere gets glows.
fn draw_vertex_glows<S: Surface + ?Sized>(
    scene: &Scene,
    vertices: &[ProjectedPoint],
    pass: &mut Pass<'_, S>,
) {
    pass.begin(Layer::VertexGlows);
    let radius = scene.radius();
    let color = scene.palette().accent;
    for &v in vertices.iter().filter(|v| v.depth < 0.0) {
        if !drawable(v) {
            pass.skip();
            continue;
        }
        let fade = depth_fade(v.depth, radius);
        pass.glow(RadialGradient::glow(
            v.screen(),
            VERTEX_GLOW_RADIUS * v.scale,
            color.with_alpha(VERTEX_GLOW_ALPHA * fade),
        ));
    }
}

fn draw_streams<S: Surface + ?Sized>(scene: &Scene, pass: &mut Pass<'_, S>) {
    pass.begin(Layer::Streams);
    let radius = scene.radius();
    let palette = scene.palette();
    for stream in scene.streams().streams() {
        let color = palette.tint(stream.tint);
        let trail: Vec<ProjectedPoint> = stream
            .trail()
            .iter()
            .map(|p| scene.project_model(*p))
            .collect();
        let len = trail.len() as f64;

        for (i, pair) in trail.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            if !drawable(a) || !drawable(b) {
                pass.skip();
                continue;
            }
            let age = 1.0 - i as f64 / len;
            let fade = depth_fade((a.depth + b.depth) * 0.5, radius);
            pass.stroke(
                color.with_alpha(TRAIL_ALPHA * age * fade),
                stream.size * age * a.scale,
            );
            pass.line(a, b);
        }

        if let Some(&head) = trail.first() {
            if drawable(head) {
                let fade = depth_fade(head.depth, radius);
                pass.dot(
                    head.screen(),
                    stream.size * HEAD_SCALE * head.scale,
                    color.with_alpha(fade),
                );
            } else {
                pass.skip();
            }
        }
    }
}

/// Links first, then their highlight dots, then the nodes on top.
fn draw_nodes<S: Surface + ?Sized>(scene: &Scene, pass: &mut Pass<'_, S>) {
    pass.begin(Layer::Nodes);
    let radius = scene.radius();
    let palette = scene.palette();
    let projected = scene.projected_nodes();

    for link in scene.links() {
        if !link_drawable(link, projected) {
            pass.skip();
            continue;
        }
        let (a, b) = (projected[link.from], projected[link.to]);
        pass.stroke(palette.primary.with_alpha(link.opacity), LINK_WIDTH);
        pass.line(a, b);
    }
    for link in scene.links() {
        if !link_drawable(link, projected) {
            pass.skip();
            continue;
        }
        let alpha = (link.opacity * 2.0).min(1.0);
        pass.dot(
            link.highlight_point(projected),
            LINK_DOT_RADIUS,
            palette.accent.with_alpha(alpha),
        );
    }

    for (node, &p) in scene.nodes().iter().zip(projected) {
        if !drawable(p) {
            pass.skip();
            continue;
        }
        let fade = depth_fade(p.depth, radius);
        let size = node.size * p.scale;
        pass.glow(RadialGradient::glow(
            p.screen(),
            size * NODE_HALO_FACTOR,
            palette.secondary.with_alpha(NODE_HALO_ALPHA * fade),
        ));
        pass.dot(p.screen(), size, palette.core.with_alpha(fade));
    }
}

fn draw_core<S: Surface + ?Sized>(scene: &Scene, pass: &mut Pass<'_, S>) {
    pass.begin(Layer::CoreGlow);
    let (cx, cy) = scene.viewport().center();
    let palette = scene.palette();
    let center = Vec2::new(cx, cy);
    pass.glow(RadialGradient {
        center,
        inner_radius: 0.0,
        outer_radius: scene.radius() * CORE_RADIUS,
        stops: vec![
            (0.0, palette.core.with_alpha(0.35)),
            (0.5, palette.primary.with_alpha(0.1)),
            (1.0, palette.primary.with_alpha(0.0)),
        ],
    });
}

fn draw_pulse<S: Surface + ?Sized>(scene: &Scene, pass: &mut Pass<'_, S>) {
    pass.begin(Layer::Pulse);
    let phase = scene.pulse_phase();
    let radius = scene.radius() * (0.9 + 0.8 * phase);
    if !usable_radius(radius) {
        pass.skip();
        return;
    }
    let (cx, cy) = scene.viewport().center();
    pass.stroke(
        scene.palette().primary.with_alpha((1.0 - phase) * PULSE_ALPHA),
        PULSE_WIDTH,
    );
    pass.surface.stroke_circle(Vec2::new(cx, cy), radius);
    pass.count();
}

#[cfg(test)]
mod tests {
    use super::{FrameRenderer, depth_fade, drawable, link_drawable};
    use crate::recorder::{DrawCommand, Recorder};
    use crate::surface::{Layer, Paint};
    use foundation::math::ProjectedPoint;
    use foundation::time::Time;
    use pretty_assertions::assert_eq;
    use runtime::frame::Frame;
    use runtime::input::Viewport;
    use scene::node::NodeLink;
    use scene::{Scene, SceneConfig};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn scene_at(config: SceneConfig, frames: u64) -> Scene {
        let mut scene = Scene::new(config, Viewport::new(800.0, 600.0, 1.0), 11).unwrap();
        for i in 0..=frames {
            scene.update(Frame::new(i, Time(i as f64 * 0.008)));
        }
        scene
    }

    #[test]
    fn layers_follow_painter_order() {
        let scene = scene_at(SceneConfig::default(), 3);
        let mut rec = Recorder::new();
        FrameRenderer::draw(&scene, &mut rec);
        assert_eq!(rec.layers(), Layer::ORDER.to_vec());
        assert!(matches!(rec.commands()[0], DrawCommand::Clear { .. }));
    }

    #[test]
    fn counts_match_scene() {
        let scene = scene_at(SceneConfig::default(), 6);
        let mut rec = Recorder::new();
        let stats = FrameRenderer::draw(&scene, &mut rec);

        let ring_segments: u64 = scene.rings().iter().map(|r| r.segments as u64).sum();
        assert_eq!(
            stats.layer(Layer::Rings),
            ring_segments + scene.rings().len() as u64
        );
        assert_eq!(
            stats.layer(Layer::SphereEdges),
            scene.mesh().edges().len() as u64
        );

        let front = scene
            .mesh()
            .vertices()
            .iter()
            .filter(|v| scene.project_model(v.scale(scene.mesh_scale())).depth < 0.0)
            .count() as u64;
        assert_eq!(stats.layer(Layer::VertexGlows), front);

        let trail: u64 = scene
            .streams()
            .streams()
            .iter()
            .map(|s| s.trail().len() as u64)
            .sum();
        // (len - 1) segments plus one head per stream
        assert_eq!(stats.layer(Layer::Streams), trail);

        assert_eq!(stats.layer(Layer::CoreGlow), 1);
        assert_eq!(stats.layer(Layer::Pulse), 1);
        assert_eq!(stats.skipped, 0);

        for layer in Layer::ORDER {
            assert_eq!(rec.draws_in(layer) as u64, stats.layer(layer), "{}", layer.as_str());
        }
    }

    #[test]
    fn nodes_draw_links_then_dots() {
        let scene = scene_at(SceneConfig::default(), 2);
        let mut rec = Recorder::new();
        let stats = FrameRenderer::draw(&scene, &mut rec);
        let links = scene.links().len() as u64;
        let nodes = scene.nodes().len() as u64;
        // link line, highlight dot, halo and dot
        assert_eq!(stats.layer(Layer::Nodes), links * 2 + nodes * 2);
    }

    #[test]
    fn background_fill_only_when_opaque() {
        let mut rec = Recorder::new();
        FrameRenderer::draw(&scene_at(SceneConfig::default(), 0), &mut rec);
        assert!(!rec
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FillRect { .. })));

        let mut config = SceneConfig::default();
        config.palette.background = "#101820ff".to_string();
        let mut rec = Recorder::new();
        FrameRenderer::draw(&scene_at(config, 0), &mut rec);
        assert!(matches!(rec.commands()[1], DrawCommand::SetFill(Paint::Solid(_))));
        assert!(matches!(rec.commands()[2], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn pulse_expands_and_fades() {
        let config = SceneConfig {
            pulse_rate: 1.0,
            ..SceneConfig::default()
        };
        let mut scene = Scene::new(config, Viewport::new(800.0, 600.0, 1.0), 1).unwrap();
        scene.update(Frame::new(0, Time(0.25)));
        let mut rec = Recorder::new();
        FrameRenderer::draw(&scene, &mut rec);

        let radius = rec
            .commands()
            .iter()
            .rev()
            .find_map(|c| match c {
                DrawCommand::StrokeCircle { radius, .. } => Some(*radius),
                _ => None,
            })
            .unwrap();
        assert_close(radius, scene.radius() * (0.9 + 0.8 * 0.25), 1e-9);
    }

    #[test]
    fn depth_fade_is_clamped() {
        assert_close(depth_fade(-100.0, 100.0), 1.0, 1e-12);
        assert_close(depth_fade(0.0, 100.0), 0.5, 1e-12);
        assert_close(depth_fade(100.0, 100.0), 0.08, 1e-12);
        assert_eq!(depth_fade(0.0, 0.0), 0.0);
        assert_eq!(depth_fade(f64::NAN, 10.0), 0.0);
    }

    #[test]
    fn degenerate_points_are_not_drawable() {
        let ok = ProjectedPoint {
            x: 1.0,
            y: 2.0,
            scale: 0.5,
            depth: 0.0,
        };
        assert!(drawable(ok));
        assert!(!drawable(ProjectedPoint { scale: 0.0, ..ok }));
        assert!(!drawable(ProjectedPoint { scale: -1.0, ..ok }));
        assert!(!drawable(ProjectedPoint {
            scale: f64::INFINITY,
            ..ok
        }));
        assert!(!drawable(ProjectedPoint { x: f64::NAN, ..ok }));
    }

    #[test]
    fn link_with_undrawable_end_is_skipped() {
        let ok = ProjectedPoint {
            x: 1.0,
            y: 2.0,
            scale: 0.5,
            depth: 0.0,
        };
        let link = NodeLink {
            from: 0,
            to: 1,
            distance: 10.0,
            opacity: 0.2,
            highlight: 0.5,
        };
        assert!(link_drawable(&link, &[ok, ProjectedPoint { x: 11.0, ..ok }]));
        assert!(!link_drawable(&link, &[ok, ProjectedPoint { y: f64::NAN, ..ok }]));
        assert!(!link_drawable(&link, &[ProjectedPoint { scale: 0.0, ..ok }, ok]));
        assert!(!link_drawable(&NodeLink { distance: 0.0, ..link }, &[ok, ok]));
    }
}
