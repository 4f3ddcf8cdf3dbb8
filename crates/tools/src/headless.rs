//! Runs the frame loop without a browser.

use canvas::{DrawStats, FrameRenderer, Surface};
use runtime::input::{InputPort, ManualInputPort, PointerSample, Viewport};
use runtime::lifecycle::{FrameLoop, LoopError, TickOutcome};
use scene::{ConfigError, GeodesicMesh, Scene, SceneConfig, build_geodesic_sphere};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

#[derive(Debug)]
pub enum HeadlessError {
    Config(ConfigError),
    Loop(LoopError),
}

impl std::fmt::Display for HeadlessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadlessError::Config(e) => write!(f, "{e}"),
            HeadlessError::Loop(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for HeadlessError {}

impl From<ConfigError> for HeadlessError {
    fn from(e: ConfigError) -> Self {
        HeadlessError::Config(e)
    }
}

impl From<LoopError> for HeadlessError {
    fn from(e: LoopError) -> Self {
        HeadlessError::Loop(e)
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub viewport: Viewport,
    pub seed: u64,
    pub frames: u64,
    /// Pointer position fed through the input port before the first frame.
    pub pointer: Option<PointerSample>,
}

/// Scene and loop state after a headless run, ready to draw the last frame.
#[derive(Debug)]
pub struct HeadlessRun {
    pub scene: Scene,
    pub frame_loop: FrameLoop,
}

impl HeadlessRun {
    /// Draws the current frame onto `surface`.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> DrawStats {
        FrameRenderer::draw(&self.scene, surface)
    }
}

/// Mounts a loop, feeds the optional pointer sample through a
/// [`ManualInputPort`], and renders `frames` frames.
///
/// Every frame is drawn onto `surface`; the final frame is what remains on it.
pub fn run<S: Surface + ?Sized>(
    config: SceneConfig,
    options: &RunOptions,
    surface: &mut S,
) -> Result<HeadlessRun, HeadlessError> {
    let mut scene = Scene::new(config, options.viewport, options.seed)?;
    let mut frame_loop = FrameLoop::new(scene.time_step());
    frame_loop.mount()?;

    // Samples queue up between frames and are applied before each update.
    let pending: Rc<RefCell<Vec<PointerSample>>> = Rc::default();
    let mut input = ManualInputPort::new();
    {
        let pending = pending.clone();
        input.on_pointer_move(Box::new(move |sample| pending.borrow_mut().push(sample)));
    }
    if let Some(sample) = options.pointer {
        input.emit_pointer(sample);
    }

    for _ in 0..options.frames {
        match frame_loop.tick(true) {
            TickOutcome::Render(frame) => {
                for sample in pending.borrow_mut().drain(..) {
                    scene.set_pointer(sample);
                }
                scene.update(frame);
                let stats = FrameRenderer::draw(&scene, surface);
                frame_loop.finish_frame(stats.total());
            }
            TickOutcome::Skip => {}
            TickOutcome::Stopped => break,
        }
    }
    input.detach_all();

    let metrics = frame_loop.metrics();
    info!(
        frames = metrics.frames_rendered,
        mean_draws = metrics.draw_commands.mean().unwrap_or(0.0),
        "headless run finished"
    );
    Ok(HeadlessRun { scene, frame_loop })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    pub radius: f64,
    pub depth: u32,
    pub vertices: usize,
    pub edges: usize,
    pub expected_vertices: usize,
    pub expected_edges: usize,
    /// Largest `| |v| - radius |` over all vertices.
    pub max_radius_error: f64,
}

pub fn mesh_stats(radius: f64, depth: u32) -> MeshStats {
    let mesh = build_geodesic_sphere(radius, depth);
    let max_radius_error = mesh
        .vertices()
        .iter()
        .map(|v| (v.length() - radius).abs())
        .fold(0.0, f64::max);
    MeshStats {
        radius,
        depth,
        vertices: mesh.vertices().len(),
        edges: mesh.edges().len(),
        expected_vertices: GeodesicMesh::expected_vertex_count(depth),
        expected_edges: GeodesicMesh::expected_edge_count(depth),
        max_radius_error,
    }
}
