use foundation::math::{ProjectedPoint, Vec3, project};
use foundation::time::Time;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use runtime::frame::{DeviceClass, Frame};
use runtime::input::{PointerSample, Viewport};
use tracing::{debug, info};

use crate::config::{ConfigError, Palette, SceneConfig};
use crate::mesh::{GeodesicMesh, build_geodesic_sphere};
use crate::node::{DataNode, NodeLink, nearest_links};
use crate::pointer::PointerState;
use crate::ring::{OrbitalRing, SceneRotation};
use crate::stream::StreamPool;

/// All mutable simulation state for one mounted visualization.
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    palette: Palette,
    device: DeviceClass,
    viewport: Viewport,
    radius: f64,
    mesh: GeodesicMesh,
    rings: Vec<OrbitalRing>,
    streams: StreamPool,
    nodes: Vec<DataNode>,
    pointer: PointerState,
    rng: SmallRng,
    time: Time,
    rotation: SceneRotation,
    projected_nodes: Vec<ProjectedPoint>,
    links: Vec<NodeLink>,
}

fn sphere_radius(config: &SceneConfig, viewport: Viewport) -> f64 {
    viewport.width.min(viewport.height) * config.radius_fraction
}

impl Scene {
    /// Validates `config` and builds the session's mesh and entity pools.
    ///
    /// The device class, and with it the entity counts, is fixed here for the
    /// whole session.
    pub fn new(config: SceneConfig, viewport: Viewport, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = config.palette.resolve()?;
        let device = DeviceClass::from_viewport_width(viewport.width);
        let radius = sphere_radius(&config, viewport);
        let mut rng = SmallRng::seed_from_u64(seed);

        let mesh = build_geodesic_sphere(radius, config.mesh_depth);
        let rings = config
            .rings
            .iter()
            .map(|ring| OrbitalRing::from_config(ring, radius))
            .collect();
        let streams = StreamPool::new(
            config.streams.count.for_device(device),
            &config.streams,
            &mut rng,
        );
        let nodes = (0..config.nodes.count.for_device(device))
            .map(|_| DataNode::spawn(&mut rng, &config.nodes, radius))
            .collect::<Vec<_>>();

        info!(
            ?device,
            radius,
            vertices = mesh.vertices().len(),
            edges = mesh.edges().len(),
            streams = streams.len(),
            nodes = nodes.len(),
            "scene built"
        );

        Ok(Self {
            config,
            palette,
            device,
            viewport,
            radius,
            mesh,
            rings,
            streams,
            nodes,
            pointer: PointerState::new(),
            rng,
            time: Time(0.0),
            rotation: SceneRotation::default(),
            projected_nodes: Vec::new(),
            links: Vec::new(),
        })
    }

    /// Advances every entity to `frame.time`. Call once per rendered frame,
    /// before drawing it.
    pub fn update(&mut self, frame: Frame) {
        self.time = frame.time;
        let t = frame.time.0;
        let cfg = &self.config;

        self.pointer.damp(cfg.damping);
        self.rotation = SceneRotation::new(
            t * cfg.yaw_speed + self.pointer.damped_x * cfg.pointer_yaw,
            (t * cfg.pitch_frequency).sin() * cfg.pitch_amplitude
                + self.pointer.damped_y * cfg.pointer_pitch,
        );

        self.streams.update(t, self.radius, &mut self.rng);

        let rotation = self.rotation;
        let projected: Vec<ProjectedPoint> = self
            .nodes
            .iter()
            .map(|node| self.project(rotation.apply(node.position_at(t))))
            .collect();
        self.links = nearest_links(
            &projected,
            cfg.nodes.links_per_node,
            cfg.nodes.link_max_distance,
            t,
        );
        self.projected_nodes = projected;
    }

    pub fn set_pointer(&mut self, sample: PointerSample) {
        self.pointer.set_target(sample, self.viewport);
    }

    /// Recomputes the center and sphere radius; entities keep their identity
    /// and are rescaled in place.
    pub fn resize(&mut self, viewport: Viewport) {
        let radius = sphere_radius(&self.config, viewport);
        let factor = radius / self.radius;
        self.viewport = viewport;
        if factor.is_finite() && factor > 0.0 && factor != 1.0 {
            self.radius = radius;
            for (ring, cfg) in self.rings.iter_mut().zip(&self.config.rings) {
                *ring = OrbitalRing::from_config(cfg, radius);
            }
            self.streams.rescale(factor);
            for node in &mut self.nodes {
                node.rescale(factor);
            }
        }
        debug!(
            width = viewport.width,
            height = viewport.height,
            radius = self.radius,
            "scene resized"
        );
    }

    /// Camera-space point to screen space.
    pub fn project(&self, p: Vec3) -> ProjectedPoint {
        let (cx, cy) = self.viewport.center();
        project(p, cx, cy, self.focal_length())
    }

    /// Model-space point to screen space using this frame's rotation.
    pub fn project_model(&self, p: Vec3) -> ProjectedPoint {
        self.project(self.rotation.apply(p))
    }

    /// The mesh is built once; later radius changes are applied as a scale.
    pub fn mesh_scale(&self) -> f64 {
        self.radius / self.mesh.radius()
    }

    pub fn focal_length(&self) -> f64 {
        self.config.focal_factor * self.radius
    }

    pub fn pulse_phase(&self) -> f64 {
        self.time.cycle(self.config.pulse_rate, 0.0)
    }

    pub fn time_step(&self) -> f64 {
        self.config.time_step(self.device)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn rotation(&self) -> SceneRotation {
        self.rotation
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn mesh(&self) -> &GeodesicMesh {
        &self.mesh
    }

    pub fn rings(&self) -> &[OrbitalRing] {
        &self.rings
    }

    pub fn streams(&self) -> &StreamPool {
        &self.streams
    }

    pub fn nodes(&self) -> &[DataNode] {
        &self.nodes
    }

    pub fn projected_nodes(&self) -> &[ProjectedPoint] {
        &self.projected_nodes
    }

    pub fn links(&self) -> &[NodeLink] {
        &self.links
    }
}
