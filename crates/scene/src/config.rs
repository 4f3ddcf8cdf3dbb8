//! Scene configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a complete configuration.

use foundation::color::{ColorError, Rgba};
use runtime::frame::DeviceClass;
use serde::{Deserialize, Serialize};

/// Deepest subdivision accepted. Depth 5 already produces 10k+ edges per frame.
pub const MAX_MESH_DEPTH: u32 = 4;

/// Most streams or nodes per device class.
pub const MAX_ENTITY_COUNT: usize = 512;

/// Longest stream trail, in frames.
pub const MAX_TRAIL: usize = 1024;

pub const MAX_LINKS_PER_NODE: usize = 16;

pub const MAX_RING_SEGMENTS: u32 = 4096;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Json(String),
    Invalid { field: &'static str, reason: String },
    Color { field: &'static str, source: ColorError },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(msg) => write!(f, "scene config is not valid JSON: {msg}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
            ConfigError::Color { field, source } => write!(f, "invalid {field}: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Color { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Inclusive `[min, max]` range sampled uniformly.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn check(self, field: &'static str, allow_zero: bool) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(invalid(field, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(invalid(field, format!("min {} > max {}", self.min, self.max)));
        }
        if self.min < 0.0 || (!allow_zero && self.min == 0.0) {
            return Err(invalid(field, format!("min {} must be positive", self.min)));
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerDevice {
    pub desktop: usize,
    pub mobile: usize,
}

impl PerDevice {
    fn check(self, field: &'static str) -> Result<(), ConfigError> {
        let most = self.desktop.max(self.mobile);
        if most > MAX_ENTITY_COUNT {
            return Err(invalid(field, format!("{most} exceeds {MAX_ENTITY_COUNT}")));
        }
        Ok(())
    }

    pub fn for_device(self, device: DeviceClass) -> usize {
        match device {
            DeviceClass::Desktop => self.desktop,
            DeviceClass::Mobile => self.mobile,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingConfig {
    pub tilt_x: f64,
    pub tilt_z: f64,
    /// Ring radius as a multiple of the sphere radius.
    pub radius_factor: f64,
    pub angular_speed: f64,
    pub segments: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub count: PerDevice,
    pub max_trail: usize,
    /// Lifetime in rendered frames.
    pub life: Span,
    /// Longitude advance per frame (radians).
    pub speed: Span,
    pub size: Span,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            count: PerDevice {
                desktop: 18,
                mobile: 8,
            },
            max_trail: 24,
            life: Span::new(120.0, 320.0),
            speed: Span::new(0.006, 0.018),
            size: Span::new(1.2, 2.4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub count: PerDevice,
    /// Distance of the base position from the center, in sphere radii.
    pub shell: Span,
    pub orbit_radius: Span,
    pub orbit_speed: Span,
    pub size: Span,
    pub links_per_node: usize,
    /// Screen-space cutoff for node links (CSS pixels).
    pub link_max_distance: f64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            count: PerDevice {
                desktop: 28,
                mobile: 14,
            },
            shell: Span::new(1.1, 1.6),
            orbit_radius: Span::new(4.0, 14.0),
            orbit_speed: Span::new(0.6, 1.6),
            size: Span::new(1.5, 3.5),
            links_per_node: 2,
            link_max_distance: 140.0,
        }
    }
}

/// Colors as `#rrggbb` / `#rrggbbaa` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub core: String,
    pub background: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            primary: "#00d4ff".to_string(),
            secondary: "#8b5cf6".to_string(),
            accent: "#22d3ee".to_string(),
            core: "#e0f2fe".to_string(),
            background: "#00000000".to_string(),
        }
    }
}

/// Which palette slot an entity is drawn with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tint {
    Primary,
    Secondary,
    Accent,
}

impl Tint {
    pub const ALL: [Tint; 3] = [Tint::Primary, Tint::Secondary, Tint::Accent];
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub primary: Rgba,
    pub secondary: Rgba,
    pub accent: Rgba,
    pub core: Rgba,
    pub background: Rgba,
}

impl Palette {
    pub fn tint(&self, tint: Tint) -> Rgba {
        match tint {
            Tint::Primary => self.primary,
            Tint::Secondary => self.secondary,
            Tint::Accent => self.accent,
        }
    }
}

impl PaletteConfig {
    pub fn resolve(&self) -> Result<Palette, ConfigError> {
        let parse = |field: &'static str, value: &str| {
            Rgba::from_hex(value).map_err(|source| ConfigError::Color { field, source })
        };
        Ok(Palette {
            primary: parse("palette.primary", &self.primary)?,
            secondary: parse("palette.secondary", &self.secondary)?,
            accent: parse("palette.accent", &self.accent)?,
            core: parse("palette.core", &self.core)?,
            background: parse("palette.background", &self.background)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Animation time added per rendered frame on desktop-class viewports.
    pub time_step_desktop: f64,
    /// Step used on mobile-class viewports.
    pub time_step_mobile: f64,
    pub mesh_depth: u32,
    /// Sphere radius as a fraction of `min(width, height)`.
    pub radius_fraction: f64,
    /// Camera focal length in sphere radii.
    pub focal_factor: f64,
    pub yaw_speed: f64,
    pub pitch_frequency: f64,
    pub pitch_amplitude: f64,
    /// Rotation bias at full pointer deflection (radians).
    pub pointer_yaw: f64,
    pub pointer_pitch: f64,
    pub damping: f64,
    /// Pulse waves emitted per unit of animation time.
    pub pulse_rate: f64,
    pub rings: Vec<RingConfig>,
    pub streams: StreamConfig,
    pub nodes: NodeConfig,
    pub palette: PaletteConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            time_step_desktop: 0.008,
            time_step_mobile: 0.012,
            mesh_depth: 1,
            radius_fraction: 0.28,
            focal_factor: 3.0,
            yaw_speed: 0.3,
            pitch_frequency: 0.5,
            pitch_amplitude: 0.15,
            pointer_yaw: 0.5,
            pointer_pitch: 0.3,
            damping: 0.05,
            pulse_rate: 0.4,
            rings: vec![
                RingConfig {
                    tilt_x: 1.2,
                    tilt_z: 0.2,
                    radius_factor: 1.25,
                    angular_speed: 0.4,
                    segments: 96,
                },
                RingConfig {
                    tilt_x: 0.9,
                    tilt_z: -0.6,
                    radius_factor: 1.45,
                    angular_speed: -0.25,
                    segments: 112,
                },
                RingConfig {
                    tilt_x: 1.5,
                    tilt_z: 0.9,
                    radius_factor: 1.7,
                    angular_speed: 0.15,
                    segments: 128,
                },
            ],
            streams: StreamConfig::default(),
            nodes: NodeConfig::default(),
            palette: PaletteConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn time_step(&self, device: DeviceClass) -> f64 {
        match device {
            DeviceClass::Desktop => self.time_step_desktop,
            DeviceClass::Mobile => self.time_step_mobile,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, step) in [
            ("time_step_desktop", self.time_step_desktop),
            ("time_step_mobile", self.time_step_mobile),
        ] {
            if !(step.is_finite() && step > 0.0) {
                return Err(invalid(field, format!("{step} must be positive")));
            }
        }
        if self.mesh_depth > MAX_MESH_DEPTH {
            return Err(invalid(
                "mesh_depth",
                format!("{} exceeds {MAX_MESH_DEPTH}", self.mesh_depth),
            ));
        }
        if !(self.radius_fraction > 0.0 && self.radius_fraction <= 0.5) {
            return Err(invalid("radius_fraction", "must be in (0, 0.5]"));
        }
        if !(self.focal_factor.is_finite() && self.focal_factor > 0.0) {
            return Err(invalid("focal_factor", "must be positive"));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(invalid("damping", "must be in (0, 1]"));
        }
        if !(self.pulse_rate.is_finite() && self.pulse_rate >= 0.0) {
            return Err(invalid("pulse_rate", "must be non-negative"));
        }
        for ring in &self.rings {
            if !(3..=MAX_RING_SEGMENTS).contains(&ring.segments) {
                return Err(invalid(
                    "rings.segments",
                    format!("{} not in 3..={MAX_RING_SEGMENTS}", ring.segments),
                ));
            }
            if !(ring.radius_factor > 0.0 && ring.radius_factor < self.focal_factor) {
                return Err(invalid(
                    "rings.radius_factor",
                    "must be positive and inside the focal distance",
                ));
            }
        }

        let streams = &self.streams;
        streams.count.check("streams.count")?;
        if !(1..=MAX_TRAIL).contains(&streams.max_trail) {
            return Err(invalid(
                "streams.max_trail",
                format!("{} not in 1..={MAX_TRAIL}", streams.max_trail),
            ));
        }
        streams.life.check("streams.life", false)?;
        if streams.life.min < 1.0 {
            return Err(invalid("streams.life", "must last at least one frame"));
        }
        streams.speed.check("streams.speed", true)?;
        streams.size.check("streams.size", false)?;

        let nodes = &self.nodes;
        nodes.count.check("nodes.count")?;
        if nodes.links_per_node > MAX_LINKS_PER_NODE {
            return Err(invalid(
                "nodes.links_per_node",
                format!("{} exceeds {MAX_LINKS_PER_NODE}", nodes.links_per_node),
            ));
        }
        nodes.shell.check("nodes.shell", false)?;
        nodes.orbit_radius.check("nodes.orbit_radius", true)?;
        nodes.orbit_speed.check("nodes.orbit_speed", true)?;
        nodes.size.check("nodes.size", false)?;
        if !(nodes.link_max_distance.is_finite() && nodes.link_max_distance > 0.0) {
            return Err(invalid("nodes.link_max_distance", "must be positive"));
        }
        // Anything at or past the focal distance would project with a negative scale.
        if nodes.shell.max >= self.focal_factor {
            return Err(invalid("nodes.shell", "must stay inside the focal distance"));
        }

        self.palette.resolve()?;
        Ok(())
    }
}
