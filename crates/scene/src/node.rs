//! Floating data nodes and the links drawn between nearby ones.

use std::f64::consts::{FRAC_PI_2, TAU};

use foundation::math::{ProjectedPoint, Vec2, Vec3, spherical_to_cartesian};
use rand::Rng;

use crate::config::NodeConfig;

/// Peak opacity of a zero-length link.
pub const LINK_BASE_OPACITY: f64 = 0.35;

/// A node orbiting a fixed base point.
///
/// Position is a pure function of time; nodes carry no velocity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DataNode {
    pub base: Vec3,
    pub orbit_radius: f64,
    pub orbit_speed: f64,
    pub phase: f64,
    pub size: f64,
}

impl DataNode {
    /// Random base on a shell between `config.shell` sphere radii.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, config: &NodeConfig, sphere_radius: f64) -> Self {
        let lat = rng.gen_range(-FRAC_PI_2..=FRAC_PI_2);
        let lng = rng.gen_range(0.0..TAU);
        let shell = rng.gen_range(config.shell.min..=config.shell.max);
        Self {
            base: spherical_to_cartesian(lat, lng, shell * sphere_radius),
            orbit_radius: rng.gen_range(config.orbit_radius.min..=config.orbit_radius.max),
            orbit_speed: rng.gen_range(config.orbit_speed.min..=config.orbit_speed.max),
            phase: rng.gen_range(0.0..TAU),
            size: rng.gen_range(config.size.min..=config.size.max),
        }
    }

    pub fn position_at(&self, time: f64) -> Vec3 {
        let t = time * self.orbit_speed;
        let r = self.orbit_radius;
        let wobble = Vec3::new(
            (t + self.phase).sin() * r,
            (t * 0.8 + self.phase).cos() * r,
            (t * 0.6 + self.phase * 1.3).sin() * r,
        );
        self.base + wobble
    }

    pub fn rescale(&mut self, factor: f64) {
        self.base = self.base.scale(factor);
        self.orbit_radius *= factor;
    }
}

/// A screen-space connection between two projected nodes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NodeLink {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
    pub opacity: f64,
    /// Position of the traveling highlight along the link, in `[0, 1)`.
    pub highlight: f64,
}

impl NodeLink {
    pub fn highlight_point(&self, nodes: &[ProjectedPoint]) -> Vec2 {
        nodes[self.from]
            .screen()
            .lerp(nodes[self.to].screen(), self.highlight)
    }
}

/// For every node, links to its `max_links` nearest neighbours within
/// `max_distance` (screen space).
///
/// Coincident pairs have no direction and are skipped for the frame.
pub fn nearest_links(
    nodes: &[ProjectedPoint],
    max_links: usize,
    max_distance: f64,
    time: f64,
) -> Vec<NodeLink> {
    let mut links = Vec::with_capacity(nodes.len().saturating_mul(max_links.min(nodes.len())));
    let mut candidates: Vec<(usize, f64)> = Vec::with_capacity(nodes.len());
    for (i, a) in nodes.iter().enumerate() {
        candidates.clear();
        for (j, b) in nodes.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = a.distance_to(*b);
            if d > 0.0 && d < max_distance {
                candidates.push((j, d));
            }
        }
        candidates.sort_by(|x, y| x.1.total_cmp(&y.1).then(x.0.cmp(&y.0)));
        for &(j, d) in candidates.iter().take(max_links) {
            links.push(NodeLink {
                from: i,
                to: j,
                distance: d,
                opacity: (1.0 - d / max_distance) * LINK_BASE_OPACITY,
                highlight: (time + i as f64).rem_euclid(1.0),
            });
        }
    }
    links
}
