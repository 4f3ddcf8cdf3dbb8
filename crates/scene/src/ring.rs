use std::f64::consts::TAU;

use foundation::math::{Vec3, rotate_x, rotate_y, rotate_z};

use crate::config::RingConfig;

/// The highlight dot laps its ring this many times faster than the ring turns.
const DOT_SPEEDUP: f64 = 3.0;

/// Whole-scene orientation for one frame.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SceneRotation {
    /// About Y (radians).
    pub yaw: f64,
    /// About X (radians).
    pub pitch: f64,
}

impl SceneRotation {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// Model space to camera space: yaw first, then pitch.
    pub fn apply(&self, p: Vec3) -> Vec3 {
        rotate_x(rotate_y(p, self.yaw), self.pitch)
    }
}

/// A tilted circle around the sphere.
///
/// Points are generated on demand every frame; nothing is stored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitalRing {
    pub tilt_x: f64,
    pub tilt_z: f64,
    pub radius: f64,
    pub angular_speed: f64,
    pub segments: u32,
}

impl OrbitalRing {
    pub fn from_config(config: &RingConfig, sphere_radius: f64) -> Self {
        Self {
            tilt_x: config.tilt_x,
            tilt_z: config.tilt_z,
            radius: config.radius_factor * sphere_radius,
            angular_speed: config.angular_speed,
            segments: config.segments.max(3),
        }
    }

    fn local_point(&self, angle: f64) -> Vec3 {
        let (s, c) = angle.sin_cos();
        let flat = Vec3::new(self.radius * c, 0.0, self.radius * s);
        rotate_z(rotate_x(flat, self.tilt_x), self.tilt_z)
    }

    pub fn segment_angle(&self, segment: u32, time: f64) -> f64 {
        segment as f64 / self.segments as f64 * TAU + time * self.angular_speed
    }

    /// Camera-space position of `segment` at `time`.
    pub fn point_at(&self, segment: u32, time: f64, rotation: SceneRotation) -> Vec3 {
        rotation.apply(self.local_point(self.segment_angle(segment, time)))
    }

    /// All segment points in order; consecutive pairs (wrapping) form the ring.
    pub fn points(&self, time: f64, rotation: SceneRotation) -> Vec<Vec3> {
        (0..self.segments)
            .map(|seg| self.point_at(seg, time, rotation))
            .collect()
    }

    pub fn dot_position(&self, time: f64, rotation: SceneRotation) -> Vec3 {
        rotation.apply(self.local_point(time * self.angular_speed * DOT_SPEEDUP))
    }
}

#[cfg(test)]
mod tests {
    use super::{OrbitalRing, SceneRotation};
    use crate::config::RingConfig;
    use foundation::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn ring() -> OrbitalRing {
        OrbitalRing::from_config(
            &RingConfig {
                tilt_x: 0.7,
                tilt_z: -0.3,
                radius_factor: 1.5,
                angular_speed: 0.4,
                segments: 64,
            },
            100.0,
        )
    }

    #[test]
    fn points_stay_on_ring_radius() {
        let r = ring();
        let rot = SceneRotation::new(1.1, 0.2);
        let pts = r.points(3.0, rot);
        assert_eq!(pts.len(), 64);
        for p in pts {
            assert_close(p.length(), 150.0, 1e-9);
        }
        assert_close(r.dot_position(7.0, rot).length(), 150.0, 1e-9);
    }

    #[test]
    fn untilted_ring_lies_in_xz_plane() {
        let r = OrbitalRing {
            tilt_x: 0.0,
            tilt_z: 0.0,
            radius: 10.0,
            angular_speed: 0.0,
            segments: 4,
        };
        let pts = r.points(0.0, SceneRotation::default());
        for p in &pts {
            assert_close(p.y, 0.0, 1e-12);
        }
        assert_close(pts[0].x, 10.0, 1e-12);
        assert_close(pts[1].z, 10.0, 1e-12);
    }

    #[test]
    fn rotation_applies_yaw_then_pitch() {
        let rot = SceneRotation::new(std::f64::consts::FRAC_PI_2, 0.0);
        let p = rot.apply(Vec3::new(1.0, 0.0, 0.0));
        assert_close(p.z, -1.0, 1e-12);
    }

    #[test]
    fn segments_are_clamped() {
        let r = OrbitalRing::from_config(
            &RingConfig {
                tilt_x: 0.0,
                tilt_z: 0.0,
                radius_factor: 1.0,
                angular_speed: 0.0,
                segments: 1,
            },
            1.0,
        );
        assert_eq!(r.segments, 3);
    }
}
