use super::{Vec2, Vec3};

/// Screen-space result of [`project`].
///
/// `scale` drives size and line-width falloff; `depth` is the camera-space z
/// used for opacity heuristics.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub depth: f64,
}

impl ProjectedPoint {
    pub fn screen(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn distance_to(self, other: Self) -> f64 {
        self.screen().distance(other.screen())
    }
}

/// Pinhole projection with a fixed focal length.
///
/// Positive z points away from the viewer, so nearer points get a larger
/// `scale`. Callers keep `focal_length + p.z > 0`.
pub fn project(p: Vec3, center_x: f64, center_y: f64, focal_length: f64) -> ProjectedPoint {
    let scale = focal_length / (focal_length + p.z);
    ProjectedPoint {
        x: p.x * scale + center_x,
        y: p.y * scale + center_y,
        scale,
        depth: p.z,
    }
}

#[cfg(test)]
mod tests {
    use super::project;
    use crate::math::Vec3;

    #[test]
    fn origin_projects_to_center() {
        let p = project(Vec3::ZERO, 320.0, 240.0, 600.0);
        assert_eq!((p.x, p.y, p.scale, p.depth), (320.0, 240.0, 1.0, 0.0));
    }

    #[test]
    fn closer_points_render_larger() {
        let near = project(Vec3::new(10.0, 10.0, -50.0), 0.0, 0.0, 600.0);
        let far = project(Vec3::new(10.0, 10.0, 50.0), 0.0, 0.0, 600.0);
        assert!(near.scale > far.scale);
        assert!(near.x > far.x);
    }

    #[test]
    fn screen_distance() {
        let a = project(Vec3::new(0.0, 0.0, 0.0), 0.0, 0.0, 100.0);
        let b = project(Vec3::new(3.0, 4.0, 0.0), 0.0, 0.0, 100.0);
        assert_eq!(a.distance_to(b), 5.0);
    }
}
