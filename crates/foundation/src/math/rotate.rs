use super::Vec3;

/// Right-handed rotation about the X axis.
pub fn rotate_x(p: Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(p.x, p.y * c - p.z * s, p.y * s + p.z * c)
}

/// Right-handed rotation about the Y axis.
pub fn rotate_y(p: Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(p.x * c + p.z * s, p.y, -p.x * s + p.z * c)
}

/// Right-handed rotation about the Z axis.
pub fn rotate_z(p: Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(p.x * c - p.y * s, p.x * s + p.y * c, p.z)
}

/// Scales `p` so its length equals `target_radius`.
///
/// Returns `None` for a zero-length (or non-finite) input so callers can skip
/// the point for the current frame.
pub fn normalize(p: Vec3, target_radius: f64) -> Option<Vec3> {
    let len = p.length();
    if len > 0.0 && len.is_finite() {
        Some(p.scale(target_radius / len))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, rotate_x, rotate_y, rotate_z};
    use crate::math::Vec3;
    use std::f64::consts::FRAC_PI_2;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        let diff = (a - b).length();
        assert!(diff <= eps, "expected {a:?} ~= {b:?} (diff {diff})");
    }

    #[test]
    fn rotate_y_quarter_turn() {
        let p = rotate_y(Vec3::new(1.0, 0.0, 0.0), FRAC_PI_2);
        assert_vec_close(p, Vec3::new(0.0, 0.0, -1.0), 1e-9);
    }

    #[test]
    fn rotate_x_quarter_turn() {
        let p = rotate_x(Vec3::new(0.0, 1.0, 0.0), FRAC_PI_2);
        assert_vec_close(p, Vec3::new(0.0, 0.0, 1.0), 1e-9);
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let p = rotate_z(Vec3::new(1.0, 0.0, 0.0), FRAC_PI_2);
        assert_vec_close(p, Vec3::new(0.0, 1.0, 0.0), 1e-9);
    }

    #[test]
    fn rotations_preserve_length() {
        let p = Vec3::new(3.0, -4.0, 12.0);
        for angle in [0.3, 1.7, -2.9] {
            assert!((rotate_x(p, angle).length() - 13.0).abs() < 1e-9);
            assert!((rotate_y(p, angle).length() - 13.0).abs() < 1e-9);
            assert!((rotate_z(p, angle).length() - 13.0).abs() < 1e-9);
        }
    }

    #[test]
    fn normalize_scales_to_radius() {
        let p = normalize(Vec3::new(0.0, 3.0, 4.0), 10.0).unwrap();
        assert_vec_close(p, Vec3::new(0.0, 6.0, 8.0), 1e-12);
    }

    #[test]
    fn normalize_zero_vector_is_none() {
        assert_eq!(normalize(Vec3::ZERO, 1.0), None);
    }
}
