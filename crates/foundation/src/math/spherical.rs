use super::Vec3;

/// Latitude/longitude on a sphere of fixed radius (radians).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spherical {
    pub lat_rad: f64,
    pub lng_rad: f64,
}

impl Spherical {
    pub fn new(lat_rad: f64, lng_rad: f64) -> Self {
        Self { lat_rad, lng_rad }
    }

    pub fn to_cartesian(self, radius: f64) -> Vec3 {
        spherical_to_cartesian(self.lat_rad, self.lng_rad, radius)
    }
}

/// Y is up; longitude 0 lies on +X and increases towards +Z.
pub fn spherical_to_cartesian(lat_rad: f64, lng_rad: f64, radius: f64) -> Vec3 {
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lng, cos_lng) = lng_rad.sin_cos();
    Vec3::new(
        radius * cos_lat * cos_lng,
        radius * sin_lat,
        radius * cos_lat * sin_lng,
    )
}
