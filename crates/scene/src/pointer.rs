use runtime::input::{PointerSample, Viewport};

/// Damped follower of the latest pointer sample.
///
/// `raw_*` is the target in normalized viewport units (`-1..1` inside the
/// viewport); `damped_*` eases towards it once per rendered frame.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct PointerState {
    pub raw_x: f64,
    pub raw_y: f64,
    pub damped_x: f64,
    pub damped_y: f64,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples outside the viewport map outside `[-1, 1]` and are kept as is.
    pub fn set_target(&mut self, sample: PointerSample, viewport: Viewport) {
        self.raw_x = sample.client_x / viewport.width * 2.0 - 1.0;
        self.raw_y = sample.client_y / viewport.height * 2.0 - 1.0;
    }

    pub fn damp(&mut self, factor: f64) {
        self.damped_x += (self.raw_x - self.damped_x) * factor;
        self.damped_y += (self.raw_y - self.damped_y) * factor;
    }
}

#[cfg(test)]
mod tests {
    use super::PointerState;
    use runtime::input::{PointerSample, Viewport};

    #[test]
    fn normalizes_to_viewport() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        let mut p = PointerState::new();
        p.set_target(PointerSample::new(0.0, 600.0), vp);
        assert_eq!((p.raw_x, p.raw_y), (-1.0, 1.0));
        p.set_target(PointerSample::new(400.0, 300.0), vp);
        assert_eq!((p.raw_x, p.raw_y), (0.0, 0.0));
    }

    #[test]
    fn offset_surface_center_is_neutral() {
        // An 800x600 surface placed at (200, 900) on the page.
        let vp = Viewport::new(800.0, 600.0, 1.0);
        let mut p = PointerState::new();
        p.set_target(PointerSample::new(600.0, 1200.0).relative_to(200.0, 900.0), vp);
        assert_eq!((p.raw_x, p.raw_y), (0.0, 0.0));
        p.set_target(PointerSample::new(1000.0, 1500.0).relative_to(200.0, 900.0), vp);
        assert_eq!((p.raw_x, p.raw_y), (1.0, 1.0));
    }

    #[test]
    fn outside_viewport_is_not_clamped() {
        let vp = Viewport::new(100.0, 100.0, 1.0);
        let mut p = PointerState::new();
        p.set_target(PointerSample::new(150.0, -50.0), vp);
        assert_eq!((p.raw_x, p.raw_y), (2.0, -2.0));
    }

    #[test]
    fn damping_converges_without_overshoot() {
        let mut p = PointerState {
            raw_x: 1.0,
            raw_y: -1.0,
            ..PointerState::default()
        };
        p.damp(0.5);
        assert_eq!((p.damped_x, p.damped_y), (0.5, -0.5));
        for _ in 0..200 {
            p.damp(0.05);
            assert!(p.damped_x <= 1.0);
        }
        assert!((p.damped_x - 1.0).abs() < 1e-3);
    }
}
