/// Animation time in scene units.
///
/// Advanced by a fixed step per rendered frame rather than by wall-clock
/// deltas. Only its trigonometric image matters, so it grows unbounded.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub fn advance(self, step: f64) -> Self {
        Time(self.0 + step)
    }

    /// Fractional part in `[0, 1)`, used for looping effects.
    pub fn cycle(self, rate: f64, offset: f64) -> f64 {
        (self.0 * rate + offset).rem_euclid(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn advance_and_cycle() {
        let t = Time(0.0).advance(0.25).advance(0.5);
        assert_eq!(t, Time(0.75));
        assert_eq!(t.cycle(1.0, 0.5), 0.25);
        assert_eq!(Time(-0.25).cycle(1.0, 0.0), 0.75);
    }
}
