use foundation::time::Time;

/// Viewport widths below this are treated as touch/mobile devices.
pub const MOBILE_MAX_WIDTH_PX: f64 = 768.0;

/// Coarse device class used to pick the animation step and entity counts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn from_viewport_width(width_px: f64) -> Self {
        if width_px < MOBILE_MAX_WIDTH_PX {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Deterministic frame metadata.
///
/// `time` is the scene's animation time at the start of the frame. It is a
/// free-running counter, not a wall-clock reading.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based index of rendered frames.
    pub index: u64,
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, time: Time) -> Self {
        Self { index, time }
    }
}

/// Fixed-step animation clock.
///
/// Only rendered frames advance it; hidden frames leave it untouched, so the
/// scene resumes from where it stopped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SimClock {
    step: f64,
    next: Frame,
}

impl SimClock {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            next: Frame::new(0, Time(0.0)),
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }

    /// Returns the frame to render and advances the clock.
    pub fn tick(&mut self) -> Frame {
        let frame = self.next;
        self.next = Frame::new(frame.index + 1, frame.time.advance(self.step));
        frame
    }

    /// The frame the next [`SimClock::tick`] will return.
    pub fn peek(&self) -> Frame {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::{DeviceClass, Frame, SimClock};
    use foundation::time::Time;

    #[test]
    fn clock_is_deterministic() {
        let mut a = SimClock::new(0.5);
        let mut b = SimClock::new(0.5);
        for _ in 0..10 {
            assert_eq!(a.tick(), b.tick());
        }
        assert_eq!(a.peek(), Frame::new(10, Time(5.0)));
    }

    #[test]
    fn tick_advances_index_and_time() {
        let mut clock = SimClock::new(0.25);
        assert_eq!(clock.tick(), Frame::new(0, Time(0.0)));
        assert_eq!(clock.tick(), Frame::new(1, Time(0.25)));
    }

    #[test]
    fn device_class_threshold() {
        assert_eq!(DeviceClass::from_viewport_width(375.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(768.0), DeviceClass::Desktop);
    }
}
