use serde::Serialize;

/// Running min/max/sum over per-frame samples.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Histogram {
    pub count: u64,
    pub sum: u64,
    pub min: u64,
    pub max: u64,
}

impl Histogram {
    pub fn record(&mut self, value: u64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

/// Frame-loop counters.
///
/// Independent of wall-clock time so headless runs produce identical numbers.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoopMetrics {
    pub frames_rendered: u64,
    pub frames_skipped: u64,
    pub draw_commands: Histogram,
}

impl LoopMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_rendered(&mut self, draw_commands: u64) {
        self.frames_rendered += 1;
        self.draw_commands.record(draw_commands);
    }

    pub fn record_skipped(&mut self) {
        self.frames_skipped += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{Histogram, LoopMetrics};

    #[test]
    fn histogram_tracks_min_max_sum_count() {
        let mut h = Histogram::default();
        assert_eq!(h.mean(), None);
        h.record(5);
        h.record(2);
        h.record(8);
        assert_eq!(h.count, 3);
        assert_eq!(h.sum, 15);
        assert_eq!(h.min, 2);
        assert_eq!(h.max, 8);
        assert_eq!(h.mean(), Some(5.0));
    }

    #[test]
    fn loop_metrics_split_rendered_and_skipped() {
        let mut m = LoopMetrics::new();
        m.record_rendered(120);
        m.record_skipped();
        m.record_rendered(80);
        assert_eq!(m.frames_rendered, 2);
        assert_eq!(m.frames_skipped, 1);
        assert_eq!(m.draw_commands.max, 120);
    }
}
