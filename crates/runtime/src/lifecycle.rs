use tracing::{debug, info};

use crate::event_bus::{EventBus, EventKind};
use crate::frame::{Frame, SimClock};
use crate::metrics::LoopMetrics;

/// Frame loop lifecycle.
///
/// `Idle -> Running <-> Hidden -> Cancelled`. `Cancelled` is terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Hidden,
    Cancelled,
}

/// What the host should do with the current animation callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TickOutcome {
    /// Update the scene and draw this frame, then reschedule.
    Render(Frame),
    /// Document is hidden: do no work but keep the callback scheduled.
    Skip,
    /// The loop is not running; do not reschedule.
    Stopped,
}

impl TickOutcome {
    pub fn reschedule(&self) -> bool {
        !matches!(self, TickOutcome::Stopped)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopError {
    AlreadyMounted,
    Cancelled,
}

impl std::fmt::Display for LoopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopError::AlreadyMounted => write!(f, "frame loop is already mounted"),
            LoopError::Cancelled => write!(f, "frame loop was cancelled and cannot restart"),
        }
    }
}

impl std::error::Error for LoopError {}

/// Host-independent state of the recurring animation callback.
///
/// The host owns the actual platform callback; it asks [`FrameLoop::tick`]
/// what to do on every invocation.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    clock: SimClock,
    bus: EventBus,
    metrics: LoopMetrics,
}

impl FrameLoop {
    pub fn new(time_step: f64) -> Self {
        Self {
            state: LoopState::Idle,
            clock: SimClock::new(time_step),
            bus: EventBus::new(),
            metrics: LoopMetrics::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// True while the host should keep a callback pending.
    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, LoopState::Running | LoopState::Hidden)
    }

    pub fn mount(&mut self) -> Result<(), LoopError> {
        match self.state {
            LoopState::Idle => {
                self.state = LoopState::Running;
                let index = self.clock.peek().index;
                self.bus.emit(index, EventKind::Mounted, "frame loop started");
                info!(step = self.clock.step(), "frame loop mounted");
                Ok(())
            }
            LoopState::Running | LoopState::Hidden => Err(LoopError::AlreadyMounted),
            LoopState::Cancelled => Err(LoopError::Cancelled),
        }
    }

    /// Called at the top of every animation callback.
    pub fn tick(&mut self, visible: bool) -> TickOutcome {
        let index = self.clock.peek().index;
        match (self.state, visible) {
            (LoopState::Idle | LoopState::Cancelled, _) => TickOutcome::Stopped,
            (LoopState::Running, false) => {
                self.state = LoopState::Hidden;
                self.bus.emit(index, EventKind::Hidden, "document hidden");
                debug!(frame = index, "frame loop hidden");
                self.metrics.record_skipped();
                TickOutcome::Skip
            }
            (LoopState::Hidden, false) => {
                self.metrics.record_skipped();
                TickOutcome::Skip
            }
            (LoopState::Hidden, true) => {
                self.state = LoopState::Running;
                self.bus.emit(index, EventKind::Resumed, "document visible");
                debug!(frame = index, "frame loop resumed");
                TickOutcome::Render(self.clock.tick())
            }
            (LoopState::Running, true) => TickOutcome::Render(self.clock.tick()),
        }
    }

    /// Records the draw work done for a rendered frame.
    pub fn finish_frame(&mut self, draw_commands: u64) {
        self.metrics.record_rendered(draw_commands);
    }

    pub fn notify_resize(&mut self, width: f64, height: f64, time_step: f64) {
        if self.state == LoopState::Cancelled {
            return;
        }
        self.clock.set_step(time_step);
        let index = self.clock.peek().index;
        self.bus
            .emit(index, EventKind::Resized, format!("{width}x{height}"));
        debug!(width, height, time_step, "viewport resized");
    }

    /// Returns `true` if the loop was active and a pending callback must be
    /// cancelled by the host.
    pub fn unmount(&mut self) -> bool {
        let was_scheduled = self.is_scheduled();
        if self.state != LoopState::Cancelled {
            self.state = LoopState::Cancelled;
            let index = self.clock.peek().index;
            self.bus
                .emit(index, EventKind::Cancelled, "frame loop cancelled");
            info!(
                frames_rendered = self.metrics.frames_rendered,
                frames_skipped = self.metrics.frames_skipped,
                "frame loop unmounted"
            );
        }
        was_scheduled
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn metrics(&self) -> &LoopMetrics {
        &self.metrics
    }

    pub fn time_step(&self) -> f64 {
        self.clock.step()
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameLoop, LoopError, LoopState, TickOutcome};
    use crate::event_bus::{DEFAULT_EVENT_CAPACITY, EventKind};
    use crate::frame::Frame;
    use foundation::time::Time;
    use pretty_assertions::assert_eq;

    #[test]
    fn idle_loop_does_not_render() {
        let mut lp = FrameLoop::new(0.01);
        assert_eq!(lp.tick(true), TickOutcome::Stopped);
        assert!(!lp.is_scheduled());
    }

    #[test]
    fn mount_then_render() {
        let mut lp = FrameLoop::new(0.5);
        lp.mount().unwrap();
        assert_eq!(lp.state(), LoopState::Running);
        assert_eq!(lp.tick(true), TickOutcome::Render(Frame::new(0, Time(0.0))));
        assert_eq!(lp.tick(true), TickOutcome::Render(Frame::new(1, Time(0.5))));
    }

    #[test]
    fn hidden_skips_but_stays_scheduled() {
        let mut lp = FrameLoop::new(1.0);
        lp.mount().unwrap();
        lp.tick(true);
        let outcome = lp.tick(false);
        assert_eq!(outcome, TickOutcome::Skip);
        assert!(outcome.reschedule());
        assert_eq!(lp.state(), LoopState::Hidden);
        assert_eq!(lp.tick(false), TickOutcome::Skip);

        // Hidden frames do not advance animation time.
        assert_eq!(lp.tick(true), TickOutcome::Render(Frame::new(1, Time(1.0))));
        assert_eq!(lp.state(), LoopState::Running);
        assert_eq!(lp.metrics().frames_skipped, 2);
    }

    #[test]
    fn unmount_cancels_and_is_terminal() {
        let mut lp = FrameLoop::new(1.0);
        lp.mount().unwrap();
        assert!(lp.unmount());
        assert_eq!(lp.state(), LoopState::Cancelled);
        assert_eq!(lp.tick(true), TickOutcome::Stopped);
        assert!(!lp.unmount());
        assert_eq!(lp.mount(), Err(LoopError::Cancelled));
    }

    #[test]
    fn double_mount_is_rejected() {
        let mut lp = FrameLoop::new(1.0);
        lp.mount().unwrap();
        assert_eq!(lp.mount(), Err(LoopError::AlreadyMounted));
    }

    #[test]
    fn transitions_are_traced() {
        let mut lp = FrameLoop::new(1.0);
        lp.mount().unwrap();
        lp.tick(true);
        lp.tick(false);
        lp.tick(true);
        lp.notify_resize(800.0, 600.0, 0.5);
        lp.unmount();
        assert_eq!(
            lp.events().kinds(),
            vec![
                EventKind::Mounted,
                EventKind::Hidden,
                EventKind::Resumed,
                EventKind::Resized,
                EventKind::Cancelled,
            ]
        );
        assert_eq!(lp.time_step(), 0.5);
    }

    #[test]
    fn long_session_keeps_trace_bounded() {
        let mut lp = FrameLoop::new(1.0);
        lp.mount().unwrap();
        for i in 0..10_000 {
            lp.notify_resize(800.0 + i as f64, 600.0, 1.0);
            lp.tick(false);
            lp.tick(true);
        }
        assert_eq!(lp.events().len(), DEFAULT_EVENT_CAPACITY);
        assert_eq!(lp.events().dropped(), 30_001 - DEFAULT_EVENT_CAPACITY as u64);
        assert_eq!(lp.events().kinds().last(), Some(&EventKind::Resumed));
    }
}
