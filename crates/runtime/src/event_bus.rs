use std::collections::VecDeque;

/// What happened to the frame loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    Mounted,
    Hidden,
    Resumed,
    Resized,
    Cancelled,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Mounted => "mounted",
            EventKind::Hidden => "hidden",
            EventKind::Resumed => "resumed",
            EventKind::Resized => "resized",
            EventKind::Cancelled => "cancelled",
        }
    }
}

/// A lifecycle event, stamped with the index of the next frame to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub message: String,
}

/// Most events a bus keeps before dropping the oldest.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Bounded trace of lifecycle transitions. Once full, the oldest event is
/// dropped for each new one.
#[derive(Debug)]
pub struct EventBus {
    events: VecDeque<Event>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn emit(&mut self, frame_index: u64, kind: EventKind, message: impl Into<String>) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(Event {
            frame_index,
            kind,
            message: message.into(),
        });
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events evicted since the bus was created.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(|e| e.kind).collect()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, EventKind};

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        bus.emit(2, EventKind::Hidden, "document hidden");
        assert_eq!(bus.len(), 1);
        let event = bus.events().next().unwrap();
        assert_eq!(event.frame_index, 2);
        assert_eq!(event.kind.as_str(), "hidden");
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(0, EventKind::Mounted, "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn full_bus_drops_oldest() {
        let mut bus = EventBus::with_capacity(3);
        for i in 0..5 {
            bus.emit(i, EventKind::Resized, format!("{i}"));
        }
        assert_eq!(bus.len(), 3);
        assert_eq!(bus.dropped(), 2);
        let frames: Vec<u64> = bus.events().map(|e| e.frame_index).collect();
        assert_eq!(frames, vec![2, 3, 4]);
    }
}
