pub mod event_bus;
pub mod frame;
pub mod input;
pub mod lifecycle;
pub mod metrics;

pub use event_bus::*;
pub use frame::*;
pub use input::*;
pub use lifecycle::*;
pub use metrics::*;
