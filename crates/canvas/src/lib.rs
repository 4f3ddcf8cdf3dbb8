pub mod recorder;
pub mod renderer;
pub mod surface;

pub use recorder::{DrawCommand, Recorder};
pub use renderer::{DrawStats, FrameRenderer};
pub use surface::*;
