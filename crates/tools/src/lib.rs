pub mod headless;
pub mod svg;

pub use headless::{HeadlessError, HeadlessRun, MeshStats, RunOptions, mesh_stats, run};
pub use svg::SvgSurface;
