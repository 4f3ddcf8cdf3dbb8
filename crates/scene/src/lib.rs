pub mod config;
pub mod mesh;
pub mod node;
pub mod pointer;
pub mod ring;
pub mod stream;
pub mod world;

pub use config::{ConfigError, SceneConfig};
pub use mesh::{GeodesicMesh, build_geodesic_sphere};
pub use world::*;
