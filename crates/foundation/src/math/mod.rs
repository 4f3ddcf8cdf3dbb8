pub mod projection;
pub mod rotate;
pub mod spherical;
pub mod vec;

pub use projection::*;
pub use rotate::*;
pub use spherical::*;
pub use vec::*;
