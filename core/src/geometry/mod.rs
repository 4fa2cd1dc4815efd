//! Geometry

mod common;
mod normal;
mod point;
mod util;
mod vector3;

// Re-export
pub use common::*;
pub use normal::*;
pub use point::*;
pub use util::*;
pub use vector3::*;
