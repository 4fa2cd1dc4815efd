//! Numeric basics shared by every scattering module.

mod clamp;
mod common;

// Re-export
pub use clamp::*;
pub use common::*;
