//! Spectrum

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;

/// The spectral representation used by all scattering functions.
pub type Spectrum = RGBSpectrum;
