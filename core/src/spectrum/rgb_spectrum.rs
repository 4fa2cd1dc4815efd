//! RGB Spectrum.

use crate::pbrt::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Sub};

/// Number of spectral samples to use for `RGBSpectrum`.
pub const RGB_SAMPLES: usize = 3;

/// RGBSpectrum represents a spectral power distribution (SPD) with a weighted
/// sum of red, green and blue components.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RGBSpectrum {
    c: [Float; RGB_SAMPLES],
}

impl RGBSpectrum {
    /// Black.
    pub const ZERO: Self = Self { c: [0.0; RGB_SAMPLES] };

    /// Unit spectrum.
    pub const ONE: Self = Self { c: [1.0; RGB_SAMPLES] };

    /// Create a new `RGBSpectrum` with a constant value across all channels.
    ///
    /// * `v` - Constant value.
    pub fn new(v: Float) -> Self {
        let ret = Self { c: [v; RGB_SAMPLES] };
        debug_assert!(!ret.has_nans());
        ret
    }

    /// Create a new `RGBSpectrum` from red, green and blue values.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub fn from_rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Returns the channel values.
    pub fn to_rgb(&self) -> [Float; RGB_SAMPLES] {
        self.c
    }

    /// Returns true if every channel is zero.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|&v| v == 0.0)
    }

    /// Returns true if any channel is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns the luminance (y-coefficient of the XYZ colour).
    pub fn y(&self) -> Float {
        0.212671 * self.c[0] + 0.715160 * self.c[1] + 0.072169 * self.c[2]
    }

    /// Returns the largest channel value.
    pub fn max_component_value(&self) -> Float {
        self.c.iter().fold(-INFINITY, |m, &v| max(m, v))
    }

    /// Returns the channel-wise square root.
    pub fn sqrt(&self) -> Self {
        self.map(|v| v.sqrt())
    }

    /// Applies `f` to every channel.
    ///
    /// * `f` - The function.
    pub fn map<F: Fn(Float) -> Float>(&self, f: F) -> Self {
        Self {
            c: [f(self.c[0]), f(self.c[1]), f(self.c[2])],
        }
    }
}

impl Default for RGBSpectrum {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[Float; RGB_SAMPLES]> for RGBSpectrum {
    fn from(c: [Float; RGB_SAMPLES]) -> Self {
        Self { c }
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::from_rgb(self.c[0] + other.c[0], self.c[1] + other.c[1], self.c[2] + other.c[2])
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for RGBSpectrum {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::from_rgb(self.c[0] - other.c[0], self.c[1] - other.c[1], self.c[2] - other.c[2])
    }
}

impl Sub<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    fn sub(self, s: RGBSpectrum) -> RGBSpectrum {
        s.map(|v| self - v)
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self::from_rgb(self.c[0] * other.c[0], self.c[1] * other.c[1], self.c[2] * other.c[2])
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    fn mul(self, f: Float) -> Self::Output {
        self.map(|v| v * f)
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    fn mul(self, s: RGBSpectrum) -> RGBSpectrum {
        s * self
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div for RGBSpectrum {
    type Output = Self;

    /// Channel-wise division; channels divided by zero become zero.
    fn div(self, other: Self) -> Self::Output {
        let d = |a: Float, b: Float| if b != 0.0 { a / b } else { 0.0 };
        Self::from_rgb(
            d(self.c[0], other.c[0]),
            d(self.c[1], other.c[1]),
            d(self.c[2], other.c[2]),
        )
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.c[i]
    }
}

impl Clamp<Float> for RGBSpectrum {
    fn clamp(&self, low: Float, high: Float) -> Self {
        self.map(|v| clamp(v, low, high))
    }

    fn clamp_default(&self) -> Self {
        self.clamp(0.0, INFINITY)
    }
}

impl fmt::Display for RGBSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn clamp_default_is_non_negative(
            r in -10.0..10.0f32, g in -10.0..10.0f32, b in -10.0..10.0f32
        ) {
            let s = RGBSpectrum::from_rgb(r, g, b).clamp_default();
            for i in 0..RGB_SAMPLES {
                prop_assert!(s[i] >= 0.0);
            }
        }
    }

    #[test]
    fn is_black() {
        assert!(RGBSpectrum::ZERO.is_black());
        assert!(!RGBSpectrum::from_rgb(0.0, 0.1, 0.0).is_black());
    }

    #[test]
    fn div_by_zero_channel_is_zero() {
        let s = RGBSpectrum::from_rgb(1.0, 2.0, 3.0) / RGBSpectrum::from_rgb(0.0, 2.0, 1.0);
        assert_eq!(s, RGBSpectrum::from_rgb(0.0, 1.0, 3.0));
    }

    #[test]
    fn luminance_of_white_is_one() {
        assert!(float_cmp::approx_eq!(f32, RGBSpectrum::ONE.y(), 1.0, epsilon = 0.0001));
    }
}
