//! Clamp

use super::{Float, INFINITY};
use num_traits::Num;

/// Clamps a value x to [min, max].
///
/// * `x`   - The number to clamp.
/// * `min` - Minimum value.
/// * `max` - Maximum value.
pub fn clamp<T>(x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Interface for saturating values into a valid range.
pub trait Clamp<T: Copy> {
    /// Clamps the values to given [low, high] interval.
    ///
    /// * `low`  - Low value.
    /// * `high` - High value.
    fn clamp(&self, low: T, high: T) -> Self;

    /// Clamps the values to the physically valid range [0, ∞).
    fn clamp_default(&self) -> Self;
}

impl Clamp<Float> for Float {
    fn clamp(&self, low: Float, high: Float) -> Self {
        clamp(*self, low, high)
    }

    fn clamp_default(&self) -> Self {
        clamp(*self, 0.0, INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_default_removes_negatives() {
        assert_eq!((-3.0 as Float).clamp_default(), 0.0);
        assert_eq!((2.5 as Float).clamp_default(), 2.5);
        assert_eq!(Float::INFINITY.clamp_default(), Float::INFINITY);
    }

    #[test]
    fn clamp_generic() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-1, 0, 3), 0);
        assert_eq!(clamp(2, 0, 3), 2);
    }
}
