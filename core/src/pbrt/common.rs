//! Common

use num_traits::Num;
use std::ops::{Mul, Neg};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 1/2*PI (1/2π)
pub const INV_TWO_PI: Float = 1.0 / TWO_PI;

/// 1/4*PI (1/4π)
pub const INV_FOUR_PI: Float = 1.0 / (4.0 * PI);

/// Largest representable float strictly below 1.
pub const ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Bisects a procedurally defined sorted sequence. Returns the index `i` in
/// `[0, size - 2]` such that `pred(i)` is true and `pred(i + 1)` is false.
///
/// * `size` - Number of entries.
/// * `pred` - Predicate evaluated at an index.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    let (mut first, mut len) = (0_usize, size);

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    let hi = size.max(2) as isize - 2;
    (first as isize - 1).clamp(0, hi) as usize
}

/// Return the cosine of an angle.
///
/// * `theta` - The angle in radians.
#[inline(always)]
pub fn cos(theta: Float) -> Float {
    theta.cos()
}

/// Return the sine of an angle.
///
/// * `theta` - The angle in radians.
#[inline(always)]
pub fn sin(theta: Float) -> Float {
    theta.sin()
}

/// Computes the four quadrant arctangent of `y/x`.
///
/// * `y` - Proportion of y-coordinate.
/// * `x` - Proportion of x-coordinate.
#[inline(always)]
pub fn atan2(y: Float, x: Float) -> Float {
    y.atan2(x)
}

/// Returns `v^5`.
///
/// * `v` - The value.
#[inline(always)]
pub fn pow5<T: Mul<T, Output = T> + Copy>(v: T) -> T {
    (v * v) * (v * v) * v
}

/// Square root that treats small negative round-off as zero.
#[inline(always)]
pub fn safe_sqrt(x: Float) -> Float {
    max(0.0, x).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_interval_brackets_value() {
        let xs = [0.0, 1.0, 2.0, 4.0, 8.0];
        assert_eq!(find_interval(xs.len(), |i| xs[i] <= 3.0), 2);
        assert_eq!(find_interval(xs.len(), |i| xs[i] <= 0.5), 0);
        assert_eq!(find_interval(xs.len(), |i| xs[i] <= -1.0), 0);
        assert_eq!(find_interval(xs.len(), |i| xs[i] <= 100.0), 3);
    }

    #[test]
    fn one_minus_epsilon_is_below_one() {
        assert!(ONE_MINUS_EPSILON < 1.0);
        assert!(ONE_MINUS_EPSILON > 0.9999);
    }
}
