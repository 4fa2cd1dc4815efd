//! 3-D normals

use super::common::*;
use super::Vector3f;
use crate::pbrt::*;
use std::ops::{Add, Mul, Neg};

/// A 3-D surface normal.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Normal3f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,

    /// Z-coordinate.
    pub z: Float,
}

impl Normal3f {
    /// Zero normal.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Creates a new 3-D normal.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Returns the normal's length.
    pub fn length(&self) -> Float {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Returns the unit normal.
    pub fn normalize(&self) -> Self {
        let inv = 1.0 / self.length();
        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }

    /// Returns the cross product with a vector.
    ///
    /// * `v` - The vector.
    pub fn cross(&self, v: &Vector3f) -> Vector3f {
        Vector3f::from(*self).cross(v)
    }
}

impl Dot<Normal3f> for Normal3f {
    fn dot(&self, other: &Normal3f) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl Dot<Vector3f> for Normal3f {
    fn dot(&self, other: &Vector3f) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl FaceForward<Vector3f> for Normal3f {}
impl FaceForward<Normal3f> for Normal3f {}

impl Add for Normal3f {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Mul<Normal3f> for Float {
    type Output = Normal3f;

    fn mul(self, n: Normal3f) -> Normal3f {
        Normal3f::new(self * n.x, self * n.y, self * n.z)
    }
}

impl Neg for Normal3f {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn face_forward_lands_in_hemisphere(
            x in -1.0..1.0f32, y in -1.0..1.0f32, z in -1.0..1.0f32,
            vz in prop_oneof![-1.0..-0.1f32, 0.1..1.0f32],
        ) {
            let n = Normal3f::new(x, y, z);
            let v = Vector3f::new(0.0, 0.0, vz);
            prop_assert!(n.face_forward(&v).dot(&v) >= 0.0);
        }
    }
}
