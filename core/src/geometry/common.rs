//! Common

use crate::pbrt::*;

/// Dot product trait.
pub trait Dot<V> {
    /// Returns the dot product.
    ///
    /// * `other` - The other vector/normal.
    fn dot(&self, other: &V) -> Float;

    /// Returns the absolute value of dot product.
    ///
    /// * `other` - The other vector/normal.
    fn abs_dot(&self, other: &V) -> Float {
        abs(self.dot(other))
    }
}

/// FaceForward trait allows pointing vectors in the same hemisphere as
/// another normal/vector.
pub trait FaceForward<V>
where
    Self: Dot<V> + std::ops::Neg<Output = Self> + Sized + Copy,
{
    /// Returns `self` flipped if it lies in the opposite hemisphere of `other`.
    ///
    /// * `other` - The other vector.
    fn face_forward(&self, other: &V) -> Self {
        if self.dot(other) < 0.0 {
            -*self
        } else {
            *self
        }
    }
}
