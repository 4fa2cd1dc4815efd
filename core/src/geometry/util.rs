//! Utility functions.

use super::*;
use crate::pbrt::*;

/// Returns a direction (x, y, z) for spherical coordinates (θ, Ø).
///
/// * `sin_theta` - sin(θ).
/// * `cos_theta` - cos(θ).
/// * `phi`       - Ø.
#[inline]
pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    Vector3f::new(sin_theta * cos(phi), sin_theta * sin(phi), cos_theta)
}

/// Builds two vectors orthogonal to the unit vector `v1`, forming a
/// right-handed frame.
///
/// * `v1` - Unit vector.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if abs(v1.x) > abs(v1.y) {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn coordinate_system_is_orthonormal() {
        let v1 = Vector3f::new(0.3, -0.5, 0.8).normalize();
        let (v2, v3) = coordinate_system(&v1);
        assert!(approx_eq!(f32, v1.dot(&v2), 0.0, epsilon = 0.0001));
        assert!(approx_eq!(f32, v1.dot(&v3), 0.0, epsilon = 0.0001));
        assert!(approx_eq!(f32, v2.dot(&v3), 0.0, epsilon = 0.0001));
        assert!(approx_eq!(f32, v3.length(), 1.0, epsilon = 0.0001));
    }
}
