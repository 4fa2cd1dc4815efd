//! Shading-space trigonometry.
//!
//! Directions passed to BxDFs live in the local shading frame where the
//! shading normal is +z, so every angle below is read off the components.

use crate::geometry::*;
use crate::pbrt::*;

#[inline]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

#[inline]
pub fn cos_2_theta(w: &Vector3f) -> Float {
    w.z * w.z
}

#[inline]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.z)
}

#[inline]
pub fn sin_2_theta(w: &Vector3f) -> Float {
    max(0.0, 1.0 - cos_2_theta(w))
}

#[inline]
pub fn sin_theta(w: &Vector3f) -> Float {
    sin_2_theta(w).sqrt()
}

#[inline]
pub fn tan_theta(w: &Vector3f) -> Float {
    sin_theta(w) / cos_theta(w)
}

/// Returns tan²(θ); infinite for directions in the tangent plane.
#[inline]
pub fn tan_2_theta(w: &Vector3f) -> Float {
    sin_2_theta(w) / cos_2_theta(w)
}

/// Returns cos(Φ) of the direction projected to the xy plane; 1 when the
/// direction is the pole.
#[inline]
pub fn cos_phi(w: &Vector3f) -> Float {
    let s = sin_theta(w);
    if s == 0.0 {
        1.0
    } else {
        clamp(w.x / s, -1.0, 1.0)
    }
}

/// Returns sin(Φ) of the direction projected to the xy plane.
#[inline]
pub fn sin_phi(w: &Vector3f) -> Float {
    let s = sin_theta(w);
    if s == 0.0 {
        0.0
    } else {
        clamp(w.y / s, -1.0, 1.0)
    }
}

#[inline]
pub fn cos_2_phi(w: &Vector3f) -> Float {
    let c = cos_phi(w);
    c * c
}

#[inline]
pub fn sin_2_phi(w: &Vector3f) -> Float {
    let s = sin_phi(w);
    s * s
}

/// Returns the cosine of the azimuthal difference ΔΦ between two directions.
///
/// * `wa` - First direction.
/// * `wb` - Second direction.
pub fn cos_d_phi(wa: &Vector3f, wb: &Vector3f) -> Float {
    let waxy = wa.x * wa.x + wa.y * wa.y;
    let wbxy = wb.x * wb.x + wb.y * wb.y;
    if waxy == 0.0 || wbxy == 0.0 {
        1.0
    } else {
        clamp((wa.x * wb.x + wa.y * wb.y) / (waxy * wbxy).sqrt(), -1.0, 1.0)
    }
}

/// Returns `true` if two directions lie strictly on the same side of the
/// shading plane.
#[inline]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

/// Mirrors `wo` about `n`.
///
/// * `wo` - Outgoing direction.
/// * `n`  - Normal to reflect about.
#[inline]
pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    -*wo + 2.0 * wo.dot(n) * *n
}

/// Refracts `wi` through a surface with normal `n` (on the same side as
/// `wi`) by Snell's law. Returns `None` under total internal reflection.
///
/// * `wi`  - Incident direction.
/// * `n`   - Surface normal.
/// * `eta` - Ratio of incident to transmitted indices of refraction.
pub fn refract(wi: &Vector3f, n: &Normal3f, eta: Float) -> Option<Vector3f> {
    let cos_theta_i = n.dot(wi);
    let sin_2_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i);
    let sin_2_theta_t = eta * eta * sin_2_theta_i;

    if sin_2_theta_t >= 1.0 {
        None
    } else {
        let cos_theta_t = (1.0 - sin_2_theta_t).sqrt();
        Some(eta * -*wi + (eta * cos_theta_i - cos_theta_t) * Vector3f::from(*n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn reflect_about_z() {
        let wo = Vector3f::new(0.3, -0.4, 0.5).normalize();
        let wr = reflect(&wo, &Vector3f::new(0.0, 0.0, 1.0));
        assert!(approx_eq!(f32, wr.x, -wo.x, epsilon = 0.00001));
        assert!(approx_eq!(f32, wr.y, -wo.y, epsilon = 0.00001));
        assert!(approx_eq!(f32, wr.z, wo.z, epsilon = 0.00001));
    }

    #[test]
    fn refract_obeys_snell() {
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let eta = 1.0 / 1.5;
        let wt = refract(&wi, &Normal3f::new(0.0, 0.0, 1.0), eta).unwrap();
        assert!(approx_eq!(f32, sin_theta(&wt), eta * sin_theta(&wi), epsilon = 0.0001));
        assert!(wt.z < 0.0);
    }

    #[test]
    fn refract_total_internal_reflection() {
        let wi = Vector3f::new(0.9, 0.0, 0.43589).normalize();
        assert!(refract(&wi, &Normal3f::new(0.0, 0.0, 1.0), 1.5).is_none());
    }

    #[test]
    fn cos_d_phi_of_pole_is_one() {
        let a = Vector3f::new(0.0, 0.0, 1.0);
        let b = Vector3f::new(0.5, 0.5, 0.7);
        assert_eq!(cos_d_phi(&a, &b), 1.0);
    }
}
