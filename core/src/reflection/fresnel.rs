//! Fresnel reflectance

use crate::pbrt::*;
use crate::spectrum::*;
use std::mem::swap;

/// Fraction of light reflected at an interface as a function of the cosine
/// of the incidence angle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Fresnel {
    /// Angle independent reflectance.
    Constant(Float),

    /// Unpolarized reflectance between two dielectrics.
    Dielectric(FresnelDielectric),
}

impl Fresnel {
    /// Dielectric interface with `eta_i` outside and `eta_t` inside.
    ///
    /// * `eta_i` - Index of refraction on the side the normal points to.
    /// * `eta_t` - Index of refraction on the opposite side.
    pub fn dielectric(eta_i: Float, eta_t: Float) -> Self {
        Self::Dielectric(FresnelDielectric { eta_i, eta_t })
    }

    /// Returns the reflected fraction per channel, each in [0, 1].
    ///
    /// * `cos_theta_i` - Cosine of the incidence angle; negative when the
    ///                   ray arrives from the inside.
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        match self {
            Self::Constant(r) => Spectrum::new(clamp(*r, 0.0, 1.0)),
            Self::Dielectric(f) => Spectrum::new(fr_dielectric(cos_theta_i, f.eta_i, f.eta_t)),
        }
    }
}

/// Indices of refraction on both sides of a dielectric boundary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FresnelDielectric {
    /// Index of refraction for exterior side of the surface.
    pub eta_i: Float,

    /// Index of refraction for interior side of the surface.
    pub eta_t: Float,
}

/// Returns the Fresnel reflectance of a dielectric boundary for unpolarized
/// light. Rays arriving from the inside (`cos_theta_i < 0`) see the indices
/// swapped, and total internal reflection returns 1.
///
/// * `cos_theta_i` - cos(θi) against the surface normal.
/// * `eta_i`       - Index of refraction on the side the normal points to.
/// * `eta_t`       - Index of refraction on the other side.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);
    let (mut eta_i, mut eta_t) = (eta_i, eta_t);

    if cos_theta_i <= 0.0 {
        swap(&mut eta_i, &mut eta_t);
        cos_theta_i = abs(cos_theta_i);
    }

    let sin_theta_i = safe_sqrt(1.0 - cos_theta_i * cos_theta_i);
    let sin_theta_t = eta_i / eta_t * sin_theta_i;
    if sin_theta_t >= 1.0 {
        return 1.0;
    }

    let cos_theta_t = safe_sqrt(1.0 - sin_theta_t * sin_theta_t);
    let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
        / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
        / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    let r = (r_parl * r_parl + r_perp * r_perp) / 2.0;

    // 0/0 when both cosines vanish at exact grazing incidence.
    if r.is_nan() {
        1.0
    } else {
        clamp(r, 0.0, 1.0)
    }
}

/// Schlick's approximation to Fresnel reflectance.
///
/// * `r0`        - Reflectance at normal incidence.
/// * `cos_theta` - Cosine of the incidence angle.
pub fn schlick_fresnel(r0: Spectrum, cos_theta: Float) -> Spectrum {
    r0 + pow5(1.0 - cos_theta) * (Spectrum::ONE - r0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normal_incidence_matches_closed_form(eta_i in 0.1..4.0f32, eta_t in 0.1..4.0f32) {
            let expected = ((eta_t - eta_i) / (eta_t + eta_i)).powi(2);
            let r = fr_dielectric(1.0, eta_i, eta_t);
            prop_assert!((r - expected).abs() < 1e-5, "{} vs {}", r, expected);
        }

        #[test]
        fn reflectance_in_unit_interval(
            cos in -1.0..=1.0f32, eta_i in 0.1..4.0f32, eta_t in 0.1..4.0f32
        ) {
            let r = fr_dielectric(cos, eta_i, eta_t);
            prop_assert!((0.0..=1.0).contains(&r), "{}", r);
        }

        #[test]
        fn exiting_swaps_indices(cos in 0.01..=1.0f32, eta in 1.01..3.0f32) {
            let a = fr_dielectric(-cos, 1.0, eta);
            let b = fr_dielectric(cos, eta, 1.0);
            prop_assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn air_to_glass_normal_incidence() {
        assert!(approx_eq!(f32, fr_dielectric(1.0, 1.0, 1.5), 0.04, epsilon = 0.0001));
    }

    #[test]
    fn air_to_glass_grazing() {
        assert!(fr_dielectric(1e-4, 1.0, 1.5) > 0.99);
        assert_eq!(fr_dielectric(0.0, 1.0, 1.5), 1.0);
    }

    #[test]
    fn total_internal_reflection() {
        // Inside glass beyond the critical angle (~41.8°).
        let cos = (60.0 as Float).to_radians().cos();
        assert_eq!(fr_dielectric(-cos, 1.0, 1.5), 1.0);
    }

    #[test]
    fn constant_ignores_angle() {
        let f = Fresnel::Constant(0.3);
        assert_eq!(f.evaluate(0.1), f.evaluate(0.9));
        assert_eq!(f.evaluate(0.5), Spectrum::new(0.3));
    }

    #[test]
    fn schlick_endpoints() {
        let r0 = Spectrum::new(0.04);
        assert_eq!(schlick_fresnel(r0, 1.0), r0);
        assert!(approx_eq!(f32, schlick_fresnel(r0, 0.0)[0], 1.0, epsilon = 0.00001));
    }
}
