//! Subsurface Scattering
//!
//! A photon beam diffusion profile is tabulated once per material over
//! single-scattering albedo and optical radius. `TabulatedBSSRDF` then
//! evaluates and samples that profile at a specific surface point.

use crate::geometry::*;
use crate::interpolation::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::spectrum::*;

mod beam_diffusion;
mod table;
mod tabulated;

// Re-export
pub use beam_diffusion::*;
pub use table::*;
pub use tabulated::*;

/// First moment of the dielectric Fresnel reflectance (polynomial fit).
///
/// * `eta` - Relative index of refraction.
pub fn fresnel_moment_1(eta: Float) -> Float {
    let eta2 = eta * eta;
    let eta3 = eta2 * eta;
    let eta4 = eta3 * eta;
    let eta5 = eta4 * eta;
    if eta < 1.0 {
        0.45966 - 1.73965 * eta + 3.37668 * eta2 - 3.904945 * eta3 + 2.49277 * eta4
            - 0.68441 * eta5
    } else {
        -4.61686 + 11.1136 * eta - 10.4646 * eta2 + 5.11455 * eta3 - 1.27198 * eta4
            + 0.12746 * eta5
    }
}

/// Second moment of the dielectric Fresnel reflectance (polynomial fit).
///
/// * `eta` - Relative index of refraction.
pub fn fresnel_moment_2(eta: Float) -> Float {
    let eta2 = eta * eta;
    let eta3 = eta2 * eta;
    let eta4 = eta3 * eta;
    let eta5 = eta4 * eta;
    if eta < 1.0 {
        0.27614 - 0.87350 * eta + 1.12077 * eta2 - 0.65095 * eta3 + 0.07883 * eta4
            + 0.04860 * eta5
    } else {
        let r_eta = 1.0 / eta;
        let r_eta2 = r_eta * r_eta;
        let r_eta3 = r_eta2 * r_eta;
        -547.033 + 45.3087 * r_eta3 - 218.725 * r_eta2 + 458.843 * r_eta + 404.557 * eta
            - 189.519 * eta2
            + 54.9327 * eta3
            - 9.00603 * eta4
            + 0.63942 * eta5
    }
}

/// Henyey-Greenstein phase function.
///
/// * `cos_theta` - Cosine of the angle between the two directions.
/// * `g`         - Asymmetry parameter in (-1, 1).
pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom = 1.0 + g * g + 2.0 * g * cos_theta;
    INV_FOUR_PI * (1.0 - g * g) / (denom * denom.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn isotropic_phase_is_uniform() {
        assert!(approx_eq!(f32, phase_hg(0.3, 0.0), INV_FOUR_PI, epsilon = 1e-7));
        assert!(approx_eq!(f32, phase_hg(-0.9, 0.0), INV_FOUR_PI, epsilon = 1e-7));
    }

    #[test]
    fn phase_integrates_to_one() {
        let g = 0.6;
        let n = 4096;
        let sum: Float = (0..n)
            .map(|i| {
                let mu = -1.0 + 2.0 * (i as Float + 0.5) / n as Float;
                phase_hg(mu, g) * TWO_PI * 2.0 / n as Float
            })
            .sum();
        assert!((sum - 1.0).abs() < 1e-3, "{}", sum);
    }

    #[test]
    fn fresnel_moments_are_small_near_index_matched() {
        assert!(fresnel_moment_1(1.0).abs() < 0.01);
        assert!(fresnel_moment_2(1.0).abs() < 0.01);
        assert!(fresnel_moment_1(1.33) > 0.0);
    }
}
