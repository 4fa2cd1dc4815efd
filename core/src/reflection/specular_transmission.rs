//! Specular Transmission

use super::*;
use crate::material::TransportMode;

/// Ideal refraction through a dielectric boundary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpecularTransmission {
    /// Scales the transmitted colour.
    t: Spectrum,

    /// Index of refraction above the surface (normal side).
    eta_a: Float,

    /// Index of refraction below the surface.
    eta_b: Float,

    /// Fresnel term for the same boundary.
    fresnel: Fresnel,

    mode: TransportMode,
}

impl SpecularTransmission {
    /// Create a new instance of `SpecularTransmission`.
    ///
    /// * `t`     - Spectrum used to scale the transmitted colour.
    /// * `eta_a` - Index of refraction above the surface.
    /// * `eta_b` - Index of refraction below the surface.
    /// * `mode`  - Transport mode.
    pub fn new(t: Spectrum, eta_a: Float, eta_b: Float, mode: TransportMode) -> Self {
        Self {
            t,
            eta_a,
            eta_b,
            fresnel: Fresnel::dielectric(eta_a, eta_b),
            mode,
        }
    }

    pub fn get_type(&self) -> BxDFType {
        BxDFType::TRANSMISSION | BxDFType::SPECULAR
    }

    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Refracts `wo`; fails under total internal reflection.
    ///
    /// * `wo` - Outgoing direction.
    pub fn sample_f(&self, wo: &Vector3f) -> BxDFSample {
        let (eta_i, eta_t) = if cos_theta(wo) > 0.0 {
            (self.eta_a, self.eta_b)
        } else {
            (self.eta_b, self.eta_a)
        };

        let n = Normal3f::new(0.0, 0.0, 1.0).face_forward(wo);
        match refract(wo, &n, eta_i / eta_t) {
            Some(wi) => {
                let mut ft = self.t * (Spectrum::ONE - self.fresnel.evaluate(cos_theta(&wi)));
                if self.mode == TransportMode::Radiance {
                    ft *= (eta_i * eta_i) / (eta_t * eta_t);
                }
                BxDFSample::new(ft / abs_cos_theta(&wi), 1.0, wi, self.get_type())
            }
            None => BxDFSample::from(self.get_type()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn radiance_is_compressed_entering_denser_medium() {
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let radiance = SpecularTransmission::new(Spectrum::ONE, 1.0, 1.5, TransportMode::Radiance);
        let importance = SpecularTransmission::new(Spectrum::ONE, 1.0, 1.5, TransportMode::Importance);

        let r = radiance.sample_f(&wo);
        let i = importance.sample_f(&wo);
        assert_eq!(r.wi, Vector3f::new(0.0, 0.0, -1.0));
        assert!(approx_eq!(f32, i.weight()[0], 0.96, epsilon = 0.0001));
        assert!(approx_eq!(f32, r.weight()[0], 0.96 / 2.25, epsilon = 0.0001));
    }

    #[test]
    fn total_internal_reflection_fails() {
        let wo = Vector3f::new(0.9, 0.0, -0.3).normalize();
        let lobe = SpecularTransmission::new(Spectrum::ONE, 1.0, 1.5, TransportMode::Radiance);
        assert!(!lobe.sample_f(&wo).is_valid());
    }
}
