//! Microfacet Transmission

use super::*;
use crate::material::TransportMode;

/// Rough refraction (Walter et al.) through a dielectric boundary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MicrofacetTransmission {
    t: Spectrum,
    distribution: MicrofacetDistribution,
    eta_a: Float,
    eta_b: Float,
    fresnel: Fresnel,
    mode: TransportMode,
}

impl MicrofacetTransmission {
    /// Create a new instance of `MicrofacetTransmission`.
    ///
    /// * `t`            - Spectrum used to scale the transmitted colour.
    /// * `distribution` - Microfacet distribution.
    /// * `eta_a`        - Index of refraction above the surface.
    /// * `eta_b`        - Index of refraction below the surface.
    /// * `mode`         - Transport mode.
    pub fn new(
        t: Spectrum,
        distribution: MicrofacetDistribution,
        eta_a: Float,
        eta_b: Float,
        mode: TransportMode,
    ) -> Self {
        Self {
            t,
            distribution,
            eta_a,
            eta_b,
            fresnel: Fresnel::dielectric(eta_a, eta_b),
            mode,
        }
    }

    pub fn get_type(&self) -> BxDFType {
        BxDFType::TRANSMISSION | BxDFType::GLOSSY
    }

    /// Relative index of refraction `eta_t / eta_i` seen from `wo`.
    fn relative_eta(&self, wo: &Vector3f) -> Float {
        if cos_theta(wo) > 0.0 {
            self.eta_b / self.eta_a
        } else {
            self.eta_a / self.eta_b
        }
    }

    /// Generalized half vector for refraction; `None` when both directions
    /// lie on the same side of it.
    fn half_vector(&self, wo: &Vector3f, wi: &Vector3f, eta: Float) -> Option<Vector3f> {
        let wh = (*wo + *wi * eta).normalize();
        let wh = if wh.z < 0.0 { -wh } else { wh };
        if wo.dot(&wh) * wi.dot(&wh) > 0.0 {
            None
        } else {
            Some(wh)
        }
    }

    /// Returns the value of the lobe for a pair of directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if same_hemisphere(wo, wi) {
            return Spectrum::ZERO;
        }
        let cos_o = cos_theta(wo);
        let cos_i = cos_theta(wi);
        if cos_i == 0.0 || cos_o == 0.0 {
            return Spectrum::ZERO;
        }

        let eta = self.relative_eta(wo);
        let wh = match self.half_vector(wo, wi, eta) {
            Some(wh) => wh,
            None => return Spectrum::ZERO,
        };

        let fr = self.fresnel.evaluate(wo.dot(&wh));
        let denom = wo.dot(&wh) + eta * wi.dot(&wh);
        let factor = match self.mode {
            TransportMode::Radiance => 1.0 / eta,
            TransportMode::Importance => 1.0,
        };
        let value = self.distribution.d(&wh)
            * self.distribution.g(wo, wi)
            * eta
            * eta
            * wi.abs_dot(&wh)
            * wo.abs_dot(&wh)
            * factor
            * factor
            / (cos_i * cos_o * denom * denom);
        (Spectrum::ONE - fr) * self.t * abs(value)
    }

    /// Samples a half vector and refracts `wo` through it.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        if wo.z == 0.0 {
            return BxDFSample::from(self.get_type());
        }
        let wh = self.distribution.sample_wh(wo, u);
        if wo.dot(&wh) < 0.0 {
            return BxDFSample::from(self.get_type());
        }

        let eta = 1.0 / self.relative_eta(wo);
        match refract(wo, &Normal3f::from(wh), eta) {
            Some(wi) => BxDFSample::new(self.f(wo, &wi), self.pdf(wo, &wi), wi, self.get_type()),
            None => BxDFSample::from(self.get_type()),
        }
    }

    /// Half-vector density times the refraction Jacobian.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if same_hemisphere(wo, wi) {
            return 0.0;
        }
        let eta = self.relative_eta(wo);
        let wh = (*wo + *wi * eta).normalize();
        if wo.dot(&wh) * wi.dot(&wh) > 0.0 {
            return 0.0;
        }
        let denom = wo.dot(&wh) + eta * wi.dot(&wh);
        let dwh_dwi = abs((eta * eta * wi.dot(&wh)) / (denom * denom));
        self.distribution.pdf(wo, &wh) * dwh_dwi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::microfacet::TrowbridgeReitzDistribution;
    use crate::rng::RNG;

    #[test]
    fn samples_cross_the_surface() {
        let distrib = TrowbridgeReitzDistribution::new(0.2, 0.2, true);
        let bxdf = MicrofacetTransmission::new(
            Spectrum::ONE,
            distrib.into(),
            1.0,
            1.5,
            TransportMode::Radiance,
        );
        let wo = Vector3f::new(0.3, 0.0, 0.9).normalize();
        let mut rng = RNG::new(17);
        let mut valid = 0;
        for _ in 0..128 {
            let s = bxdf.sample_f(&wo, &rng.uniform_point2f());
            if s.is_valid() {
                valid += 1;
                assert!(s.wi.z < 0.0);
                assert!(!s.f.has_nans());
            }
        }
        assert!(valid > 64);
    }

    #[test]
    fn reflection_pair_is_black() {
        let distrib = TrowbridgeReitzDistribution::new(0.2, 0.2, true);
        let bxdf = MicrofacetTransmission::new(
            Spectrum::ONE,
            distrib.into(),
            1.0,
            1.5,
            TransportMode::Importance,
        );
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.0, 0.6, 0.8);
        assert!(bxdf.f(&wo, &wi).is_black());
        assert_eq!(bxdf.pdf(&wo, &wi), 0.0);
    }
}
