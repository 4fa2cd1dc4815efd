//! Microfacet Reflection

use super::*;

/// Torrance-Sparrow glossy reflection over a microfacet distribution.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MicrofacetReflection {
    r: Spectrum,
    distribution: MicrofacetDistribution,
    fresnel: Fresnel,
}

impl MicrofacetReflection {
    /// Create a new instance of `MicrofacetReflection`.
    ///
    /// * `r`            - Spectrum used to scale the reflected colour.
    /// * `distribution` - Microfacet distribution.
    /// * `fresnel`      - Fresnel term.
    pub fn new(r: Spectrum, distribution: MicrofacetDistribution, fresnel: Fresnel) -> Self {
        Self {
            r,
            distribution,
            fresnel,
        }
    }

    pub fn get_type(&self) -> BxDFType {
        BxDFType::REFLECTION | BxDFType::GLOSSY
    }

    /// `R D(wh) G(wo, wi) F(wi·wh) / (4 |cos θo| |cos θi|)`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        let cos_o = abs_cos_theta(wo);
        let cos_i = abs_cos_theta(wi);
        let wh = *wi + *wo;
        if cos_i == 0.0 || cos_o == 0.0 || wh.is_zero() {
            return Spectrum::ZERO;
        }

        // Fresnel is evaluated with wh on the normal side so TIR is handled.
        let wh = wh.normalize().face_forward(&Vector3f::new(0.0, 0.0, 1.0));
        let fr = self.fresnel.evaluate(wi.dot(&wh));
        let geometric = self.distribution.d(&wh) * self.distribution.g(wo, wi);
        self.r * fr * geometric / (4.0 * cos_i * cos_o)
    }

    /// Samples a half vector and mirrors `wo` about it.
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

        let wi = reflect(wo, &wh);
        if !same_hemisphere(wo, &wi) {
            return BxDFSample::from(self.get_type());
        }
        let pdf = self.distribution.pdf(wo, &wh) / (4.0 * wo.dot(&wh));
        BxDFSample::new(self.f(wo, &wi), pdf, wi, self.get_type())
    }

    /// Half-vector density converted to solid angle around `wi`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }
        let wh = (*wo + *wi).normalize();
        self.distribution.pdf(wo, &wh) / (4.0 * wo.dot(&wh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::microfacet::TrowbridgeReitzDistribution;
    use crate::rng::RNG;

    fn lobe(alpha: Float) -> MicrofacetReflection {
        let distrib = TrowbridgeReitzDistribution::new(alpha, alpha, true);
        MicrofacetReflection::new(Spectrum::ONE, distrib.into(), Fresnel::Constant(1.0))
    }

    #[test]
    fn sampled_pdf_matches_evaluated_pdf() {
        let bxdf = lobe(0.3);
        let wo = Vector3f::new(0.4, 0.2, 0.8).normalize();
        let mut rng = RNG::new(11);
        for _ in 0..256 {
            let s = bxdf.sample_f(&wo, &rng.uniform_point2f());
            if s.is_valid() {
                let pdf = bxdf.pdf(&wo, &s.wi);
                assert!((s.pdf - pdf).abs() <= 1e-3 * pdf.max(1.0), "{} vs {}", s.pdf, pdf);
                assert!(same_hemisphere(&wo, &s.wi));
            }
        }
    }

    #[test]
    fn energy_is_bounded() {
        let bxdf = lobe(0.5);
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let mut rng = RNG::new(5);
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let s = bxdf.sample_f(&wo, &rng.uniform_point2f());
            sum += s.weight()[0];
        }
        let albedo = sum / n as Float;
        assert!(albedo > 0.5 && albedo <= 1.02, "albedo {}", albedo);
    }

    #[test]
    fn grazing_outgoing_is_black() {
        let bxdf = lobe(0.2);
        let wo = Vector3f::new(1.0, 0.0, 0.0);
        let wi = Vector3f::new(0.0, 0.0, 1.0);
        assert!(bxdf.f(&wo, &wi).is_black());
        assert!(!bxdf.sample_f(&wo, &Point2f::new(0.3, 0.3)).is_valid());
    }
}
