//! Fresnel Blend

use super::*;

/// Ashikhmin-Shirley coupled diffuse/glossy reflection, weighted by Schlick's
/// Fresnel approximation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FresnelBlend {
    rd: Spectrum,
    rs: Spectrum,
    distribution: MicrofacetDistribution,
}

impl FresnelBlend {
    /// Create a new instance of `FresnelBlend`.
    ///
    /// * `rd`           - Diffuse reflectance.
    /// * `rs`           - Specular reflectance at normal incidence.
    /// * `distribution` - Microfacet distribution.
    pub fn new(rd: Spectrum, rs: Spectrum, distribution: MicrofacetDistribution) -> Self {
        Self {
            rd,
            rs,
            distribution,
        }
    }

    pub fn get_type(&self) -> BxDFType {
        BxDFType::REFLECTION | BxDFType::GLOSSY
    }

    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        let fade = |w: &Vector3f| 1.0 - pow5(1.0 - 0.5 * abs_cos_theta(w));
        let diffuse =
            (28.0 / (23.0 * PI)) * self.rd * (Spectrum::ONE - self.rs) * fade(wi) * fade(wo);

        let wh = *wi + *wo;
        if wh.is_zero() {
            return Spectrum::ZERO;
        }
        let wh = wh.normalize();
        let specular = schlick_fresnel(self.rs, wi.dot(&wh)) * self.distribution.d(&wh)
            / (4.0 * wi.abs_dot(&wh) * max(abs_cos_theta(wi), abs_cos_theta(wo)));
        diffuse + specular
    }

    /// Picks the diffuse or glossy half with equal probability using `u[0]`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        let wi = if u[0] < 0.5 {
            let u = Point2f::new(min(2.0 * u[0], ONE_MINUS_EPSILON), u[1]);
            let mut wi = cosine_sample_hemisphere(&u);
            if wo.z < 0.0 {
                wi.z = -wi.z;
            }
            wi
        } else {
            let u = Point2f::new(min(2.0 * (u[0] - 0.5), ONE_MINUS_EPSILON), u[1]);
            let wh = self.distribution.sample_wh(wo, &u);
            let wi = reflect(wo, &wh);
            if !same_hemisphere(wo, &wi) {
                return BxDFSample::from(self.get_type());
            }
            wi
        };
        BxDFSample::new(self.f(wo, &wi), self.pdf(wo, &wi), wi, self.get_type())
    }

    /// Average of the cosine and half-vector densities.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }
        let wh = (*wo + *wi).normalize();
        let pdf_wh = self.distribution.pdf(wo, &wh);
        0.5 * (abs_cos_theta(wi) * INV_PI + pdf_wh / (4.0 * wo.dot(&wh)))
    }
}
