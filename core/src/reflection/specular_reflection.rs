//! Specular Reflection

use super::*;

/// Ideal mirror reflection weighted by a Fresnel term.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpecularReflection {
    /// Scales the reflected colour.
    r: Spectrum,

    /// Fresnel term.
    fresnel: Fresnel,
}

impl SpecularReflection {
    /// Create a new instance of `SpecularReflection`.
    ///
    /// * `r`       - Spectrum used to scale the reflected colour.
    /// * `fresnel` - Fresnel term.
    pub fn new(r: Spectrum, fresnel: Fresnel) -> Self {
        Self { r, fresnel }
    }

    pub fn get_type(&self) -> BxDFType {
        BxDFType::REFLECTION | BxDFType::SPECULAR
    }

    /// Delta distributions are never hit by an arbitrary direction pair.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Returns the mirror direction with pdf 1.
    ///
    /// * `wo` - Outgoing direction.
    pub fn sample_f(&self, wo: &Vector3f) -> BxDFSample {
        let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
        let cos_i = abs_cos_theta(&wi);
        if cos_i == 0.0 {
            return BxDFSample::from(self.get_type());
        }
        let f = self.fresnel.evaluate(cos_theta(&wi)) * self.r / cos_i;
        BxDFSample::new(f, 1.0, wi, self.get_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_about_normal() {
        let lobe = SpecularReflection::new(Spectrum::ONE, Fresnel::Constant(1.0));
        let wo = Vector3f::new(0.3, -0.2, 0.9).normalize();
        let s = lobe.sample_f(&wo);
        assert_eq!(s.wi, Vector3f::new(-wo.x, -wo.y, wo.z));
        assert_eq!(s.pdf, 1.0);
        assert!((s.weight()[0] - 1.0).abs() < 1e-5);
        assert!(lobe.f(&wo, &s.wi).is_black());
    }
}
