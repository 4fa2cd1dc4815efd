//! Lambertian Reflection

use super::*;

/// Perfectly diffuse reflection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LambertianReflection {
    /// Albedo.
    r: Spectrum,
}

impl LambertianReflection {
    /// Create a new instance of `LambertianReflection`.
    ///
    /// * `r` - Albedo; the fraction of incident light scattered.
    pub fn new(r: Spectrum) -> Self {
        Self { r }
    }

    pub fn get_type(&self) -> BxDFType {
        BxDFType::REFLECTION | BxDFType::DIFFUSE
    }

    /// Returns `R/π` when both directions are on the same side, else zero.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if same_hemisphere(wo, wi) {
            self.r * INV_PI
        } else {
            Spectrum::ZERO
        }
    }

    /// The directional albedo is exactly `R`.
    pub fn rho_hd(&self) -> Spectrum {
        self.r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;

    #[test]
    fn integrates_to_albedo() {
        let albedo = Spectrum::from_rgb(0.2, 0.5, 0.9);
        let lobe = LambertianReflection::new(albedo);
        let wo = Vector3f::new(0.3, 0.1, 0.8).normalize();

        // Stratified uniform hemisphere estimate of ∫ f cosθ dω.
        let n = 256;
        let mut sum = Spectrum::ZERO;
        for i in 0..n {
            for j in 0..n {
                let u = Point2f::new((i as Float + 0.5) / n as Float, (j as Float + 0.5) / n as Float);
                let wi = uniform_sample_hemisphere(&u);
                sum += lobe.f(&wo, &wi) * abs_cos_theta(&wi) / uniform_hemisphere_pdf();
            }
        }
        let estimate = sum / (n * n) as Float;
        for c in 0..3 {
            assert!((estimate[c] - albedo[c]).abs() < 1e-3, "{} vs {}", estimate, albedo);
        }
    }

    #[test]
    fn opposite_hemisphere_is_black() {
        let lobe = LambertianReflection::new(Spectrum::ONE);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.0, 0.6, -0.8);
        assert!(lobe.f(&wo, &wi).is_black());
    }

    #[test]
    fn cosine_sampling_weight_is_albedo() {
        let albedo = Spectrum::new(0.7);
        let bxdf = BxDF::from(LambertianReflection::new(albedo));
        let wo = Vector3f::new(0.0, 0.0, -1.0);
        let mut rng = RNG::new(3);
        for _ in 0..64 {
            let s = bxdf.sample_f(&wo, &rng.uniform_point2f());
            if s.is_valid() {
                assert!(s.wi.z < 0.0);
                assert!((s.weight()[0] - 0.7).abs() < 1e-4);
            }
        }
    }
}
