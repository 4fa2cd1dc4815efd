//! Clear Coat Material
//!
//! An ideal dielectric coat over a diffuse base. Rather than adding both a
//! specular and a diffuse lobe, each evaluation keeps one of them by Russian
//! roulette and reweights it so the expected BSDF is `R spec + T diffuse`.

use crate::common::*;
use shading::geometry::*;
use shading::interaction::SurfaceInteraction;
use shading::material::*;
use shading::paramset::TextureParams;
use shading::pbrt::*;
use shading::reflection::*;
use shading::rng::RNG;
use shading::spectrum::Spectrum;
use shading::texture::*;
use std::sync::Arc;

/// The lobe a clear coat kept for one evaluation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CoatLobe {
    /// Coat reflection weighted by `R / p`.
    Specular { weight: Float },

    /// Base diffuse weighted by `T / (1 - p)`.
    Diffuse { weight: Float },

    /// No refracted direction exists, so only the coat reflects.
    TotalInternalReflection,
}

impl CoatLobe {
    /// Picks a lobe for light arriving with cos(θ) `cos_theta` against the
    /// geometric normal.
    ///
    /// * `cos_theta` - Cosine between `wo` and the geometric normal.
    /// * `eta`       - Index of refraction of the coat.
    /// * `u`         - Uniform sample in [0, 1).
    pub fn choose(cos_theta: Float, eta: Float, u: Float) -> Self {
        let (eta_i, eta_t) = if cos_theta > 0.0 { (1.0, eta) } else { (eta, 1.0) };
        let cos_i = min(abs(cos_theta), 1.0);
        let sin2_t = (eta_i / eta_t) * (eta_i / eta_t) * max(0.0, 1.0 - cos_i * cos_i);
        if sin2_t >= 1.0 {
            return Self::TotalInternalReflection;
        }

        let r = fr_dielectric(cos_i, eta_i, eta_t);
        let t = 1.0 - r;
        let p = 0.25 + 0.5 * r;
        if u < p {
            Self::Specular { weight: r / p }
        } else {
            Self::Diffuse { weight: t / (1.0 - p) }
        }
    }

    /// The lobe for this choice given the coat tint and base reflectance.
    ///
    /// * `ks` - Coat tint.
    /// * `kd` - Base diffuse reflectance.
    pub fn bxdf(&self, ks: Spectrum, kd: Spectrum) -> BxDF {
        match *self {
            Self::Specular { weight } => SpecularReflection::new(ks * weight, Fresnel::Constant(1.0)).into(),
            Self::Diffuse { weight } => LambertianReflection::new(kd * weight).into(),
            Self::TotalInternalReflection => SpecularReflection::new(ks, Fresnel::Constant(1.0)).into(),
        }
    }
}

/// Diffuse base under a smooth dielectric coat.
#[derive(Clone)]
pub struct ClearCoatMaterial {
    /// Base diffuse reflectance.
    kd: ArcTexture<Spectrum>,

    /// Coat tint.
    ks: ArcTexture<Spectrum>,

    /// Index of refraction of the coat.
    eta: ArcTexture<Float>,

    common: SurfaceCommon,
}

impl ClearCoatMaterial {
    /// Create a new `ClearCoatMaterial`.
    ///
    /// * `kd`     - Base diffuse reflectance.
    /// * `ks`     - Coat tint.
    /// * `eta`    - Index of refraction of the coat.
    /// * `common` - Modifier and emission.
    pub fn new(
        kd: ArcTexture<Spectrum>,
        ks: ArcTexture<Spectrum>,
        eta: ArcTexture<Float>,
        common: SurfaceCommon,
    ) -> Self {
        Self { kd, ks, eta, common }
    }

    /// Applies the modifier, then draws one sample from `rng` to choose the
    /// lobe.
    ///
    /// * `si`  - The surface interaction.
    /// * `rng` - Sampling context.
    pub fn choose_lobe(&self, si: &mut SurfaceInteraction, rng: &mut RNG) -> CoatLobe {
        self.common.modify(si);
        self.choose_lobe_unmodified(si, rng)
    }

    fn choose_lobe_unmodified(&self, si: &SurfaceInteraction, rng: &mut RNG) -> CoatLobe {
        let eta = positive_eta(self.eta.evaluate(si));
        CoatLobe::choose(si.wo.dot(&si.n), eta, rng.uniform_float())
    }
}

impl Material for ClearCoatMaterial {
    fn name(&self) -> &'static str {
        "clearcoat"
    }

    fn emittance(&self, si: &SurfaceInteraction) -> Spectrum {
        self.common.emittance(si)
    }

    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
        rng: &mut RNG,
    ) -> ScatteringFunctions {
        self.common.modify(si);

        let lobe = self.choose_lobe_unmodified(si, rng);
        let ks = self.ks.evaluate(si).clamp_default();
        let kd = self.kd.evaluate(si).clamp_default();

        let mut bsdf = BSDF::new(si, 1.0);
        bsdf.add(lobe.bxdf(ks, kd));
        ScatteringFunctions::with_bsdf(bsdf)
    }

    fn children(&self) -> Vec<Child> {
        let mut children = vec![
            Child::SpectrumTexture(Arc::clone(&self.kd)),
            Child::SpectrumTexture(Arc::clone(&self.ks)),
            Child::FloatTexture(Arc::clone(&self.eta)),
        ];
        children.extend(self.common.children());
        children
    }
}

impl TryFrom<&TextureParams> for ClearCoatMaterial {
    type Error = String;

    /// Create a clear coat material from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let kd = spectrum_texture(tp, "Kd", Spectrum::new(0.5))?;
        let ks = spectrum_texture(tp, "Ks", Spectrum::ONE)?;
        let eta = float_texture(tp, "eta", 1.5)?;
        Ok(Self::new(kd, ks, eta, SurfaceCommon::try_from(tp)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;
    use shading::paramset::ParamSet;

    #[test]
    fn roulette_average_converges_to_both_lobes() {
        let cos_theta = 0.6;
        let eta = 1.5;
        let r = fr_dielectric(cos_theta, 1.0, eta);
        let t = 1.0 - r;

        let n = 200_000;
        let mut rng = RNG::new(11);
        let (mut spec, mut diffuse) = (0.0_f64, 0.0_f64);
        for _ in 0..n {
            match CoatLobe::choose(cos_theta, eta, rng.uniform_float()) {
                CoatLobe::Specular { weight } => spec += weight as f64,
                CoatLobe::Diffuse { weight } => diffuse += weight as f64,
                CoatLobe::TotalInternalReflection => panic!("refraction exists"),
            }
        }
        assert!(approx_eq!(f64, spec / n as f64, r as f64, epsilon = 5e-3));
        assert!(approx_eq!(f64, diffuse / n as f64, t as f64, epsilon = 5e-3));
    }

    #[test]
    fn exiting_at_grazing_keeps_only_the_coat() {
        assert_eq!(CoatLobe::choose(-0.1, 1.5, 0.9), CoatLobe::TotalInternalReflection);
        let lobe = CoatLobe::TotalInternalReflection.bxdf(Spectrum::ONE, Spectrum::ONE);
        assert!(lobe.get_type().is_specular());
    }

    #[test]
    fn draws_from_the_supplied_context() {
        let coat = ClearCoatMaterial::try_from(&TextureParams::from_material_params(ParamSet::new())).unwrap();
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let a = coat.choose_lobe(&mut SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), wo), &mut RNG::new(5));
        let b = coat.choose_lobe(&mut SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), wo), &mut RNG::new(5));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn each_branch_keeps_a_minimum_probability(cos in 0.01f32..1.0f32, eta in 1.0f32..3.0f32) {
            let spec = CoatLobe::choose(cos, eta, 0.2499);
            let diffuse = CoatLobe::choose(cos, eta, 0.7501);
            prop_assert!(matches!(spec, CoatLobe::Specular { .. }), "expected the coat, got {:?}", spec);
            prop_assert!(matches!(diffuse, CoatLobe::Diffuse { .. }), "expected the base, got {:?}", diffuse);
        }
    }
}
