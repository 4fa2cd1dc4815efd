//! Plastic Material

use crate::common::*;
use shading::interaction::SurfaceInteraction;
use shading::material::*;
use shading::microfacet::*;
use shading::paramset::TextureParams;
use shading::pbrt::*;
use shading::reflection::*;
use shading::rng::RNG;
use shading::spectrum::Spectrum;
use shading::texture::*;
use std::sync::Arc;

/// Plastic as a mixture of a diffuse and glossy scattering.
#[derive(Clone)]
pub struct PlasticMaterial {
    /// Spectral diffuse reflection.
    kd: ArcTexture<Spectrum>,

    /// Spectral glossy reflection.
    ks: ArcTexture<Spectrum>,

    /// Isotropic roughness of the glossy term.
    roughness: Roughness,

    common: SurfaceCommon,
}

impl PlasticMaterial {
    /// Create a new `PlasticMaterial`.
    ///
    /// * `kd`        - Spectral diffuse reflection.
    /// * `ks`        - Spectral glossy reflection.
    /// * `roughness` - Glossy roughness.
    /// * `common`    - Modifier and emission.
    pub fn new(
        kd: ArcTexture<Spectrum>,
        ks: ArcTexture<Spectrum>,
        roughness: Roughness,
        common: SurfaceCommon,
    ) -> Self {
        Self {
            kd,
            ks,
            roughness,
            common,
        }
    }
}

impl Material for PlasticMaterial {
    fn name(&self) -> &'static str {
        "plastic"
    }

    fn emittance(&self, si: &SurfaceInteraction) -> Spectrum {
        self.common.emittance(si)
    }

    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
        _rng: &mut RNG,
    ) -> ScatteringFunctions {
        self.common.modify(si);

        let mut bsdf = BSDF::new(si, 1.0);

        let kd = self.kd.evaluate(si).clamp_default();
        if !kd.is_black() {
            bsdf.add(LambertianReflection::new(kd).into());
        }

        let ks = self.ks.evaluate(si).clamp_default();
        if !ks.is_black() {
            let (ax, ay) = self.roughness.glossy_alpha(si);
            let distribution = TrowbridgeReitzDistribution::new(ax, ay, true);
            let fresnel = Fresnel::dielectric(1.5, 1.0);
            bsdf.add(MicrofacetReflection::new(ks, distribution.into(), fresnel).into());
        }

        ScatteringFunctions::with_bsdf(bsdf)
    }

    fn children(&self) -> Vec<Child> {
        let mut children = vec![
            Child::SpectrumTexture(Arc::clone(&self.kd)),
            Child::SpectrumTexture(Arc::clone(&self.ks)),
        ];
        children.extend(self.roughness.children());
        children.extend(self.common.children());
        children
    }
}

impl TryFrom<&TextureParams> for PlasticMaterial {
    type Error = String;

    /// Create a plastic material from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let kd = spectrum_texture(tp, "Kd", Spectrum::new(0.25))?;
        let ks = spectrum_texture(tp, "Ks", Spectrum::new(0.25))?;
        let roughness = Roughness::from_params(tp, "roughness", "roughness", 0.1)?;
        Ok(Self::new(kd, ks, roughness, SurfaceCommon::try_from(tp)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shading::geometry::*;

    #[test]
    fn diffuse_and_glossy_lobes() {
        let plastic = PlasticMaterial::try_from(&TextureParams::default()).unwrap();
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let mut si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), wo);
        let sf = plastic.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut RNG::new(0));
        let bsdf = sf.bsdf.unwrap();
        assert_eq!(bsdf.num_components(BxDFType::DIFFUSE | BxDFType::REFLECTION), 1);
        assert_eq!(bsdf.num_components(BxDFType::GLOSSY | BxDFType::REFLECTION), 1);

        let wi = Vector3f::new(0.0, -0.6, 0.8);
        let f = bsdf.f(&wo, &wi, BxDFType::ALL);
        assert!(f[0] > 0.25 / std::f32::consts::PI);
    }
}
