//! Substrate Material

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

/// Implements layered surfaces with a glossy coating over a diffuse base,
/// blended by a Schlick Fresnel term.
#[derive(Clone)]
pub struct SubstrateMaterial {
    /// Diffuse base reflectance.
    kd: ArcTexture<Spectrum>,

    /// Specular reflectance of the coating at normal incidence.
    ks: ArcTexture<Spectrum>,

    /// Anisotropic roughness of the coating.
    roughness: Roughness,

    common: SurfaceCommon,
}

impl SubstrateMaterial {
    /// Create a new `SubstrateMaterial`.
    ///
    /// * `kd`        - Diffuse base reflectance.
    /// * `ks`        - Specular reflectance at normal incidence.
    /// * `roughness` - Coating roughness.
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

impl Material for SubstrateMaterial {
    fn name(&self) -> &'static str {
        "substrate"
    }

    fn emittance(&self, si: &SurfaceInteraction) -> Spectrum {
        self.common.emittance(si)
    }

    /// Returns no BSDF when both reflectances are black.
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
        _rng: &mut RNG,
    ) -> ScatteringFunctions {
        self.common.modify(si);

        let d = self.kd.evaluate(si).clamp_default();
        let s = self.ks.evaluate(si).clamp_default();
        if d.is_black() && s.is_black() {
            return ScatteringFunctions::default();
        }

        let (ax, ay) = self.roughness.glossy_alpha(si);
        let distribution = TrowbridgeReitzDistribution::new(ax, ay, true);

        let mut bsdf = BSDF::new(si, 1.0);
        bsdf.add(FresnelBlend::new(d, s, distribution.into()).into());
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

impl TryFrom<&TextureParams> for SubstrateMaterial {
    type Error = String;

    /// Create a substrate material from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let kd = spectrum_texture(tp, "Kd", Spectrum::new(0.5))?;
        let ks = spectrum_texture(tp, "Ks", Spectrum::new(0.5))?;
        let roughness = Roughness::from_params(tp, "uroughness", "vroughness", 0.1)?;
        Ok(Self::new(kd, ks, roughness, SurfaceCommon::try_from(tp)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shading::geometry::*;
    use shading::paramset::ParamSet;

    fn evaluate(ps: ParamSet) -> ScatteringFunctions {
        let m = SubstrateMaterial::try_from(&TextureParams::from_material_params(ps)).unwrap();
        let mut si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        m.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut RNG::new(3))
    }

    #[test]
    fn black_layers_yield_no_bsdf() {
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("Kd", &[0.0, 0.0, 0.0]);
        ps.add_rgb_spectrum("Ks", &[0.0, 0.0, 0.0]);
        let sf = evaluate(ps);
        assert!(sf.is_empty());
    }

    #[test]
    fn default_layers_blend_into_one_glossy_lobe() {
        let bsdf = evaluate(ParamSet::new()).bsdf.unwrap();
        assert_eq!(bsdf.num_components(BxDFType::ALL), 1);
        assert_eq!(bsdf.num_components(BxDFType::GLOSSY | BxDFType::REFLECTION), 1);
    }
}
