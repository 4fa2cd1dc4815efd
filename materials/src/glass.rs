//! Glass Material

use crate::common::*;
use shading::interaction::SurfaceInteraction;
use shading::material::*;
use shading::paramset::TextureParams;
use shading::pbrt::*;
use shading::reflection::*;
use shading::rng::RNG;
use shading::spectrum::Spectrum;
use shading::texture::*;
use std::sync::Arc;

/// Implements perfect or glossy specular reflection and transmission,
/// weighted by Fresnel terms for accurate angular-dependent variation.
#[derive(Clone)]
pub struct GlassMaterial {
    /// Reflectivity of the surface.
    kr: ArcTexture<Spectrum>,

    /// Transmissivity of the surface.
    kt: ArcTexture<Spectrum>,

    /// Microfacet roughness. Zero gives perfect specular scattering.
    roughness: Roughness,

    /// The index of refraction of the inside of the object. The exterior is
    /// taken to be a vacuum.
    index: ArcTexture<Float>,

    common: SurfaceCommon,
}

impl GlassMaterial {
    /// Create a new `GlassMaterial`.
    ///
    /// * `kr`        - Reflectivity of the surface.
    /// * `kt`        - Transmissivity of the surface.
    /// * `roughness` - Microfacet roughness.
    /// * `index`     - Index of refraction inside.
    /// * `common`    - Modifier and emission.
    pub fn new(
        kr: ArcTexture<Spectrum>,
        kt: ArcTexture<Spectrum>,
        roughness: Roughness,
        index: ArcTexture<Float>,
        common: SurfaceCommon,
    ) -> Self {
        Self {
            kr,
            kt,
            roughness,
            index,
            common,
        }
    }
}

impl Material for GlassMaterial {
    fn name(&self) -> &'static str {
        "glass"
    }

    fn emittance(&self, si: &SurfaceInteraction) -> Spectrum {
        self.common.emittance(si)
    }

    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        allow_multiple_lobes: bool,
        _rng: &mut RNG,
    ) -> ScatteringFunctions {
        self.common.modify(si);

        let eta = positive_eta(self.index.evaluate(si));
        let r = self.kr.evaluate(si).clamp_default();
        let t = self.kt.evaluate(si).clamp_default();
        let alpha = self.roughness.alpha(si);

        let mut bsdf = BSDF::new(si, eta);
        add_dielectric_lobes(&mut bsdf, r, t, alpha, eta, mode, allow_multiple_lobes);
        ScatteringFunctions::with_bsdf(bsdf)
    }

    fn children(&self) -> Vec<Child> {
        let mut children = vec![
            Child::SpectrumTexture(Arc::clone(&self.kr)),
            Child::SpectrumTexture(Arc::clone(&self.kt)),
            Child::FloatTexture(Arc::clone(&self.index)),
        ];
        children.extend(self.roughness.children());
        children.extend(self.common.children());
        children
    }
}

impl TryFrom<&TextureParams> for GlassMaterial {
    type Error = String;

    /// Create a glass material from given parameter set. `eta` takes
    /// precedence over `index`.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let kr = spectrum_texture(tp, "Kr", Spectrum::ONE)?;
        let kt = spectrum_texture(tp, "Kt", Spectrum::ONE)?;
        let index = match tp.try_get_float_texture_or_none("eta", textures::float_constant)? {
            Some(tex) => tex,
            None => float_texture(tp, "index", 1.5)?,
        };
        let roughness = Roughness::from_params(tp, "uroughness", "vroughness", 0.0)?;
        Ok(Self::new(kr, kt, roughness, index, SurfaceCommon::try_from(tp)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use shading::geometry::*;
    use shading::paramset::ParamSet;

    fn hit() -> SurfaceInteraction {
        SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0))
    }

    #[test]
    fn smooth_glass_lobes_follow_multiple_lobe_flag() {
        let glass = GlassMaterial::try_from(&TextureParams::default()).unwrap();
        let one = glass.compute_scattering_functions(&mut hit(), TransportMode::Radiance, true, &mut RNG::new(0));
        assert_eq!(one.bsdf.unwrap().num_components(BxDFType::ALL), 1);
        let two = glass.compute_scattering_functions(&mut hit(), TransportMode::Radiance, false, &mut RNG::new(0));
        let bsdf = two.bsdf.unwrap();
        assert_eq!(bsdf.num_components(BxDFType::SPECULAR | BxDFType::REFLECTION), 1);
        assert_eq!(bsdf.num_components(BxDFType::SPECULAR | BxDFType::TRANSMISSION), 1);
        assert!(approx_eq!(f32, bsdf.eta, 1.5, epsilon = 1e-6));
    }

    #[test]
    fn rough_glass_uses_microfacet_lobes() {
        let mut ps = ParamSet::new();
        ps.add_float("uroughness", &[0.3]);
        ps.add_float("vroughness", &[0.3]);
        ps.add_float("eta", &[1.33]);
        let glass = GlassMaterial::try_from(&TextureParams::from_material_params(ps)).unwrap();
        let sf = glass.compute_scattering_functions(&mut hit(), TransportMode::Radiance, true, &mut RNG::new(0));
        let bsdf = sf.bsdf.unwrap();
        assert_eq!(bsdf.num_components(BxDFType::GLOSSY | BxDFType::REFLECTION | BxDFType::TRANSMISSION), 2);
        assert!(approx_eq!(f32, bsdf.eta, 1.33, epsilon = 1e-6));
    }
}
