//! Mirror Material

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

/// Implements perfect specular reflection.
#[derive(Clone)]
pub struct MirrorMaterial {
    /// Spectral reflectance.
    kr: ArcTexture<Spectrum>,

    common: SurfaceCommon,
}

impl MirrorMaterial {
    /// Create a new `MirrorMaterial`.
    ///
    /// * `kr`     - Spectral reflectance.
    /// * `common` - Modifier and emission.
    pub fn new(kr: ArcTexture<Spectrum>, common: SurfaceCommon) -> Self {
        Self { kr, common }
    }
}

impl Material for MirrorMaterial {
    fn name(&self) -> &'static str {
        "mirror"
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
        let r = self.kr.evaluate(si).clamp_default();
        if !r.is_black() {
            bsdf.add(SpecularReflection::new(r, Fresnel::Constant(1.0)).into());
        }
        ScatteringFunctions::with_bsdf(bsdf)
    }

    fn children(&self) -> Vec<Child> {
        let mut children = vec![Child::SpectrumTexture(Arc::clone(&self.kr))];
        children.extend(self.common.children());
        children
    }
}

impl TryFrom<&TextureParams> for MirrorMaterial {
    type Error = String;

    /// Create a mirror material from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let kr = spectrum_texture(tp, "Kr", Spectrum::new(0.9))?;
        Ok(Self::new(kr, SurfaceCommon::try_from(tp)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use shading::geometry::*;
    use shading::paramset::ParamSet;

    #[test]
    fn reflects_exactly_with_delta_pdf() {
        let mirror = MirrorMaterial::try_from(&TextureParams::from_material_params(ParamSet::new())).unwrap();
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let mut si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), wo);
        let sf = mirror.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut RNG::new(1));
        let bsdf = sf.bsdf.unwrap();

        let s = bsdf.sample_f(&wo, &Point2f::new(0.42, 0.17), BxDFType::ALL);
        assert!(approx_eq!(f32, s.wi.x, 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.wi.y, -0.6, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.wi.z, 0.8, epsilon = 1e-6));
        assert_eq!(s.pdf, 1.0);
        assert!(s.bxdf_type.is_specular());
        assert!(approx_eq!(f32, bsdf.weight(&s)[1], 0.9, epsilon = 1e-5));

        // Delta lobes contribute nothing to evaluation or density.
        assert!(bsdf.f(&wo, &s.wi, BxDFType::ALL).is_black());
        assert_eq!(bsdf.pdf(&wo, &s.wi, BxDFType::ALL), 0.0);
    }

    #[test]
    fn white_mirror_returns_normal_incidence_unchanged() {
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("Kr", &[1.0, 1.0, 1.0]);
        let mirror = MirrorMaterial::try_from(&TextureParams::from_material_params(ps)).unwrap();
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let mut si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), wo);
        let sf = mirror.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut RNG::new(9));
        let bsdf = sf.bsdf.unwrap();

        let s = bsdf.sample_f(&wo, &Point2f::new(0.1, 0.9), BxDFType::ALL);
        assert_eq!(s.wi, wo);
        assert_eq!(s.pdf, 1.0);
        let w = bsdf.weight(&s);
        for c in 0..3 {
            assert!(approx_eq!(f32, w[c], 1.0, epsilon = 1e-6));
        }
    }
}
