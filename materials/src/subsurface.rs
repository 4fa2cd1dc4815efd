//! Subsurface Material

use crate::common::*;
use shading::bssrdf::*;
use shading::interaction::SurfaceInteraction;
use shading::material::*;
use shading::paramset::TextureParams;
use shading::pbrt::*;
use shading::reflection::*;
use shading::rng::RNG;
use shading::spectrum::Spectrum;
use shading::texture::*;
use std::sync::Arc;

/// Skin-like absorption used when `sigma_a` is not given (mm^-1).
const DEFAULT_SIGMA_A: [Float; 3] = [0.0011, 0.0024, 0.014];

/// Reduced scattering used when `sigma_s` is not given (mm^-1).
const DEFAULT_SIGMA_S: [Float; 3] = [2.55, 3.21, 3.77];

/// Implements subsurface scattering material that allows the scattering
/// properties to vary as a function of the position on the surface.
#[derive(Clone)]
pub struct SubsurfaceMaterial {
    /// Scale factor for absorption and scattering coefficients.
    scale: Float,

    /// Coefficient of specular reflection at the boundary.
    kr: ArcTexture<Spectrum>,

    /// Coefficient of specular transmission at the boundary.
    kt: ArcTexture<Spectrum>,

    /// Absorption coefficient `σa`.
    sigma_a: ArcTexture<Spectrum>,

    /// Scattering coefficient `σs`.
    sigma_s: ArcTexture<Spectrum>,

    /// Boundary roughness. Zero gives a smooth boundary.
    roughness: Roughness,

    /// Index of refraction of the scattering medium.
    eta: Float,

    /// Table for scattering profile data.
    table: Arc<BSSRDFTable>,

    common: SurfaceCommon,
}

impl SubsurfaceMaterial {
    /// Create a new `SubsurfaceMaterial`. Builds the profile table.
    ///
    /// * `scale`     - Scale factor for absorption and scattering coefficients.
    /// * `kr`        - Coefficient of specular reflection.
    /// * `kt`        - Coefficient of specular transmission.
    /// * `sigma_a`   - Absorption coefficient `σa`.
    /// * `sigma_s`   - Scattering coefficient `σs`.
    /// * `g`         - Asymmetry parameter for the Henyey-Greenstein phase function.
    /// * `eta`       - Index of refraction of the scattering medium.
    /// * `roughness` - Boundary roughness.
    /// * `common`    - Modifier and emission.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scale: Float,
        kr: ArcTexture<Spectrum>,
        kt: ArcTexture<Spectrum>,
        sigma_a: ArcTexture<Spectrum>,
        sigma_s: ArcTexture<Spectrum>,
        g: Float,
        eta: Float,
        roughness: Roughness,
        common: SurfaceCommon,
    ) -> Self {
        let eta = positive_eta(eta);
        Self {
            scale,
            kr,
            kt,
            sigma_a,
            sigma_s,
            roughness,
            eta,
            table: Arc::new(BSSRDFTable::with_defaults(g, eta)),
            common,
        }
    }

    /// The shared profile table.
    pub fn table(&self) -> &Arc<BSSRDFTable> {
        &self.table
    }
}

impl Material for SubsurfaceMaterial {
    fn name(&self) -> &'static str {
        "subsurface"
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

        let r = self.kr.evaluate(si).clamp_default();
        let t = self.kt.evaluate(si).clamp_default();
        let mut bsdf = BSDF::new(si, self.eta);
        if r.is_black() && t.is_black() {
            return ScatteringFunctions::with_bsdf(bsdf);
        }
        let alpha = self.roughness.alpha(si);
        add_dielectric_lobes(&mut bsdf, r, t, alpha, self.eta, mode, allow_multiple_lobes);

        let sig_a = (self.sigma_a.evaluate(si) * self.scale).clamp_default();
        let sig_s = (self.sigma_s.evaluate(si) * self.scale).clamp_default();
        ScatteringFunctions {
            bsdf: Some(bsdf),
            bssrdf: Some(TabulatedBSSRDF::new(si, self.eta, mode, sig_a, sig_s, Arc::clone(&self.table))),
        }
    }

    fn children(&self) -> Vec<Child> {
        let mut children = vec![
            Child::SpectrumTexture(Arc::clone(&self.kr)),
            Child::SpectrumTexture(Arc::clone(&self.kt)),
            Child::SpectrumTexture(Arc::clone(&self.sigma_a)),
            Child::SpectrumTexture(Arc::clone(&self.sigma_s)),
        ];
        children.extend(self.roughness.children());
        children.extend(self.common.children());
        children
    }
}

impl TryFrom<&TextureParams> for SubsurfaceMaterial {
    type Error = String;

    /// Create a subsurface material from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let sigma_a = spectrum_texture(tp, "sigma_a", Spectrum::from(DEFAULT_SIGMA_A))?;
        let sigma_s = spectrum_texture(tp, "sigma_s", Spectrum::from(DEFAULT_SIGMA_S))?;
        let kr = spectrum_texture(tp, "Kr", Spectrum::ONE)?;
        let kt = spectrum_texture(tp, "Kt", Spectrum::ONE)?;
        let roughness = Roughness::from_params(tp, "uroughness", "vroughness", 0.0)?;
        Ok(Self::new(
            tp.find_float("scale", 1.0),
            kr,
            kt,
            sigma_a,
            sigma_s,
            tp.find_float("g", 0.0),
            tp.find_float("eta", 1.33),
            roughness,
            SurfaceCommon::try_from(tp)?,
        ))
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
    fn scales_coefficients_into_the_bssrdf() {
        let mut ps = ParamSet::new();
        ps.add_float("scale", &[10.0]);
        ps.add_rgb_spectrum("sigma_a", &[0.1, 0.2, 0.3]);
        ps.add_rgb_spectrum("sigma_s", &[1.0, 1.0, 1.0]);
        let m = SubsurfaceMaterial::try_from(&TextureParams::from_material_params(ps)).unwrap();

        let mut si = hit();
        let sf = m.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut RNG::new(0));
        let bssrdf = sf.bssrdf.unwrap();
        assert!(approx_eq!(f32, bssrdf.sigma_t()[0], 11.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, bssrdf.sigma_t()[2], 13.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, bssrdf.eta(), 1.33, epsilon = 1e-6));

        let bsdf = sf.bsdf.unwrap();
        assert_eq!(bsdf.eta, 1.33);
        assert_eq!(bsdf.num_components(BxDFType::ALL), 1);
    }

    #[test]
    fn negative_scale_clamps_coefficients_to_zero() {
        let mut ps = ParamSet::new();
        ps.add_float("scale", &[-2.0]);
        let m = SubsurfaceMaterial::try_from(&TextureParams::from_material_params(ps)).unwrap();

        let mut si = hit();
        let sf = m.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut RNG::new(0));
        let bssrdf = sf.bssrdf.unwrap();
        assert!(bssrdf.sigma_t().is_black());
        assert_eq!(bssrdf.sample_sr(0, 0.5), None);
    }

    #[test]
    fn black_boundary_has_no_bssrdf() {
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("Kr", &[0.0, 0.0, 0.0]);
        ps.add_rgb_spectrum("Kt", &[0.0, 0.0, 0.0]);
        let m = SubsurfaceMaterial::try_from(&TextureParams::from_material_params(ps)).unwrap();
        let sf = m.compute_scattering_functions(&mut hit(), TransportMode::Importance, false, &mut RNG::new(0));
        assert!(sf.bssrdf.is_none());
        assert_eq!(sf.bsdf.unwrap().num_components(BxDFType::ALL), 0);
    }
}
