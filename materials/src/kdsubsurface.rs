//! KdSubsurface Material

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

/// Subsurface scattering specified by its diffuse reflectance and mean free
/// path instead of scattering coefficients.
#[derive(Clone)]
pub struct KdSubsurfaceMaterial {
    /// Scale factor for the mean free path.
    scale: Float,

    /// Diffuse reflectance of the medium.
    kd: ArcTexture<Spectrum>,

    /// Coefficient of specular reflection at the boundary.
    kr: ArcTexture<Spectrum>,

    /// Coefficient of specular transmission at the boundary.
    kt: ArcTexture<Spectrum>,

    /// Mean free path.
    mfp: ArcTexture<Spectrum>,

    roughness: Roughness,
    eta: Float,
    table: Arc<BSSRDFTable>,
    common: SurfaceCommon,
}

impl KdSubsurfaceMaterial {
    /// Create a new `KdSubsurfaceMaterial`. Builds the profile table.
    ///
    /// * `scale`     - Scale factor for the mean free path.
    /// * `kd`        - Diffuse reflectance.
    /// * `kr`        - Coefficient of specular reflection.
    /// * `kt`        - Coefficient of specular transmission.
    /// * `mfp`       - Mean free path.
    /// * `g`         - Henyey-Greenstein asymmetry parameter.
    /// * `eta`       - Index of refraction of the medium.
    /// * `roughness` - Boundary roughness.
    /// * `common`    - Modifier and emission.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scale: Float,
        kd: ArcTexture<Spectrum>,
        kr: ArcTexture<Spectrum>,
        kt: ArcTexture<Spectrum>,
        mfp: ArcTexture<Spectrum>,
        g: Float,
        eta: Float,
        roughness: Roughness,
        common: SurfaceCommon,
    ) -> Self {
        let eta = positive_eta(eta);
        Self {
            scale,
            kd,
            kr,
            kt,
            mfp,
            roughness,
            eta,
            table: Arc::new(BSSRDFTable::with_defaults(g, eta)),
            common,
        }
    }
}

impl Material for KdSubsurfaceMaterial {
    fn name(&self) -> &'static str {
        "kdsubsurface"
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

        let mfree = (self.mfp.evaluate(si) * self.scale).clamp_default();
        let kd = self.kd.evaluate(si).clamp_default();
        let (sig_a, sig_s) = subsurface_from_diffuse(&self.table, &kd, &mfree);
        ScatteringFunctions {
            bsdf: Some(bsdf),
            bssrdf: Some(TabulatedBSSRDF::new(si, self.eta, mode, sig_a, sig_s, Arc::clone(&self.table))),
        }
    }

    fn children(&self) -> Vec<Child> {
        let mut children = vec![
            Child::SpectrumTexture(Arc::clone(&self.kd)),
            Child::SpectrumTexture(Arc::clone(&self.kr)),
            Child::SpectrumTexture(Arc::clone(&self.kt)),
            Child::SpectrumTexture(Arc::clone(&self.mfp)),
        ];
        children.extend(self.roughness.children());
        children.extend(self.common.children());
        children
    }
}

impl TryFrom<&TextureParams> for KdSubsurfaceMaterial {
    type Error = String;

    /// Create a diffuse-driven subsurface material from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let kd = spectrum_texture(tp, "Kd", Spectrum::new(0.5))?;
        let mfp = spectrum_texture(tp, "mfp", Spectrum::ONE)?;
        let kr = spectrum_texture(tp, "Kr", Spectrum::ONE)?;
        let kt = spectrum_texture(tp, "Kt", Spectrum::ONE)?;
        let roughness = Roughness::from_params(tp, "uroughness", "vroughness", 0.0)?;
        Ok(Self::new(
            tp.find_float("scale", 1.0),
            kd,
            kr,
            kt,
            mfp,
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

    #[test]
    fn coefficients_reproduce_the_diffuse_reflectance() {
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("Kd", &[0.1, 0.2, 0.3]);
        ps.add_rgb_spectrum("mfp", &[0.5, 0.5, 0.5]);
        let m = KdSubsurfaceMaterial::try_from(&TextureParams::from_material_params(ps)).unwrap();

        let mut si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        let sf = m.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut RNG::new(0));
        let bssrdf = sf.bssrdf.unwrap();

        // sigma_t = 1 / mfp regardless of albedo.
        for c in 0..3 {
            assert!(approx_eq!(f32, bssrdf.sigma_t()[c], 2.0, epsilon = 1e-4));
        }
        let expected = [0.1, 0.2, 0.3];
        for (c, kd) in expected.iter().enumerate() {
            let rho_eff = m.table.rho_eff_value(bssrdf.rho()[c]);
            assert!(approx_eq!(f32, rho_eff, *kd, epsilon = 2e-3));
        }
    }

    #[test]
    fn negative_scale_leaves_no_medium() {
        let mut ps = ParamSet::new();
        ps.add_float("scale", &[-1.0]);
        let m = KdSubsurfaceMaterial::try_from(&TextureParams::from_material_params(ps)).unwrap();

        let mut si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        let sf = m.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut RNG::new(0));
        let bssrdf = sf.bssrdf.unwrap();
        assert!(bssrdf.sigma_t().is_black());
        assert_eq!(bssrdf.sample_sr(1, 0.5), None);
    }
}
