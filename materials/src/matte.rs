//! Matte Material

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

/// Implements purely diffuse surfaces.
#[derive(Clone)]
pub struct MatteMaterial {
    /// Spectral diffuse reflection.
    kd: ArcTexture<Spectrum>,

    common: SurfaceCommon,
}

impl MatteMaterial {
    /// Create a new `MatteMaterial`.
    ///
    /// * `kd`     - Spectral diffuse reflection.
    /// * `common` - Modifier and emission.
    pub fn new(kd: ArcTexture<Spectrum>, common: SurfaceCommon) -> Self {
        Self { kd, common }
    }
}

impl Default for MatteMaterial {
    /// Grey diffuse with reflectance 0.5.
    fn default() -> Self {
        Self::new(textures::spectrum_constant(Spectrum::new(0.5)), SurfaceCommon::default())
    }
}

impl Material for MatteMaterial {
    fn name(&self) -> &'static str {
        "matte"
    }

    fn emittance(&self, si: &SurfaceInteraction) -> Spectrum {
        self.common.emittance(si)
    }

    /// Adds a Lambertian lobe unless the reflectance is black.
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
        _rng: &mut RNG,
    ) -> ScatteringFunctions {
        self.common.modify(si);

        let mut bsdf = BSDF::new(si, 1.0);
        let r = self.kd.evaluate(si).clamp_default();
        if !r.is_black() {
            bsdf.add(LambertianReflection::new(r).into());
        }
        ScatteringFunctions::with_bsdf(bsdf)
    }

    fn children(&self) -> Vec<Child> {
        let mut children = vec![Child::SpectrumTexture(Arc::clone(&self.kd))];
        children.extend(self.common.children());
        children
    }
}

impl TryFrom<&TextureParams> for MatteMaterial {
    type Error = String;

    /// Create a matte material from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let kd = spectrum_texture(tp, "Kd", Spectrum::new(0.5))?;
        Ok(Self::new(kd, SurfaceCommon::try_from(tp)?))
    }
}
