//! Common

use shading::interaction::SurfaceInteraction;
use shading::material::{Child, TransportMode};
use shading::microfacet::TrowbridgeReitzDistribution;
use shading::modifier::{ArcModifier, BumpModifier, NoOpModifier};
use shading::paramset::TextureParams;
use shading::pbrt::*;
use shading::reflection::*;
use shading::spectrum::Spectrum;
use shading::texture::*;
use std::sync::Arc;
use textures::{float_constant, spectrum_constant};

/// Smallest index of refraction a material will use.
const MIN_ETA: Float = 1e-4;

/// Smallest alpha used where a lobe is always glossy.
const MIN_ALPHA: Float = 1e-3;

/// Parts every material carries: the modifier run ahead of texture lookups
/// and the emission texture.
#[derive(Clone)]
pub struct SurfaceCommon {
    modifier: ArcModifier,
    emission: ArcTexture<Spectrum>,
}

impl SurfaceCommon {
    /// Create a new `SurfaceCommon`.
    ///
    /// * `modifier` - Shading geometry modifier.
    /// * `emission` - Emitted radiance.
    pub fn new(modifier: ArcModifier, emission: ArcTexture<Spectrum>) -> Self {
        Self { modifier, emission }
    }

    /// Applies the modifier. Called once per evaluation, before anything
    /// reads a texture.
    pub fn modify(&self, si: &mut SurfaceInteraction) {
        self.modifier.modify(si);
    }

    /// Emitted radiance at `si`.
    pub fn emittance(&self, si: &SurfaceInteraction) -> Spectrum {
        self.emission.evaluate(si).clamp_default()
    }

    /// The modifier and emission texture.
    pub fn children(&self) -> Vec<Child> {
        vec![
            Child::Modifier(Arc::clone(&self.modifier)),
            Child::SpectrumTexture(Arc::clone(&self.emission)),
        ]
    }
}

impl Default for SurfaceCommon {
    fn default() -> Self {
        Self::new(Arc::new(NoOpModifier), spectrum_constant(Spectrum::ZERO))
    }
}

impl TryFrom<&TextureParams> for SurfaceCommon {
    type Error = String;

    /// Reads `bumpmap` and `emission`.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let modifier: ArcModifier = match tp.try_get_float_texture_or_none("bumpmap", float_constant)? {
            Some(displacement) => Arc::new(BumpModifier::new(displacement)),
            None => Arc::new(NoOpModifier),
        };
        let emission = spectrum_texture(tp, "emission", Spectrum::ZERO)?;
        Ok(Self::new(modifier, emission))
    }
}

/// Resolves a float texture parameter, failing on undefined references.
///
/// * `tp`      - Texture parameters.
/// * `name`    - Parameter name.
/// * `default` - Value when absent.
pub fn float_texture(tp: &TextureParams, name: &str, default: Float) -> Result<ArcTexture<Float>, String> {
    tp.try_get_float_texture(name, default, float_constant)
}

/// Resolves a spectrum texture parameter, failing on undefined references.
///
/// * `tp`      - Texture parameters.
/// * `name`    - Parameter name.
/// * `default` - Value when absent.
pub fn spectrum_texture(
    tp: &TextureParams,
    name: &str,
    default: Spectrum,
) -> Result<ArcTexture<Spectrum>, String> {
    tp.try_get_spectrum_texture(name, default, spectrum_constant)
}

/// Keeps an index of refraction strictly positive.
pub fn positive_eta(eta: Float) -> Float {
    max(eta, MIN_ETA)
}

/// Microfacet roughness pair read from textures.
#[derive(Clone)]
pub struct Roughness {
    pub u: ArcTexture<Float>,
    pub v: ArcTexture<Float>,
    pub remap: bool,
}

impl Roughness {
    /// Reads the two roughness parameters and `remaproughness`.
    ///
    /// * `tp`      - Texture parameters.
    /// * `u_name`  - Parameter for the u direction.
    /// * `v_name`  - Parameter for the v direction.
    /// * `default` - Roughness when absent.
    pub fn from_params(tp: &TextureParams, u_name: &str, v_name: &str, default: Float) -> Result<Self, String> {
        Ok(Self {
            u: float_texture(tp, u_name, default)?,
            v: float_texture(tp, v_name, default)?,
            remap: tp.find_bool("remaproughness", true),
        })
    }

    /// Microfacet alphas at `si`, or `None` when the surface is smooth.
    /// Negative roughness counts as zero.
    pub fn alpha(&self, si: &SurfaceInteraction) -> Option<(Float, Float)> {
        let u = max(self.u.evaluate(si), 0.0);
        let v = max(self.v.evaluate(si), 0.0);
        if u == 0.0 && v == 0.0 {
            None
        } else if self.remap {
            Some((
                TrowbridgeReitzDistribution::roughness_to_alpha(u),
                TrowbridgeReitzDistribution::roughness_to_alpha(v),
            ))
        } else {
            Some((u, v))
        }
    }

    /// Microfacet alphas at `si` for lobes that are always glossy.
    pub fn glossy_alpha(&self, si: &SurfaceInteraction) -> (Float, Float) {
        self.alpha(si)
            .map(|(ax, ay)| (max(ax, MIN_ALPHA), max(ay, MIN_ALPHA)))
            .unwrap_or((MIN_ALPHA, MIN_ALPHA))
    }

    pub fn children(&self) -> Vec<Child> {
        vec![
            Child::FloatTexture(Arc::clone(&self.u)),
            Child::FloatTexture(Arc::clone(&self.v)),
        ]
    }
}

/// Adds the reflection and transmission lobes of a dielectric interface
/// with `eta` inside and vacuum outside.
///
/// * `bsdf`                 - BSDF to add to.
/// * `r`                    - Reflection scale.
/// * `t`                    - Transmission scale.
/// * `alpha`                - Microfacet alphas; `None` for a smooth surface.
/// * `eta`                  - Index of refraction inside.
/// * `mode`                 - Transport mode.
/// * `allow_multiple_lobes` - Whether a smooth interface may use the single
///                            aggregate `FresnelSpecular` lobe.
pub fn add_dielectric_lobes(
    bsdf: &mut BSDF,
    r: Spectrum,
    t: Spectrum,
    alpha: Option<(Float, Float)>,
    eta: Float,
    mode: TransportMode,
    allow_multiple_lobes: bool,
) {
    if r.is_black() && t.is_black() {
        return;
    }
    match alpha {
        None if allow_multiple_lobes => {
            bsdf.add(FresnelSpecular::new(r, t, 1.0, eta, mode).into());
        }
        None => {
            if !r.is_black() {
                bsdf.add(SpecularReflection::new(r, Fresnel::dielectric(1.0, eta)).into());
            }
            if !t.is_black() {
                bsdf.add(SpecularTransmission::new(t, 1.0, eta, mode).into());
            }
        }
        Some((ax, ay)) => {
            let distribution = TrowbridgeReitzDistribution::new(ax, ay, true);
            if !r.is_black() {
                bsdf.add(
                    MicrofacetReflection::new(r, distribution.into(), Fresnel::dielectric(1.0, eta))
                        .into(),
                );
            }
            if !t.is_black() {
                bsdf.add(MicrofacetTransmission::new(t, distribution.into(), 1.0, eta, mode).into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shading::geometry::*;
    use shading::paramset::ParamSet;

    #[test]
    fn smooth_interface_aggregates_when_allowed() {
        let si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        let mut bsdf = BSDF::new(&si, 1.5);
        add_dielectric_lobes(&mut bsdf, Spectrum::ONE, Spectrum::ONE, None, 1.5, TransportMode::Radiance, true);
        assert_eq!(bsdf.num_components(BxDFType::ALL), 1);

        let mut split = BSDF::new(&si, 1.5);
        add_dielectric_lobes(&mut split, Spectrum::ONE, Spectrum::ONE, None, 1.5, TransportMode::Radiance, false);
        assert_eq!(split.num_components(BxDFType::ALL), 2);
    }

    #[test]
    fn negative_roughness_is_clamped() {
        let si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        let mut ps = ParamSet::new();
        ps.add_float("roughness", &[-0.5]);
        ps.add_bool("remaproughness", &[false]);
        let tp = TextureParams::from_material_params(ps);
        let r = Roughness::from_params(&tp, "roughness", "roughness", 0.1).unwrap();
        assert_eq!(r.alpha(&si), None);
    }

    #[test]
    fn eta_stays_positive() {
        assert_eq!(positive_eta(1.5), 1.5);
        assert!(positive_eta(-2.0) > 0.0);
    }
}
