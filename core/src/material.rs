//! Material

use crate::bssrdf::TabulatedBSSRDF;
use crate::interaction::SurfaceInteraction;
use crate::modifier::ArcModifier;
use crate::pbrt::Float;
use crate::reflection::BSDF;
use crate::rng::RNG;
use crate::spectrum::Spectrum;
use crate::texture::ArcTexture;
use std::fmt;
use std::sync::Arc;

/// Light transport mode. Non-symmetric scattering (refraction, shading
/// normals) needs to know which quantity is being carried.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransportMode {
    /// Paths started at the camera.
    Radiance,

    /// Paths started at a light.
    Importance,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radiance => write!(f, "Radiance"),
            Self::Importance => write!(f, "Importance"),
        }
    }
}

/// A material's complete response at one surface point.
#[derive(Clone, Debug, Default)]
pub struct ScatteringFunctions {
    pub bsdf: Option<BSDF>,
    pub bssrdf: Option<TabulatedBSSRDF>,
}

impl ScatteringFunctions {
    /// Response with a BSDF only.
    pub fn with_bsdf(bsdf: BSDF) -> Self {
        Self {
            bsdf: Some(bsdf),
            bssrdf: None,
        }
    }

    /// Returns true if neither function is present.
    pub fn is_empty(&self) -> bool {
        self.bsdf.is_none() && self.bssrdf.is_none()
    }
}

/// A node referenced by a material, modifier or texture.
#[derive(Clone)]
pub enum Child {
    FloatTexture(ArcTexture<Float>),
    SpectrumTexture(ArcTexture<Spectrum>),
    Modifier(ArcModifier),
    Material(ArcMaterial),
}

impl Child {
    /// Children of the referenced node.
    pub fn children(&self) -> Vec<Child> {
        match self {
            Child::FloatTexture(t) => t.children(),
            Child::SpectrumTexture(t) => t.children(),
            Child::Modifier(m) => m.children(),
            Child::Material(m) => m.children(),
        }
    }

    /// Short label for the kind of node.
    pub fn kind(&self) -> &'static str {
        match self {
            Child::FloatTexture(_) => "float texture",
            Child::SpectrumTexture(_) => "spectrum texture",
            Child::Modifier(_) => "modifier",
            Child::Material(_) => "material",
        }
    }
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Child({})", self.kind())
    }
}

/// Turns textures and parameters into scattering functions at a point.
pub trait Material {
    /// Name of the material kind.
    fn name(&self) -> &'static str;

    /// Radiance emitted at `si`.
    ///
    /// * `si` - The surface interaction.
    fn emittance(&self, si: &SurfaceInteraction) -> Spectrum;

    /// Applies the material's modifier to `si`, then builds the BSDF and
    /// optional BSSRDF. Stochastic lobe choices draw from `rng`.
    ///
    /// * `si`                   - The surface interaction.
    /// * `mode`                 - Transport mode.
    /// * `allow_multiple_lobes` - Whether a single BxDF may aggregate several
    ///                            kinds of scattering, as FresnelSpecular does.
    /// * `rng`                  - Sampling context.
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        allow_multiple_lobes: bool,
        rng: &mut RNG,
    ) -> ScatteringFunctions;

    /// Textures, modifiers and materials this material references.
    fn children(&self) -> Vec<Child>;
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material + Send + Sync>;
