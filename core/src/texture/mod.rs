//! Textures

use crate::interaction::SurfaceInteraction;
use crate::material::Child;
use crate::pbrt::Float;
use crate::spectrum::Spectrum;
use std::collections::HashMap;
use std::sync::Arc;

/// A value that varies over a surface.
pub trait Texture<T: Copy> {
    /// Evaluates the texture at a surface interaction.
    ///
    /// * `si` - The surface interaction.
    fn evaluate(&self, si: &SurfaceInteraction) -> T;

    /// Textures this texture reads from.
    fn children(&self) -> Vec<Child> {
        vec![]
    }
}

/// Atomic reference counted `Texture`.
pub type ArcTexture<T> = Arc<dyn Texture<T> + Send + Sync>;

/// Named float textures.
pub type FloatTextureMap = HashMap<String, ArcTexture<Float>>;

/// Named spectrum textures.
pub type SpectrumTextureMap = HashMap<String, ArcTexture<Spectrum>>;
