//! Constant Texture

use shading::interaction::SurfaceInteraction;
use shading::paramset::TextureParams;
use shading::pbrt::*;
use shading::spectrum::*;
use shading::texture::*;
use std::sync::Arc;

/// Returns the same value everywhere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantTexture<T> {
    value: T,
}

impl<T> ConstantTexture<T> {
    /// Create a new `ConstantTexture<T>`.
    ///
    /// * `value` - The texture value.
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Copy> Texture<T> for ConstantTexture<T> {
    fn evaluate(&self, _si: &SurfaceInteraction) -> T {
        self.value
    }
}

/// Wraps a float in a shared constant texture.
pub fn float_constant(v: Float) -> ArcTexture<Float> {
    Arc::new(ConstantTexture::new(v))
}

/// Wraps a spectrum in a shared constant texture.
pub fn spectrum_constant(v: Spectrum) -> ArcTexture<Spectrum> {
    Arc::new(ConstantTexture::new(v))
}

macro_rules! from_params {
    ($t: ty, $find_func: ident, $default: expr) => {
        impl From<&TextureParams> for ConstantTexture<$t> {
            /// Reads `value`, defaulting to one.
            fn from(tp: &TextureParams) -> Self {
                Self::new(tp.$find_func("value", $default))
            }
        }
    };
}
from_params!(Float, find_float, 1.0);
from_params!(Spectrum, find_spectrum, Spectrum::ONE);

#[cfg(test)]
mod tests {
    use super::*;
    use shading::geometry::*;
    use shading::paramset::ParamSet;

    #[test]
    fn reads_value_parameter() {
        let si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("value", &[0.1, 0.2, 0.3]);
        let tp = TextureParams::from_material_params(ps);
        assert_eq!(
            ConstantTexture::<Spectrum>::from(&tp).evaluate(&si),
            Spectrum::from_rgb(0.1, 0.2, 0.3)
        );
        assert_eq!(ConstantTexture::<Float>::from(&tp).evaluate(&si), 1.0);
    }
}
