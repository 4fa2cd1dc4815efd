//! Scale Texture

use super::*;
use shading::interaction::SurfaceInteraction;
use shading::material::Child;

/// Product of two textures.
#[derive(Clone)]
pub struct ScaleTexture<T> {
    tex1: ArcTexture<T>,
    tex2: ArcTexture<T>,
}

impl<T> ScaleTexture<T> {
    /// Create a new `ScaleTexture`.
    ///
    /// * `tex1` - The first texture.
    /// * `tex2` - The second texture.
    pub fn new(tex1: ArcTexture<T>, tex2: ArcTexture<T>) -> Self {
        Self { tex1, tex2 }
    }
}

macro_rules! scale_texture {
    ($t: ty, $child: ident, $try_get_func: ident, $default: expr, $constant: ident) => {
        impl Texture<$t> for ScaleTexture<$t> {
            fn evaluate(&self, si: &SurfaceInteraction) -> $t {
                self.tex1.evaluate(si) * self.tex2.evaluate(si)
            }

            fn children(&self) -> Vec<Child> {
                vec![
                    Child::$child(Arc::clone(&self.tex1)),
                    Child::$child(Arc::clone(&self.tex2)),
                ]
            }
        }

        impl TryFrom<&TextureParams> for ScaleTexture<$t> {
            type Error = String;

            /// Reads `tex1` and `tex2`, each defaulting to one.
            fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
                let tex1 = tp.$try_get_func("tex1", $default, $constant)?;
                let tex2 = tp.$try_get_func("tex2", $default, $constant)?;
                Ok(Self::new(tex1, tex2))
            }
        }
    };
}
scale_texture!(Float, FloatTexture, try_get_float_texture, 1.0, float_constant);
scale_texture!(Spectrum, SpectrumTexture, try_get_spectrum_texture, Spectrum::ONE, spectrum_constant);

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use shading::geometry::*;
    use shading::paramset::ParamSet;
    use std::collections::HashMap;

    #[test]
    fn multiplies_referenced_textures() {
        let si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        let mut ps = ParamSet::new();
        ps.add_texture("tex1", &["half".to_string()]);
        ps.add_float("tex2", &[0.3]);
        let mut floats = FloatTextureMap::new();
        floats.insert("half".to_string(), float_constant(0.5));
        let tp = TextureParams::new(ParamSet::new(), ps, floats, HashMap::new());

        let tex = ScaleTexture::<Float>::try_from(&tp).unwrap();
        assert!(approx_eq!(f32, tex.evaluate(&si), 0.15, epsilon = 1e-6));
        assert_eq!(tex.children().len(), 2);
    }
}
