//! Textures

use shading::paramset::TextureParams;
use shading::pbrt::Float;
use shading::spectrum::Spectrum;
use shading::texture::*;
use std::sync::Arc;

#[macro_use]
extern crate log;

mod constant;
mod scale;

// Re-export
pub use constant::*;
pub use scale::*;

/// Creates a named float texture from parameters.
///
/// * `name` - Texture type name.
/// * `tp`   - Texture parameters.
pub fn create_float_texture(name: &str, tp: &TextureParams) -> Result<ArcTexture<Float>, String> {
    let tex: ArcTexture<Float> = match name {
        "constant" => Arc::new(ConstantTexture::<Float>::from(tp)),
        "scale" => Arc::new(ScaleTexture::<Float>::try_from(tp)?),
        _ => return Err(format!("Float texture '{}' unknown", name)),
    };
    debug!("Created float texture '{}'", name);
    Ok(tex)
}

/// Creates a named spectrum texture from parameters.
///
/// * `name` - Texture type name.
/// * `tp`   - Texture parameters.
pub fn create_spectrum_texture(
    name: &str,
    tp: &TextureParams,
) -> Result<ArcTexture<Spectrum>, String> {
    let tex: ArcTexture<Spectrum> = match name {
        "constant" => Arc::new(ConstantTexture::<Spectrum>::from(tp)),
        "scale" => Arc::new(ScaleTexture::<Spectrum>::try_from(tp)?),
        _ => return Err(format!("Spectrum texture '{}' unknown", name)),
    };
    debug!("Created spectrum texture '{}'", name);
    Ok(tex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shading::paramset::ParamSet;

    #[test]
    fn unknown_texture_is_an_error() {
        let tp = TextureParams::default();
        assert!(create_float_texture("marble", &tp).is_err());
        assert!(create_spectrum_texture("imagemap", &tp).is_err());
        assert!(create_float_texture("constant", &tp).is_ok());
    }

    #[test]
    fn scale_texture_with_bad_reference_fails() {
        let mut ps = ParamSet::new();
        ps.add_texture("tex1", &["missing".to_string()]);
        let tp = TextureParams::from_material_params(ps);
        assert!(create_float_texture("scale", &tp).is_err());
    }
}
