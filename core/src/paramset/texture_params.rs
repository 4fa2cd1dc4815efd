//! Texture Parameters

use super::*;
use std::sync::Arc;

/// Parameters of one material instance: the material's own `ParamSet`, the
/// shape's `ParamSet` (which takes precedence) and the named textures either
/// may reference.
#[derive(Clone, Default)]
pub struct TextureParams {
    float_textures: FloatTextureMap,
    spectrum_textures: SpectrumTextureMap,

    /// Parameters attached to the shape.
    pub geom_params: ParamSet,

    /// Parameters attached to the material.
    pub mat_params: ParamSet,
}

macro_rules! texture_params_find {
    ($func: ident, $t: ty, $paramset_func: ident) => {
        /// Looks the parameter up in the shape parameters, then the material
        /// parameters, then falls back to `mat_default`.
        pub fn $func(&self, name: &str, mat_default: $t) -> $t {
            let default = self.mat_params.$paramset_func(name, mat_default);
            self.geom_params.$paramset_func(name, default)
        }
    };
}

/// Where a texture-valued parameter came from.
enum Lookup<T> {
    Value(T),
    Texture(String),
    Missing,
}

impl TextureParams {
    /// Create a new `TextureParams`.
    ///
    /// * `geom_params`       - Shape parameters.
    /// * `mat_params`        - Material parameters.
    /// * `float_textures`    - Named float textures.
    /// * `spectrum_textures` - Named spectrum textures.
    pub fn new(
        geom_params: ParamSet,
        mat_params: ParamSet,
        float_textures: FloatTextureMap,
        spectrum_textures: SpectrumTextureMap,
    ) -> Self {
        Self {
            float_textures,
            spectrum_textures,
            geom_params,
            mat_params,
        }
    }

    /// Parameters for a material with no shape overrides and no textures.
    ///
    /// * `mat_params` - Material parameters.
    pub fn from_material_params(mat_params: ParamSet) -> Self {
        Self::new(ParamSet::new(), mat_params, HashMap::new(), HashMap::new())
    }

    /// Resolves `name` to either an inline value or a texture reference,
    /// shape parameters first.
    fn lookup<T: Copy>(&self, name: &str, values: impl Fn(&ParamSet) -> Vec<T>) -> Lookup<T> {
        for params in [&self.geom_params, &self.mat_params] {
            let tex_name = params.find_one_texture(name, String::new());
            if !tex_name.is_empty() {
                return Lookup::Texture(tex_name);
            }
            let v = values(params);
            if v.len() > 1 {
                warn!("Ignoring excess values provided with parameter '{}'", name);
            }
            if let Some(first) = v.first() {
                return Lookup::Value(*first);
            }
        }
        Lookup::Missing
    }

    /// Returns the named float texture if it was defined.
    pub fn get_float_texture(&self, name: &str) -> Option<ArcTexture<Float>> {
        self.float_textures.get(name).map(Arc::clone)
    }

    /// Returns the named spectrum texture if it was defined.
    pub fn get_spectrum_texture(&self, name: &str) -> Option<ArcTexture<Spectrum>> {
        self.spectrum_textures.get(name).map(Arc::clone)
    }

    /// Resolves a float parameter to a texture, failing when it references a
    /// texture that was never defined.
    ///
    /// * `name`            - Parameter name.
    /// * `default`         - Value used when the parameter is absent.
    /// * `constant_tex_fn` - Wraps a value in a constant texture.
    pub fn try_get_float_texture<F>(
        &self,
        name: &str,
        default: Float,
        constant_tex_fn: F,
    ) -> Result<ArcTexture<Float>, String>
    where
        F: Fn(Float) -> ArcTexture<Float>,
    {
        match self.lookup(name, |p| p.find_float(name)) {
            Lookup::Value(v) => Ok(constant_tex_fn(v)),
            Lookup::Missing => Ok(constant_tex_fn(default)),
            Lookup::Texture(tex_name) => self
                .get_float_texture(&tex_name)
                .ok_or_else(|| undefined_texture("float", &tex_name, name)),
        }
    }

    /// Resolves an optional float texture parameter such as a bump map.
    /// Inline values are wrapped with `constant_tex_fn`.
    ///
    /// * `name`            - Parameter name.
    /// * `constant_tex_fn` - Wraps a value in a constant texture.
    pub fn try_get_float_texture_or_none<F>(
        &self,
        name: &str,
        constant_tex_fn: F,
    ) -> Result<Option<ArcTexture<Float>>, String>
    where
        F: Fn(Float) -> ArcTexture<Float>,
    {
        match self.lookup(name, |p| p.find_float(name)) {
            Lookup::Value(v) => Ok(Some(constant_tex_fn(v))),
            Lookup::Missing => Ok(None),
            Lookup::Texture(tex_name) => self
                .get_float_texture(&tex_name)
                .map(Some)
                .ok_or_else(|| undefined_texture("float", &tex_name, name)),
        }
    }

    /// Resolves a spectrum parameter to a texture, failing when it
    /// references a texture that was never defined.
    ///
    /// * `name`            - Parameter name.
    /// * `default`         - Value used when the parameter is absent.
    /// * `constant_tex_fn` - Wraps a value in a constant texture.
    pub fn try_get_spectrum_texture<F>(
        &self,
        name: &str,
        default: Spectrum,
        constant_tex_fn: F,
    ) -> Result<ArcTexture<Spectrum>, String>
    where
        F: Fn(Spectrum) -> ArcTexture<Spectrum>,
    {
        match self.lookup(name, |p| p.find_spectrum(name)) {
            Lookup::Value(v) => Ok(constant_tex_fn(v)),
            Lookup::Missing => Ok(constant_tex_fn(default)),
            Lookup::Texture(tex_name) => self
                .get_spectrum_texture(&tex_name)
                .ok_or_else(|| undefined_texture("spectrum", &tex_name, name)),
        }
    }

    texture_params_find!(find_float, Float, find_one_float);
    texture_params_find!(find_string, String, find_one_string);
    texture_params_find!(find_int, Int, find_one_int);
    texture_params_find!(find_bool, bool, find_one_bool);
    texture_params_find!(find_spectrum, Spectrum, find_one_spectrum);
}

fn undefined_texture(kind: &str, tex_name: &str, param: &str) -> String {
    format!(
        "Couldn't find {} texture named '{}' for parameter '{}'",
        kind, tex_name, param
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::SurfaceInteraction;
    use crate::geometry::*;

    struct Fixed(Float);

    impl Texture<Float> for Fixed {
        fn evaluate(&self, _si: &SurfaceInteraction) -> Float {
            self.0
        }
    }

    fn constant(v: Float) -> ArcTexture<Float> {
        Arc::new(Fixed(v))
    }

    fn si() -> SurfaceInteraction {
        SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0))
    }

    #[test]
    fn shape_params_override_material_params() {
        let mut geom = ParamSet::new();
        geom.add_float("roughness", &[0.5]);
        let mut mat = ParamSet::new();
        mat.add_float("roughness", &[0.1]);
        mat.add_float("eta", &[1.33]);
        let tp = TextureParams::new(geom, mat, HashMap::new(), HashMap::new());

        assert_eq!(tp.find_float("roughness", 0.0), 0.5);
        assert_eq!(tp.find_float("eta", 1.5), 1.33);
        let tex = tp.try_get_float_texture("roughness", 0.0, constant).unwrap();
        assert_eq!(tex.evaluate(&si()), 0.5);
    }

    #[test]
    fn named_texture_is_resolved() {
        let mut mat = ParamSet::new();
        mat.add_texture("bumpmap", &["bumps".to_string()]);
        let mut float_textures = FloatTextureMap::new();
        float_textures.insert("bumps".to_string(), constant(0.25));
        let tp = TextureParams::new(ParamSet::new(), mat, float_textures, HashMap::new());

        let tex = tp.try_get_float_texture_or_none("bumpmap", constant).unwrap();
        assert_eq!(tex.map(|t| t.evaluate(&si())), Some(0.25));
    }

    #[test]
    fn undefined_texture_is_an_error() {
        let mut mat = ParamSet::new();
        mat.add_texture("roughness", &["nowhere".to_string()]);
        let tp = TextureParams::from_material_params(mat);

        let err = tp.try_get_float_texture("roughness", 0.1, constant).err();
        assert!(err.map_or(false, |e| e.contains("nowhere")));
    }

    #[test]
    fn missing_optional_texture_is_none() {
        let tp = TextureParams::default();
        assert!(tp.try_get_float_texture_or_none("bumpmap", constant).unwrap().is_none());
    }
}
