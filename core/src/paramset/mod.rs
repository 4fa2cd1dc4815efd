//! Parameter Sets

use crate::pbrt::*;
use crate::spectrum::*;
use crate::texture::*;
use std::collections::HashMap;
use std::fmt;

mod texture_params;

// Re-export
pub use texture_params::*;

/// Values stored under one parameter name.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSetItem<T> {
    pub values: Vec<T>,
}

impl<T> ParamSetItem<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }
}

/// A hashmap of parameter set items stored by name.
pub type ParamSetMap<T> = HashMap<String, ParamSetItem<T>>;

/// Named, typed parameter lists used to configure materials.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamSet {
    pub bools: ParamSetMap<bool>,
    pub ints: ParamSetMap<Int>,
    pub floats: ParamSetMap<Float>,
    pub spectra: ParamSetMap<Spectrum>,
    pub strings: ParamSetMap<String>,

    /// Names of textures, looked up in `TextureParams`.
    pub textures: ParamSetMap<String>,
}

macro_rules! paramset_add {
    ($func: ident, $t: ty, $paramset: ident) => {
        /// Adds or replaces a parameter.
        pub fn $func(&mut self, name: &str, values: &[$t]) {
            self.$paramset
                .insert(name.to_string(), ParamSetItem::new(values.to_vec()));
        }
    };
}

macro_rules! paramset_find_one {
    ($func: ident, $t: ty, $paramset: ident) => {
        /// Returns the single value stored under `name`, or `default` when the
        /// parameter is missing or holds several values.
        pub fn $func(&self, name: &str, default: $t) -> $t {
            match self.$paramset.get(name) {
                Some(param) if param.values.len() == 1 => param.values[0].clone(),
                _ => default,
            }
        }
    };
}

macro_rules! paramset_find {
    ($func: ident, $t: ty, $paramset: ident) => {
        /// Returns every value stored under `name`.
        pub fn $func(&self, name: &str) -> Vec<$t> {
            self.$paramset
                .get(name)
                .map_or_else(Vec::new, |param| param.values.clone())
        }
    };
}

macro_rules! display_param {
    ($params: expr, $param_type: literal, $formatter: expr) => {
        let mut names: Vec<_> = $params.keys().collect();
        names.sort();
        for name in names {
            let values: Vec<String> = $params[name].values.iter().map(|v| format!("{}", v)).collect();
            writeln!($formatter, "\"{} {}\" [{}]", $param_type, name, values.join(" "))?;
        }
    };
}

impl ParamSet {
    /// Returns a new empty `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    paramset_find_one!(find_one_bool, bool, bools);
    paramset_find!(find_bool, bool, bools);
    paramset_add!(add_bool, bool, bools);

    paramset_find_one!(find_one_int, Int, ints);
    paramset_find!(find_int, Int, ints);
    paramset_add!(add_int, Int, ints);

    paramset_find_one!(find_one_float, Float, floats);
    paramset_find!(find_float, Float, floats);
    paramset_add!(add_float, Float, floats);

    paramset_find_one!(find_one_string, String, strings);
    paramset_find!(find_string, String, strings);
    paramset_add!(add_string, String, strings);

    paramset_find_one!(find_one_texture, String, textures);
    paramset_find!(find_texture, String, textures);
    paramset_add!(add_texture, String, textures);

    paramset_find_one!(find_one_spectrum, Spectrum, spectra);
    paramset_find!(find_spectrum, Spectrum, spectra);
    paramset_add!(add_spectrum, Spectrum, spectra);

    /// Adds or replaces RGB spectra given as a flat list of triples. Trailing
    /// values that do not form a triple are ignored.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - RGB values in a linear slice.
    pub fn add_rgb_spectrum(&mut self, name: &str, values: &[Float]) {
        if values.len() % 3 != 0 {
            warn!(
                "RGB parameter '{}' has {} values; ignoring the trailing {}",
                name,
                values.len(),
                values.len() % 3
            );
        }
        let spectra = values
            .chunks_exact(3)
            .map(|rgb| Spectrum::from_rgb(rgb[0], rgb[1], rgb[2]))
            .collect();
        self.spectra
            .insert(name.to_string(), ParamSetItem::new(spectra));
    }

    /// Returns true if no parameters are stored.
    pub fn is_empty(&self) -> bool {
        self.bools.is_empty()
            && self.ints.is_empty()
            && self.floats.is_empty()
            && self.spectra.is_empty()
            && self.strings.is_empty()
            && self.textures.is_empty()
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_param!(self.bools, "bool", f);
        display_param!(self.ints, "integer", f);
        display_param!(self.floats, "float", f);
        display_param!(self.spectra, "rgb", f);
        display_param!(self.strings, "string", f);
        display_param!(self.textures, "texture", f);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_one_requires_single_value() {
        let mut ps = ParamSet::new();
        ps.add_float("roughness", &[0.2]);
        ps.add_float("pair", &[0.1, 0.3]);
        assert_eq!(ps.find_one_float("roughness", 1.0), 0.2);
        assert_eq!(ps.find_one_float("pair", 1.0), 1.0);
        assert_eq!(ps.find_one_float("missing", 0.7), 0.7);
        assert_eq!(ps.find_float("pair"), vec![0.1, 0.3]);
    }

    #[test]
    fn rgb_triples_are_grouped() {
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("Kd", &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.9]);
        let kd = ps.find_spectrum("Kd");
        assert_eq!(kd.len(), 2);
        assert_eq!(kd[1], Spectrum::from_rgb(0.4, 0.5, 0.6));
    }

    #[test]
    fn display_is_sorted() {
        let mut ps = ParamSet::new();
        ps.add_float("b", &[2.0]);
        ps.add_float("a", &[1.0]);
        ps.add_bool("remaproughness", &[false]);
        assert_eq!(
            format!("{}", ps),
            "\"bool remaproughness\" [false]\n\"float a\" [1]\n\"float b\" [2]\n"
        );
    }
}
