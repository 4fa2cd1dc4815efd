//! Parameter list parsing

use crate::options::Options;
use shading::paramset::ParamSet;
use shading::pbrt::Float;

/// Splits `name=value`.
fn split_assignment(arg: &str) -> Result<(&str, &str), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(format!("Expected 'name=value', got '{}'", arg)),
    }
}

fn parse_floats(name: &str, value: &str) -> Result<Vec<Float>, String> {
    value
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<Float>()
                .map_err(|e| format!("Parameter '{}': invalid number '{}': {}", name, v, e))
        })
        .collect()
}

/// Collects every parameter given on the command line.
///
/// * `options` - Parsed command line.
pub fn param_set(options: &Options) -> Result<ParamSet, String> {
    let mut ps = ParamSet::new();

    for arg in options.floats.iter() {
        let (name, value) = split_assignment(arg)?;
        ps.add_float(name, &parse_floats(name, value)?);
    }

    for arg in options.rgbs.iter() {
        let (name, value) = split_assignment(arg)?;
        let rgb = parse_floats(name, value)?;
        if rgb.len() < 3 {
            return Err(format!("Parameter '{}' needs three values, got {}", name, rgb.len()));
        }
        ps.add_rgb_spectrum(name, &rgb);
    }

    for arg in options.bools.iter() {
        let (name, value) = split_assignment(arg)?;
        let b = value
            .parse::<bool>()
            .map_err(|_| format!("Parameter '{}': expected true or false, got '{}'", name, value))?;
        ps.add_bool(name, &[b]);
    }

    for arg in options.strings.iter() {
        let (name, value) = split_assignment(arg)?;
        ps.add_string(name, &[value.to_string()]);
    }

    Ok(ps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use shading::spectrum::Spectrum;

    #[test]
    fn collects_typed_parameters() {
        let options = Options::parse_from([
            "scatter-probe",
            "--material",
            "clearcoat",
            "--float",
            "eta=1.33",
            "--rgb",
            "Kd=0.1,0.2,0.3",
            "--bool",
            "remaproughness=false",
            "--string",
            "bsdffile=paint.bsdf",
        ]);
        let ps = param_set(&options).unwrap();
        assert_eq!(ps.find_one_float("eta", 0.0), 1.33);
        assert_eq!(ps.find_one_spectrum("Kd", Spectrum::ZERO), Spectrum::from_rgb(0.1, 0.2, 0.3));
        assert!(!ps.find_one_bool("remaproughness", true));
        assert_eq!(ps.find_one_string("bsdffile", String::new()), "paint.bsdf");
    }

    #[test]
    fn rejects_malformed_values() {
        let bad_number = Options::parse_from(["scatter-probe", "--float", "eta=glass"]);
        assert!(param_set(&bad_number).is_err());
        let no_name = Options::parse_from(["scatter-probe", "--float", "=1"]);
        assert!(param_set(&no_name).is_err());
        let short_rgb = Options::parse_from(["scatter-probe", "--rgb", "Kd=0.5"]);
        assert!(param_set(&short_rgb).is_err());
    }
}
