//! Fourier Material

use crate::common::*;
use shading::interaction::SurfaceInteraction;
use shading::material::*;
use shading::paramset::TextureParams;
use shading::reflection::*;
use shading::rng::RNG;
use shading::spectrum::Spectrum;
use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};

lazy_static! {
    /// Caches BSDF table data by absolute file path.
    static ref BSDF_TABLES: Mutex<HashMap<String, Arc<FourierBSDFTable>>> = Mutex::new(HashMap::new());
}

/// Loads the table at `path`, reusing an earlier load of the same file.
///
/// * `path` - Path to the Fourier BSDF data file.
pub fn load_fourier_table(path: &str) -> Result<Arc<FourierBSDFTable>, String> {
    let key = fs::canonicalize(path)
        .map_err(|e| format!("Unable to open BSDF file '{}': {}", path, e))?
        .to_string_lossy()
        .into_owned();

    let mut tables = BSDF_TABLES
        .lock()
        .map_err(|_| String::from("BSDF table cache is poisoned"))?;
    if let Some(table) = tables.get(&key) {
        return Ok(Arc::clone(table));
    }

    let table = Arc::new(FourierBSDFTable::from_file(&key)?);
    info!(
        "Loaded BSDF table '{}' ({} channels, {} angles, eta {})",
        key,
        table.n_channels,
        table.mu.len(),
        table.eta
    );
    tables.insert(key, Arc::clone(&table));
    Ok(table)
}

/// Implements materials using measured or synthetic BSDF data that has been
/// tabulated into the directional basis.
#[derive(Clone)]
pub struct FourierMaterial {
    /// Stores the measured Fourier BSDF data.
    bsdf_table: Arc<FourierBSDFTable>,

    common: SurfaceCommon,
}

impl FourierMaterial {
    /// Create a new `FourierMaterial`.
    ///
    /// * `bsdf_table` - Loaded BSDF data.
    /// * `common`     - Modifier and emission.
    pub fn new(bsdf_table: Arc<FourierBSDFTable>, common: SurfaceCommon) -> Self {
        Self { bsdf_table, common }
    }

    /// The shared BSDF data.
    pub fn table(&self) -> &Arc<FourierBSDFTable> {
        &self.bsdf_table
    }
}

impl Material for FourierMaterial {
    fn name(&self) -> &'static str {
        "fourier"
    }

    fn emittance(&self, si: &SurfaceInteraction) -> Spectrum {
        self.common.emittance(si)
    }

    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        _allow_multiple_lobes: bool,
        _rng: &mut RNG,
    ) -> ScatteringFunctions {
        self.common.modify(si);

        let mut bsdf = BSDF::new(si, 1.0);
        bsdf.add(FourierBSDF::new(Arc::clone(&self.bsdf_table), mode).into());
        ScatteringFunctions::with_bsdf(bsdf)
    }

    fn children(&self) -> Vec<Child> {
        self.common.children()
    }
}

impl TryFrom<&TextureParams> for FourierMaterial {
    type Error = String;

    /// Create a Fourier material from given parameter set. `bsdffile` is
    /// required.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let path = tp.find_string("bsdffile", String::new());
        if path.is_empty() {
            return Err(String::from("Fourier material requires a 'bsdffile' parameter"));
        }
        let table = load_fourier_table(&path)?;
        Ok(Self::new(table, SurfaceCommon::try_from(tp)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shading::geometry::*;
    use shading::paramset::ParamSet;
    use std::path::PathBuf;

    fn write_constant_table(file_name: &str, a0: f32) -> PathBuf {
        let table = FourierBSDFTable::constant(vec![-1.0, -0.5, 0.0, 0.5, 1.0], a0, 1.0);
        let path = std::env::temp_dir().join(file_name);
        let mut file = fs::File::create(&path).unwrap();
        table.write(&mut file).unwrap();
        path
    }

    fn params(path: &str) -> TextureParams {
        let mut ps = ParamSet::new();
        ps.add_string("bsdffile", &[path.to_string()]);
        TextureParams::from_material_params(ps)
    }

    #[test]
    fn loads_each_file_once() {
        let path = write_constant_table("materials_fourier_cache.bsdf", 0.3);
        let path = path.to_string_lossy();
        let a = FourierMaterial::try_from(&params(&path)).unwrap();
        let b = FourierMaterial::try_from(&params(&path)).unwrap();
        assert!(Arc::ptr_eq(a.table(), b.table()));

        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let mut si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), wo);
        let sf = a.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut RNG::new(2));
        let bsdf = sf.bsdf.unwrap();
        assert_eq!(bsdf.num_components(BxDFType::ALL), 1);
        assert!(!bsdf.f(&wo, &Vector3f::new(0.0, -0.6, 0.8), BxDFType::ALL).is_black());
    }

    #[test]
    fn missing_bsdffile_is_an_error() {
        let err = FourierMaterial::try_from(&TextureParams::default()).err().unwrap();
        assert!(err.contains("bsdffile"));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let path = std::env::temp_dir().join("materials_fourier_does_not_exist.bsdf");
        assert!(FourierMaterial::try_from(&params(&path.to_string_lossy())).is_err());
    }
}
