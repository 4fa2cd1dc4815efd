//! Materials

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

mod clear_coat;
mod common;
mod dispatch;
mod fourier;
mod glass;
mod kdsubsurface;
mod matte;
mod mirror;
mod plastic;
mod substrate;
mod subsurface;

// Re-export
pub use clear_coat::*;
pub use common::*;
pub use dispatch::*;
pub use fourier::*;
pub use glass::*;
pub use kdsubsurface::*;
pub use matte::*;
pub use mirror::*;
pub use plastic::*;
pub use substrate::*;
pub use subsurface::*;

use shading::interaction::SurfaceInteraction;
use shading::material::*;
use shading::paramset::TextureParams;
use shading::rng::RNG;
use shading::spectrum::Spectrum;

/// Every material kind.
#[derive(Clone)]
pub enum SurfaceMaterial {
    Matte(MatteMaterial),
    Mirror(MirrorMaterial),
    ClearCoat(ClearCoatMaterial),
    Substrate(SubstrateMaterial),
    Subsurface(SubsurfaceMaterial),
    KdSubsurface(KdSubsurfaceMaterial),
    Fourier(FourierMaterial),
    Glass(GlassMaterial),
    Plastic(PlasticMaterial),
    Dispatch(DispatchMaterial),
}

macro_rules! dispatch {
    ($self: ident, $m: ident => $body: expr) => {
        match $self {
            SurfaceMaterial::Matte($m) => $body,
            SurfaceMaterial::Mirror($m) => $body,
            SurfaceMaterial::ClearCoat($m) => $body,
            SurfaceMaterial::Substrate($m) => $body,
            SurfaceMaterial::Subsurface($m) => $body,
            SurfaceMaterial::KdSubsurface($m) => $body,
            SurfaceMaterial::Fourier($m) => $body,
            SurfaceMaterial::Glass($m) => $body,
            SurfaceMaterial::Plastic($m) => $body,
            SurfaceMaterial::Dispatch($m) => $body,
        }
    };
}

impl Material for SurfaceMaterial {
    fn name(&self) -> &'static str {
        dispatch!(self, m => m.name())
    }

    fn emittance(&self, si: &SurfaceInteraction) -> Spectrum {
        dispatch!(self, m => m.emittance(si))
    }

    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        allow_multiple_lobes: bool,
        rng: &mut RNG,
    ) -> ScatteringFunctions {
        dispatch!(self, m => m.compute_scattering_functions(si, mode, allow_multiple_lobes, rng))
    }

    fn children(&self) -> Vec<Child> {
        dispatch!(self, m => m.children())
    }
}

macro_rules! surface_material_from {
    ($($variant: ident($t: ty)),+ $(,)?) => {
        $(
            impl From<$t> for SurfaceMaterial {
                fn from(m: $t) -> Self {
                    Self::$variant(m)
                }
            }
        )+
    };
}

surface_material_from!(
    Matte(MatteMaterial),
    Mirror(MirrorMaterial),
    ClearCoat(ClearCoatMaterial),
    Substrate(SubstrateMaterial),
    Subsurface(SubsurfaceMaterial),
    KdSubsurface(KdSubsurfaceMaterial),
    Fourier(FourierMaterial),
    Glass(GlassMaterial),
    Plastic(PlasticMaterial),
    Dispatch(DispatchMaterial),
);

/// Names accepted by `create_material`.
pub const MATERIAL_NAMES: [&str; 9] = [
    "matte",
    "mirror",
    "clearcoat",
    "substrate",
    "subsurface",
    "kdsubsurface",
    "fourier",
    "glass",
    "plastic",
];

/// Creates a material by name from parameters.
///
/// * `name` - Material type name.
/// * `tp`   - Texture parameters.
pub fn create_material(name: &str, tp: &TextureParams) -> Result<SurfaceMaterial, String> {
    let material: SurfaceMaterial = match name {
        "matte" => MatteMaterial::try_from(tp)?.into(),
        "mirror" => MirrorMaterial::try_from(tp)?.into(),
        "clearcoat" => ClearCoatMaterial::try_from(tp)?.into(),
        "substrate" => SubstrateMaterial::try_from(tp)?.into(),
        "subsurface" => SubsurfaceMaterial::try_from(tp)?.into(),
        "kdsubsurface" => KdSubsurfaceMaterial::try_from(tp)?.into(),
        "fourier" => FourierMaterial::try_from(tp)?.into(),
        "glass" => GlassMaterial::try_from(tp)?.into(),
        "plastic" => PlasticMaterial::try_from(tp)?.into(),
        _ => return Err(format!("Material '{}' unknown", name)),
    };
    debug!("Created material '{}'", name);
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shading::geometry::*;
    use shading::interaction::ShapeId;
    use shading::modifier::Modifier;
    use shading::paramset::ParamSet;
    use shading::texture::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingModifier(AtomicUsize);

    impl Modifier for CountingModifier {
        fn modify(&self, _si: &mut SurfaceInteraction) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn names_round_trip_through_the_factory() {
        for name in MATERIAL_NAMES.iter().filter(|n| **n != "fourier") {
            let m = create_material(name, &TextureParams::default()).unwrap();
            assert_eq!(m.name(), *name);
        }
        assert!(create_material("uber", &TextureParams::default()).is_err());
    }

    #[test]
    fn modifier_runs_once_per_evaluation() {
        let counter = Arc::new(CountingModifier(AtomicUsize::new(0)));
        let common = SurfaceCommon::new(counter.clone(), textures::spectrum_constant(Spectrum::ZERO));
        let kd = textures::spectrum_constant(Spectrum::new(0.5));
        let matte: SurfaceMaterial = MatteMaterial::new(kd, common).into();

        let mut table = HashMap::new();
        table.insert(ShapeId(1), Arc::new(matte) as ArcMaterial);
        let dispatch: SurfaceMaterial = DispatchMaterial::new(DispatchRule::ByShape { table, default: None }).into();

        let mut si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0))
            .with_shape(ShapeId(1));
        dispatch.compute_scattering_functions(&mut si, TransportMode::Radiance, true, &mut RNG::new(0));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn emission_is_reported() {
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("emission", &[1.0, 2.0, 3.0]);
        let m = create_material("matte", &TextureParams::from_material_params(ps)).unwrap();
        let si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(m.emittance(&si), Spectrum::from_rgb(1.0, 2.0, 3.0));
    }

    #[test]
    fn undefined_texture_reference_fails_construction() {
        let mut ps = ParamSet::new();
        ps.add_texture("Ks", &["gloss".to_string()]);
        for name in ["clearcoat", "substrate", "plastic"] {
            assert!(create_material(name, &TextureParams::from_material_params(ps.clone())).is_err());
        }

        let mut ok = FloatTextureMap::new();
        ok.insert("bump".to_string(), textures::float_constant(0.0));
        let mut bump = ParamSet::new();
        bump.add_texture("bumpmap", &["bump".to_string()]);
        let tp = TextureParams::new(ParamSet::new(), bump, ok, HashMap::new());
        let m = create_material("matte", &tp).unwrap();
        assert!(m.children().iter().any(|c| c.kind() == "modifier"));
    }
}
