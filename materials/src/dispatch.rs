//! Dispatch Material
//!
//! Delegates every query to another material chosen per intersection. The
//! choice is a tagged rule over an explicit table so the material graph
//! stays inspectable.

use crate::matte::MatteMaterial;
use shading::interaction::{ShapeId, SurfaceInteraction};
use shading::material::*;
use shading::rng::RNG;
use shading::spectrum::Spectrum;
use std::collections::HashMap;
use std::sync::Arc;

/// Chooses a material for an intersection.
#[derive(Clone)]
pub enum DispatchRule {
    /// Looks the hit shape up in `table`, then falls back to `default`.
    ByShape {
        table: HashMap<ShapeId, ArcMaterial>,
        default: Option<ArcMaterial>,
    },
}

impl DispatchRule {
    /// The material the rule picks, if any.
    ///
    /// * `si` - The surface interaction.
    pub fn select(&self, si: &SurfaceInteraction) -> Option<&ArcMaterial> {
        match self {
            Self::ByShape { table, default } => si
                .shape_id
                .and_then(|id| table.get(&id))
                .or(default.as_ref()),
        }
    }

    /// Every material the rule can pick, ordered by shape.
    pub fn materials(&self) -> Vec<ArcMaterial> {
        match self {
            Self::ByShape { table, default } => {
                let mut ids: Vec<&ShapeId> = table.keys().collect();
                ids.sort();
                ids.into_iter()
                    .filter_map(|id| table.get(id))
                    .chain(default.iter())
                    .map(Arc::clone)
                    .collect()
            }
        }
    }
}

/// Pure indirection through a `DispatchRule`. Intersections the rule does
/// not cover use a grey diffuse material.
#[derive(Clone)]
pub struct DispatchMaterial {
    rule: DispatchRule,
    fallback: ArcMaterial,
}

impl DispatchMaterial {
    /// Create a new `DispatchMaterial`.
    ///
    /// * `rule` - Selection rule.
    pub fn new(rule: DispatchRule) -> Self {
        Self {
            rule,
            fallback: Arc::new(MatteMaterial::default()),
        }
    }

    /// The material that handles `si`.
    ///
    /// * `si` - The surface interaction.
    pub fn resolve(&self, si: &SurfaceInteraction) -> &ArcMaterial {
        self.rule.select(si).unwrap_or(&self.fallback)
    }
}

impl Material for DispatchMaterial {
    fn name(&self) -> &'static str {
        "dispatch"
    }

    fn emittance(&self, si: &SurfaceInteraction) -> Spectrum {
        self.resolve(si).emittance(si)
    }

    /// Forwards to the selected material, which applies its own modifier.
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        allow_multiple_lobes: bool,
        rng: &mut RNG,
    ) -> ScatteringFunctions {
        let target = Arc::clone(self.resolve(si));
        target.compute_scattering_functions(si, mode, allow_multiple_lobes, rng)
    }

    fn children(&self) -> Vec<Child> {
        self.rule
            .materials()
            .into_iter()
            .chain(std::iter::once(Arc::clone(&self.fallback)))
            .map(Child::Material)
            .collect()
    }
}
