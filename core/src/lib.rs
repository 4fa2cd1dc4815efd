//! Shading
//!
//! Per-point surface scattering: Fresnel optics, microfacet distributions,
//! BxDF lobes and their BSDF aggregate, tabulated subsurface scattering and
//! the material contract that ties them to textures.

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

pub mod bssrdf;
pub mod geometry;
pub mod interaction;
pub mod interpolation;
pub mod material;
pub mod microfacet;
pub mod modifier;
pub mod paramset;
pub mod pbrt;
pub mod reflection;
pub mod rng;
pub mod sampling;
pub mod spectrum;
pub mod texture;
