//! Microfacet Distribution Models

use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;

mod trowbridge_reitz;

// Re-exports
pub use trowbridge_reitz::*;

/// Statistical models of microfacet orientation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MicrofacetDistribution {
    TrowbridgeReitz(TrowbridgeReitzDistribution),
}

impl MicrofacetDistribution {
    /// Returns whether sampling is restricted to normals visible from `wo`.
    pub fn sample_visible_area(&self) -> bool {
        match self {
            Self::TrowbridgeReitz(d) => d.sample_visible_area,
        }
    }

    /// Return the differential area of microfacets oriented with the surface
    /// normal `wh`.
    ///
    /// * `wh` - Microfacet normal in the shading frame.
    pub fn d(&self, wh: &Vector3f) -> Float {
        match self {
            Self::TrowbridgeReitz(d) => d.d(wh),
        }
    }

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `w` - Direction in the shading frame.
    pub fn lambda(&self, w: &Vector3f) -> Float {
        match self {
            Self::TrowbridgeReitz(d) => d.lambda(w),
        }
    }

    /// Smith masking: fraction of microfacets visible from `w`.
    ///
    /// * `w` - Direction in the shading frame.
    pub fn g1(&self, w: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(w))
    }

    /// Smith masking-shadowing: fraction of microfacets visible from both
    /// `wo` and `wi`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn g(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(wo) + self.lambda(wi))
    }

    /// Samples a microfacet normal on the same side as `wo`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f {
        match self {
            Self::TrowbridgeReitz(d) => d.sample_wh(wo, u),
        }
    }

    /// Density of `sample_wh` returning `wh`, with respect to solid angle.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wh` - Microfacet normal.
    pub fn pdf(&self, wo: &Vector3f, wh: &Vector3f) -> Float {
        if self.sample_visible_area() {
            let cos_o = abs_cos_theta(wo);
            if cos_o == 0.0 {
                return 0.0;
            }
            self.d(wh) * self.g1(wo) * wo.abs_dot(wh) / cos_o
        } else {
            self.d(wh) * abs_cos_theta(wh)
        }
    }
}

impl From<TrowbridgeReitzDistribution> for MicrofacetDistribution {
    fn from(d: TrowbridgeReitzDistribution) -> Self {
        Self::TrowbridgeReitz(d)
    }
}
