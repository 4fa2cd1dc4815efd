//! Surface Modifiers

use crate::geometry::*;
use crate::interaction::SurfaceInteraction;
use crate::material::Child;
use crate::pbrt::*;
use crate::texture::ArcTexture;
use std::sync::Arc;

/// Perturbs the shading geometry before a material looks up its textures.
pub trait Modifier {
    /// Updates the shading frame of `si`.
    ///
    /// * `si` - The surface interaction.
    fn modify(&self, si: &mut SurfaceInteraction);

    /// Textures the modifier reads.
    fn children(&self) -> Vec<Child> {
        vec![]
    }
}

/// Atomic reference counted `Modifier`.
pub type ArcModifier = Arc<dyn Modifier + Send + Sync>;

/// Leaves the interaction untouched.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoOpModifier;

impl Modifier for NoOpModifier {
    fn modify(&self, _si: &mut SurfaceInteraction) {}
}

/// Bump mapping driven by a scalar displacement texture.
pub struct BumpModifier {
    displacement: ArcTexture<Float>,
}

/// Offset used when no screen-space differentials are available.
const DEFAULT_DELTA: Float = 0.0005;

impl BumpModifier {
    /// Create a new `BumpModifier`.
    ///
    /// * `displacement` - Displacement texture.
    pub fn new(displacement: ArcTexture<Float>) -> Self {
        Self { displacement }
    }

    /// Evaluates the displacement at `si` shifted by `delta` along the
    /// tangent `dp`, with its normal perturbed by `dn`.
    fn displaced(
        &self,
        si: &SurfaceInteraction,
        dp: Vector3f,
        duv: Point2f,
        dn: Normal3f,
        delta: Float,
    ) -> Float {
        let mut shifted = si.clone();
        shifted.p = si.p + dp * delta;
        shifted.uv = si.uv + duv;
        shifted.n = (Normal3f::from(si.shading.dpdu.cross(&si.shading.dpdv)) + delta * dn).normalize();
        self.displacement.evaluate(&shifted)
    }
}

impl Modifier for BumpModifier {
    fn modify(&self, si: &mut SurfaceInteraction) {
        let du = match 0.5 * (abs(si.der.dudx) + abs(si.der.dudy)) {
            d if d == 0.0 => DEFAULT_DELTA,
            d => d,
        };
        let dv = match 0.5 * (abs(si.der.dvdx) + abs(si.der.dvdy)) {
            d if d == 0.0 => DEFAULT_DELTA,
            d => d,
        };

        let displace = self.displacement.evaluate(si);
        let u_displace = self.displaced(si, si.shading.dpdu, Point2f::new(du, 0.0), si.der.dndu, du);
        let v_displace = self.displaced(si, si.shading.dpdv, Point2f::new(0.0, dv), si.der.dndv, dv);

        let n = Vector3f::from(si.shading.n);
        let dpdu = si.shading.dpdu
            + n * ((u_displace - displace) / du)
            + Vector3f::from(si.shading.dndu) * displace;
        let dpdv = si.shading.dpdv
            + n * ((v_displace - displace) / dv)
            + Vector3f::from(si.shading.dndv) * displace;

        let (dndu, dndv) = (si.shading.dndu, si.shading.dndv);
        si.set_shading_geometry(dpdu, dpdv, dndu, dndv, false);
    }

    fn children(&self) -> Vec<Child> {
        vec![Child::FloatTexture(Arc::clone(&self.displacement))]
    }
}
