//! Surface Interactions

use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;

/// Identifies the shape a ray hit. Materials only compare and hash it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// Parametric partial derivatives and their screen-space counterparts.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Derivatives {
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub dndu: Normal3f,
    pub dndv: Normal3f,
    pub dudx: Float,
    pub dvdx: Float,
    pub dudy: Float,
    pub dvdy: Float,
    pub dpdx: Vector3f,
    pub dpdy: Vector3f,
}

/// The shading frame, possibly perturbed away from the true geometry.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Shading {
    pub n: Normal3f,
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub dndu: Normal3f,
    pub dndv: Normal3f,
}

/// Local differential geometry at a ray-surface hit.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceInteraction {
    /// Hit point.
    pub p: Point3f,

    /// Surface parameterization at `p`.
    pub uv: Point2f,

    /// Outgoing direction (negated ray direction).
    pub wo: Vector3f,

    /// Geometric normal.
    pub n: Normal3f,

    pub der: Derivatives,

    pub shading: Shading,

    /// The shape that was hit, when known.
    pub shape_id: Option<ShapeId>,
}

impl SurfaceInteraction {
    /// Creates an interaction whose shading frame equals the true geometry.
    ///
    /// * `p`        - Hit point.
    /// * `uv`       - Surface coordinates.
    /// * `wo`       - Outgoing direction.
    /// * `dpdu`     - ∂p/∂u.
    /// * `dpdv`     - ∂p/∂v.
    /// * `dndu`     - ∂n/∂u.
    /// * `dndv`     - ∂n/∂v.
    /// * `shape_id` - The shape that was hit.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: Point3f,
        uv: Point2f,
        wo: Vector3f,
        dpdu: Vector3f,
        dpdv: Vector3f,
        dndu: Normal3f,
        dndv: Normal3f,
        shape_id: Option<ShapeId>,
    ) -> Self {
        let n = Normal3f::from(dpdu.cross(&dpdv).normalize());
        Self {
            p,
            uv,
            wo,
            n,
            der: Derivatives {
                dpdu,
                dpdv,
                dndu,
                dndv,
                ..Default::default()
            },
            shading: Shading {
                n,
                dpdu,
                dpdv,
                dndu,
                dndv,
            },
            shape_id,
        }
    }

    /// An interaction on the z = 0 plane with `+z` as its normal.
    ///
    /// * `p`  - Hit point.
    /// * `wo` - Outgoing direction.
    pub fn flat(p: Point3f, wo: Vector3f) -> Self {
        Self::new(
            p,
            Point2f::new(p.x, p.y),
            wo,
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Normal3f::ZERO,
            Normal3f::ZERO,
            None,
        )
    }

    /// Tags the interaction with the shape that produced it.
    pub fn with_shape(mut self, shape_id: ShapeId) -> Self {
        self.shape_id = Some(shape_id);
        self
    }

    /// Replaces the shading frame. The shading normal is flipped to lie in
    /// the hemisphere of the geometric normal unless the shading
    /// orientation is authoritative, in which case the geometric normal is
    /// flipped instead.
    ///
    /// * `dpdu`                         - Shading ∂p/∂u.
    /// * `dpdv`                         - Shading ∂p/∂v.
    /// * `dndu`                         - Shading ∂n/∂u.
    /// * `dndv`                         - Shading ∂n/∂v.
    /// * `orientation_is_authoritative` - Which normal keeps its side.
    pub fn set_shading_geometry(
        &mut self,
        dpdu: Vector3f,
        dpdv: Vector3f,
        dndu: Normal3f,
        dndv: Normal3f,
        orientation_is_authoritative: bool,
    ) {
        let ns = Normal3f::from(dpdu.cross(&dpdv)).normalize();
        if orientation_is_authoritative {
            self.n = self.n.face_forward(&ns);
            self.shading.n = ns;
        } else {
            self.shading.n = ns.face_forward(&self.n);
        }
        self.shading.dpdu = dpdu;
        self.shading.dpdv = dpdv;
        self.shading.dndu = dndu;
        self.shading.dndv = dndv;
    }
}
