//! BSDF

use super::*;
use crate::interaction::SurfaceInteraction;

/// Maximum number of lobes a `BSDF` holds.
pub const MAX_BXDFS: usize = 8;

/// The lobes at a surface point together with the shading frame that maps
/// world directions into their local space.
#[derive(Clone, Debug)]
pub struct BSDF {
    /// Relative index of refraction across the boundary.
    pub eta: Float,

    /// Shading normal.
    pub ns: Normal3f,

    /// Geometric normal.
    pub ng: Normal3f,

    /// Primary tangent.
    pub ss: Vector3f,

    /// Secondary tangent.
    pub ts: Vector3f,

    bxdfs: Vec<BxDF>,
}

impl BSDF {
    /// Creates an empty `BSDF` with a frame built from the shading geometry.
    ///
    /// * `si`  - The surface interaction.
    /// * `eta` - Relative index of refraction; 1 for opaque surfaces.
    pub fn new(si: &SurfaceInteraction, eta: Float) -> Self {
        let ns = si.shading.n;
        let ss = si.shading.dpdu.normalize();
        Self {
            eta,
            ns,
            ng: si.n,
            ss,
            ts: ns.cross(&ss),
            bxdfs: Vec::with_capacity(MAX_BXDFS),
        }
    }

    /// Appends a lobe. Lobes past `MAX_BXDFS` are dropped.
    ///
    /// * `bxdf` - The lobe.
    pub fn add(&mut self, bxdf: BxDF) {
        if self.bxdfs.len() < MAX_BXDFS {
            self.bxdfs.push(bxdf);
        } else {
            warn!("BSDF already holds {} lobes; dropping {:?}", MAX_BXDFS, bxdf.get_type());
        }
    }

    /// The lobes in insertion order.
    pub fn bxdfs(&self) -> &[BxDF] {
        &self.bxdfs
    }

    /// Number of lobes matching `flags`.
    ///
    /// * `flags` - Requested lobe flags.
    pub fn num_components(&self, flags: BxDFType) -> usize {
        self.bxdfs.iter().filter(|b| b.matches_flags(flags)).count()
    }

    /// Converts a world space direction into the shading frame.
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.ss), v.dot(&self.ts), v.dot(&self.ns))
    }

    /// Converts a shading-frame direction back into world space.
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        let n = Vector3f::from(self.ns);
        self.ss * v.x + self.ts * v.y + n * v.z
    }

    /// Sums the lobes that match `flags` and whose hemisphere type agrees
    /// with the geometric configuration of the two directions.
    fn sum_f(&self, wo: &Vector3f, wi: &Vector3f, reflect: bool, flags: BxDFType) -> Spectrum {
        let wanted = if reflect {
            BxDFType::REFLECTION
        } else {
            BxDFType::TRANSMISSION
        };
        self.bxdfs
            .iter()
            .filter(|b| b.matches_flags(flags) && b.get_type().matches(wanted))
            .fold(Spectrum::ZERO, |acc, b| acc + b.f(wo, wi))
    }

    /// Evaluates the aggregate for a pair of world space directions.
    ///
    /// * `wo_w`  - Outgoing direction.
    /// * `wi_w`  - Incident direction.
    /// * `flags` - Lobes to include.
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, flags: BxDFType) -> Spectrum {
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return Spectrum::ZERO;
        }
        let wi = self.world_to_local(wi_w);
        let reflect = wi_w.dot(&self.ng) * wo_w.dot(&self.ng) > 0.0;
        self.sum_f(&wo, &wi, reflect, flags)
    }

    /// Samples one matching lobe chosen uniformly by `u[0]`. The returned
    /// direction is in world space.
    ///
    /// * `wo_w`  - Outgoing direction.
    /// * `u`     - The 2D uniform random values.
    /// * `flags` - Lobes to consider.
    pub fn sample_f(&self, wo_w: &Vector3f, u: &Point2f, flags: BxDFType) -> BxDFSample {
        let matching = self.num_components(flags);
        if matching == 0 {
            return BxDFSample::default();
        }
        let comp = min((u[0] * matching as Float).floor() as usize, matching - 1);
        let bxdf = match self.bxdfs.iter().filter(|b| b.matches_flags(flags)).nth(comp) {
            Some(bxdf) => bxdf,
            None => return BxDFSample::default(),
        };
        let sampled_type = bxdf.get_type();

        let u_remapped = Point2f::new(
            min(u[0] * matching as Float - comp as Float, ONE_MINUS_EPSILON),
            u[1],
        );

        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return BxDFSample::from(sampled_type);
        }
        let sample = bxdf.sample_f(&wo, &u_remapped);
        if sample.pdf == 0.0 {
            return BxDFSample::from(sampled_type);
        }
        let wi_w = self.local_to_world(&sample.wi);

        if sampled_type.is_specular() {
            let pdf = if matching > 1 {
                sample.pdf / matching as Float
            } else {
                sample.pdf
            };
            return BxDFSample::new(sample.f, pdf, wi_w, sampled_type);
        }

        let pdf = self
            .bxdfs
            .iter()
            .filter(|b| b.matches_flags(flags))
            .map(|b| b.pdf(&wo, &sample.wi))
            .sum::<Float>()
            / matching as Float;
        let reflect = wi_w.dot(&self.ng) * wo_w.dot(&self.ng) > 0.0;
        let f = self.sum_f(&wo, &sample.wi, reflect, flags);
        BxDFSample::new(f, pdf, wi_w, sampled_type)
    }

    /// Returns the Monte Carlo weight `f |wi · ns| / pdf` of a world-space
    /// sample produced by `sample_f`.
    ///
    /// * `sample` - A sample returned by `sample_f`.
    pub fn weight(&self, sample: &BxDFSample) -> Spectrum {
        if sample.pdf > 0.0 {
            sample.f * sample.wi.abs_dot(&self.ns) / sample.pdf
        } else {
            Spectrum::ZERO
        }
    }

    /// Averages the densities of the matching lobes.
    ///
    /// * `wo_w`  - Outgoing direction.
    /// * `wi_w`  - Incident direction.
    /// * `flags` - Lobes to include.
    pub fn pdf(&self, wo_w: &Vector3f, wi_w: &Vector3f, flags: BxDFType) -> Float {
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return 0.0;
        }
        let wi = self.world_to_local(wi_w);
        let (count, pdf) = self
            .bxdfs
            .iter()
            .filter(|b| b.matches_flags(flags))
            .fold((0, 0.0), |(n, pdf), b| (n + 1, pdf + b.pdf(&wo, &wi)));
        if count > 0 {
            pdf / count as Float
        } else {
            0.0
        }
    }

    /// Sums the hemispherical-directional reflectance of matching lobes.
    ///
    /// * `wo_w`    - Outgoing direction.
    /// * `samples` - Uniform 2D samples.
    /// * `flags`   - Lobes to include.
    pub fn rho_hd(&self, wo_w: &Vector3f, samples: &[Point2f], flags: BxDFType) -> Spectrum {
        let wo = self.world_to_local(wo_w);
        self.bxdfs
            .iter()
            .filter(|b| b.matches_flags(flags))
            .fold(Spectrum::ZERO, |acc, b| acc + b.rho_hd(&wo, samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn flat_bsdf() -> BSDF {
        let si = SurfaceInteraction::flat(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        BSDF::new(&si, 1.0)
    }

    #[test]
    fn frame_round_trips() {
        let bsdf = flat_bsdf();
        let v = Vector3f::new(0.2, -0.4, 0.7);
        let back = bsdf.local_to_world(&bsdf.world_to_local(&v));
        assert!(approx_eq!(f32, back.x, v.x, epsilon = 1e-6));
        assert!(approx_eq!(f32, back.y, v.y, epsilon = 1e-6));
        assert!(approx_eq!(f32, back.z, v.z, epsilon = 1e-6));
    }

    #[test]
    fn excess_lobes_are_dropped() {
        let mut bsdf = flat_bsdf();
        for _ in 0..MAX_BXDFS + 3 {
            bsdf.add(LambertianReflection::new(Spectrum::new(0.1)).into());
        }
        assert_eq!(bsdf.bxdfs().len(), MAX_BXDFS);
    }

    #[test]
    fn transmission_pair_skips_reflection_lobes() {
        let mut bsdf = flat_bsdf();
        bsdf.add(LambertianReflection::new(Spectrum::ONE).into());
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let up = Vector3f::new(0.0, 0.6, 0.8);
        let down = Vector3f::new(0.0, 0.6, -0.8);
        assert!(approx_eq!(f32, bsdf.f(&wo, &up, BxDFType::ALL)[0], INV_PI, epsilon = 1e-6));
        assert!(bsdf.f(&wo, &down, BxDFType::ALL).is_black());
    }

    #[test]
    fn sampling_averages_pdf_over_matching_lobes() {
        let mut bsdf = flat_bsdf();
        bsdf.add(LambertianReflection::new(Spectrum::new(0.5)).into());
        bsdf.add(SpecularReflection::new(Spectrum::ONE, Fresnel::Constant(1.0)).into());
        let wo = Vector3f::new(0.0, 0.6, 0.8);

        assert_eq!(bsdf.num_components(BxDFType::ALL), 2);
        assert_eq!(bsdf.num_components(BxDFType::ALL & !BxDFType::SPECULAR), 1);

        // Lower half of u[0] picks the diffuse lobe.
        let diffuse = bsdf.sample_f(&wo, &Point2f::new(0.2, 0.3), BxDFType::ALL);
        let expected = cosine_hemisphere_pdf(abs_cos_theta(&bsdf.world_to_local(&diffuse.wi))) / 2.0;
        assert!(approx_eq!(f32, diffuse.pdf, expected, epsilon = 1e-5));

        // Upper half picks the mirror.
        let mirror = bsdf.sample_f(&wo, &Point2f::new(0.8, 0.3), BxDFType::ALL);
        assert!(mirror.bxdf_type.is_specular());
        assert!(approx_eq!(f32, mirror.pdf, 0.5, epsilon = 1e-6));
    }

    #[test]
    fn weight_uses_the_shading_normal_on_a_tilted_frame() {
        // Surface tilted 60 degrees about x.
        let (sin, cos) = (0.75_f32.sqrt(), 0.5);
        let mut si = SurfaceInteraction::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point2f::new(0.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, cos, sin),
            Normal3f::ZERO,
            Normal3f::ZERO,
            None,
        );
        si.wo = Vector3f::from(si.n);
        let mut bsdf = BSDF::new(&si, 1.0);
        bsdf.add(SpecularReflection::new(Spectrum::ONE, Fresnel::Constant(1.0)).into());

        let s = bsdf.sample_f(&si.wo, &Point2f::new(0.5, 0.5), BxDFType::ALL);
        assert!(approx_eq!(f32, s.wi.x, si.wo.x, epsilon = 1e-5));
        assert!(approx_eq!(f32, s.wi.y, si.wo.y, epsilon = 1e-5));
        assert!(approx_eq!(f32, s.wi.z, si.wo.z, epsilon = 1e-5));
        assert!(approx_eq!(f32, bsdf.weight(&s)[0], 1.0, epsilon = 1e-5));
    }

    #[test]
    fn empty_bsdf_samples_nothing() {
        let bsdf = flat_bsdf();
        let s = bsdf.sample_f(&Vector3f::new(0.0, 0.0, 1.0), &Point2f::new(0.5, 0.5), BxDFType::ALL);
        assert!(!s.is_valid());
        assert_eq!(bsdf.pdf(&Vector3f::new(0.0, 0.0, 1.0), &Vector3f::new(0.0, 0.0, 1.0), BxDFType::ALL), 0.0);
    }
}
