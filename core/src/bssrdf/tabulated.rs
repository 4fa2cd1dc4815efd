//! Tabulated BSSRDF

use super::*;
use crate::interaction::SurfaceInteraction;
use crate::material::TransportMode;
use std::sync::Arc;

/// Probability of each projection axis (`ss`, `ts`, `ns`) in `sample_probe`.
const AXIS_PROB: [Float; 3] = [0.25, 0.25, 0.5];

/// The segment an integrator intersects against the scene to find exit
/// points for subsurface transport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProbeSegment {
    /// Segment start.
    pub start: Point3f,

    /// Segment end.
    pub end: Point3f,

    /// Spectral channel whose profile was sampled.
    pub channel: usize,

    /// Sampled radius in world units.
    pub radius: Float,

    /// Remaining uniform variate for choosing among the hits found.
    pub u_select: Float,
}

/// An exit point chosen by `TabulatedBSSRDF::choose_exit`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExitSample {
    /// Index into the candidate list.
    pub index: usize,

    /// Spatial term `Sp`.
    pub sp: Spectrum,

    /// Density of having chosen this point.
    pub pdf: Float,
}

/// Separable BSSRDF at an entry point `po` whose radial profile is read from
/// a shared `BSSRDFTable`.
#[derive(Clone, Debug)]
pub struct TabulatedBSSRDF {
    table: Arc<BSSRDFTable>,
    sigma_t: Spectrum,
    rho: Spectrum,
    eta: Float,
    mode: TransportMode,

    /// Entry point.
    po: Point3f,

    /// Outgoing direction at the entry point.
    wo: Vector3f,

    ns: Normal3f,
    ss: Vector3f,
    ts: Vector3f,
}

impl TabulatedBSSRDF {
    /// Create a new `TabulatedBSSRDF` for the entry point `si`.
    ///
    /// * `si`      - Entry point.
    /// * `eta`     - Relative index of refraction.
    /// * `mode`    - Transport mode.
    /// * `sigma_a` - Absorption coefficient.
    /// * `sigma_s` - Scattering coefficient.
    /// * `table`   - Shared profile table.
    pub fn new(
        si: &SurfaceInteraction,
        eta: Float,
        mode: TransportMode,
        sigma_a: Spectrum,
        sigma_s: Spectrum,
        table: Arc<BSSRDFTable>,
    ) -> Self {
        let sigma_t = sigma_a + sigma_s;
        let rho = sigma_s / sigma_t;
        let ns = si.shading.n;
        let ss = si.shading.dpdu.normalize();
        Self {
            table,
            sigma_t,
            rho,
            eta,
            mode,
            po: si.p,
            wo: si.wo,
            ns,
            ss,
            ts: ns.cross(&ss),
        }
    }

    /// Extinction coefficient.
    pub fn sigma_t(&self) -> Spectrum {
        self.sigma_t
    }

    /// Single-scattering albedo.
    pub fn rho(&self) -> Spectrum {
        self.rho
    }

    /// Relative index of refraction.
    pub fn eta(&self) -> Float {
        self.eta
    }

    /// Full BSSRDF value for exit point `pi` and incident direction `wi`
    /// (world space).
    ///
    /// * `pi` - Exit point.
    /// * `wi` - Incident direction at the exit point.
    pub fn s(&self, pi: &SurfaceInteraction, wi: &Vector3f) -> Spectrum {
        let ft = 1.0 - fr_dielectric(self.wo.dot(&self.ns), 1.0, self.eta);
        let cos_i = wi.dot(&pi.shading.n);
        self.sp(&pi.p) * self.sw_cos(cos_i) * ft
    }

    /// Spatial term: the radial profile at the distance to `pi`.
    ///
    /// * `pi` - Exit point.
    pub fn sp(&self, pi: &Point3f) -> Spectrum {
        self.sr(self.po.distance(pi))
    }

    /// Directional term in the exit point's local shading frame.
    ///
    /// * `wi` - Incident direction.
    pub fn sw(&self, wi: &Vector3f) -> Spectrum {
        self.sw_cos(cos_theta(wi))
    }

    fn sw_cos(&self, cos_theta_i: Float) -> Spectrum {
        let c = 1.0 - 2.0 * fresnel_moment_1(1.0 / self.eta);
        Spectrum::new((1.0 - fr_dielectric(cos_theta_i, 1.0, self.eta)) / (c * PI))
    }

    /// Value of the diffuse lobe placed at a sampled exit point, including
    /// the η² factor for radiance.
    ///
    /// * `wi` - Incident direction in the exit point's shading frame.
    pub fn exit_f(&self, wi: &Vector3f) -> Spectrum {
        let f = self.sw(wi);
        match self.mode {
            TransportMode::Radiance => f * (self.eta * self.eta),
            TransportMode::Importance => f,
        }
    }

    /// Radial profile at world-space distance `r`, per channel.
    ///
    /// * `r` - Distance between entry and exit points.
    pub fn sr(&self, r: Float) -> Spectrum {
        let mut sr = Spectrum::ZERO;
        for ch in 0..RGB_SAMPLES {
            let r_optical = r * self.sigma_t[ch];
            let mut value = self.table.profile_value(self.rho[ch], r_optical);

            // Cancel the 2πr factor stored in the table.
            if r_optical != 0.0 {
                value /= TWO_PI * r_optical;
            }
            sr[ch] = value;
        }
        (sr * self.sigma_t * self.sigma_t).clamp_default()
    }

    /// Samples a world-space radius for channel `ch`; `None` when the medium
    /// does not attenuate that channel.
    ///
    /// * `ch` - Spectral channel.
    /// * `u`  - Uniform random variate.
    pub fn sample_sr(&self, ch: usize, u: Float) -> Option<Float> {
        if self.sigma_t[ch] == 0.0 {
            return None;
        }
        let (r_optical, _, _) = sample_catmull_rom_2d(
            &self.table.rho_samples,
            &self.table.radius_samples,
            &self.table.profile,
            &self.table.profile_cdf,
            self.rho[ch],
            u,
        );
        Some(r_optical / self.sigma_t[ch])
    }

    /// Density of `sample_sr` at world-space radius `r`.
    ///
    /// * `ch` - Spectral channel.
    /// * `r`  - Radius.
    pub fn pdf_sr(&self, ch: usize, r: Float) -> Float {
        let r_optical = r * self.sigma_t[ch];
        let rho_eff = self.table.rho_eff_value(self.rho[ch]);
        let mut sr = self.table.profile_value(self.rho[ch], r_optical);
        if r_optical != 0.0 {
            sr /= TWO_PI * r_optical;
        }
        // NaN (rho_eff == 0) maps to 0 through Float::max.
        (0.0 as Float).max(sr * self.sigma_t[ch] * self.sigma_t[ch] / rho_eff)
    }

    /// Combined density of `sample_probe` producing exit point `pi` with
    /// normal `ni`, over all axes and channels.
    ///
    /// * `pi` - Exit point.
    /// * `ni` - Geometric normal at the exit point.
    pub fn pdf_sp(&self, pi: &Point3f, ni: &Normal3f) -> Float {
        let d = self.po - *pi;
        let n = Vector3f::from(*ni);
        let d_local = Vector3f::new(self.ss.dot(&d), self.ts.dot(&d), self.ns.dot(&d));
        let n_local = Vector3f::new(self.ss.dot(&n), self.ts.dot(&n), self.ns.dot(&n));

        let r_proj = [
            (d_local.y * d_local.y + d_local.z * d_local.z).sqrt(),
            (d_local.z * d_local.z + d_local.x * d_local.x).sqrt(),
            (d_local.x * d_local.x + d_local.y * d_local.y).sqrt(),
        ];

        let ch_prob = 1.0 / RGB_SAMPLES as Float;
        let mut pdf = 0.0;
        for axis in 0..3 {
            for ch in 0..RGB_SAMPLES {
                pdf += self.pdf_sr(ch, r_proj[axis]) * abs(n_local[axis]) * ch_prob * AXIS_PROB[axis];
            }
        }
        pdf
    }

    /// Chooses a projection axis and channel with `u1`, samples a radius and
    /// azimuth with `u2`, and returns the probe segment through the sphere
    /// bounding the profile.
    ///
    /// * `u1` - Uniform variate for axis and channel selection.
    /// * `u2` - Uniform variates for radius and azimuth.
    pub fn sample_probe(&self, u1: Float, u2: &Point2f) -> Option<ProbeSegment> {
        let ns = Vector3f::from(self.ns);
        let (vx, vy, vz, u1) = if u1 < 0.5 {
            (self.ss, self.ts, ns, u1 * 2.0)
        } else if u1 < 0.75 {
            (self.ts, ns, self.ss, (u1 - 0.5) * 4.0)
        } else {
            (ns, self.ss, self.ts, (u1 - 0.75) * 4.0)
        };

        let channel = min((u1 * RGB_SAMPLES as Float) as usize, RGB_SAMPLES - 1);
        let u_select = min(u1 * RGB_SAMPLES as Float - channel as Float, ONE_MINUS_EPSILON);

        let radius = self.sample_sr(channel, u2[0])?;
        if radius < 0.0 {
            return None;
        }
        let phi = TWO_PI * u2[1];

        let r_max = self.sample_sr(channel, 0.999)?;
        if radius >= r_max {
            return None;
        }
        let l = 2.0 * (r_max * r_max - radius * radius).sqrt();

        let start = self.po + (vx * cos(phi) + vy * sin(phi)) * radius - vz * (l * 0.5);
        let end = start + vz * l;
        Some(ProbeSegment {
            start,
            end,
            channel,
            radius,
            u_select,
        })
    }

    /// Picks one of the admissible exit points found along a probe segment
    /// and returns its spatial term and density.
    ///
    /// * `u_select`   - `ProbeSegment::u_select`.
    /// * `candidates` - Exit points and their geometric normals.
    pub fn choose_exit(&self, u_select: Float, candidates: &[(Point3f, Normal3f)]) -> Option<ExitSample> {
        if candidates.is_empty() {
            return None;
        }
        let n = candidates.len();
        let index = min((u_select * n as Float) as usize, n - 1);
        let (p, normal) = candidates[index];
        Some(ExitSample {
            index,
            sp: self.sp(&p),
            pdf: self.pdf_sp(&p, &normal) / n as Float,
        })
    }
}
