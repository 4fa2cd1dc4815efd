//! Fourier BSDF

use super::*;
use crate::interpolation::*;
use crate::material::TransportMode;
use std::sync::Arc;

/// Tabulated BSDF evaluated from a shared `FourierBSDFTable`.
#[derive(Clone, Debug, PartialEq)]
pub struct FourierBSDF {
    table: Arc<FourierBSDFTable>,
    mode: TransportMode,
}

impl FourierBSDF {
    /// Create a new instance of `FourierBSDF`.
    ///
    /// * `table` - Shared coefficient table.
    /// * `mode`  - Transport mode.
    pub fn new(table: Arc<FourierBSDFTable>, mode: TransportMode) -> Self {
        Self { table, mode }
    }

    pub fn get_type(&self) -> BxDFType {
        BxDFType::REFLECTION | BxDFType::TRANSMISSION | BxDFType::GLOSSY
    }

    /// Blends the series of the (up to) 16 neighbouring zenith pairs into
    /// per-channel coefficient rows of width `m_max`. Returns the rows and the
    /// longest series length encountered.
    fn blend_coefficients(&self, mu_i: Float, mu_o: Float) -> Option<(Vec<Float>, usize)> {
        let (weights_i, offset_i) = self.table.get_weights_and_offset(mu_i)?;
        let (weights_o, offset_o) = self.table.get_weights_and_offset(mu_o)?;

        let stride = self.table.m_max;
        let mut ak = vec![0.0; stride * self.table.n_channels];
        let mut m_max = 0;
        for (b, wo) in weights_o.iter().enumerate() {
            for (a, wi) in weights_i.iter().enumerate() {
                let weight = wi * wo;
                if weight == 0.0 {
                    continue;
                }
                let i = (offset_i + a as isize) as usize;
                let o = (offset_o + b as isize) as usize;
                let (m, ap) = self.table.get_ak(i, o);
                m_max = max(m_max, m);
                for c in 0..self.table.n_channels {
                    for k in 0..m {
                        ak[c * stride + k] += weight * ap[c * m + k];
                    }
                }
            }
        }
        Some((ak, m_max))
    }

    /// `1/|μi|`, with the η² factor for radiance crossing the boundary.
    fn scale(&self, mu_i: Float, mu_o: Float) -> Float {
        let mut scale = if mu_i != 0.0 { 1.0 / abs(mu_i) } else { 0.0 };
        if self.mode == TransportMode::Radiance && mu_i * mu_o > 0.0 {
            let eta = if mu_i > 0.0 {
                1.0 / self.table.eta
            } else {
                self.table.eta
            };
            scale *= eta * eta;
        }
        scale
    }

    /// Converts the luminance series value `y` plus the red and blue series
    /// into a spectrum.
    fn to_spectrum(&self, y: Float, ak: &[Float], m: usize, cos_phi: f64, scale: Float) -> Spectrum {
        if self.table.n_channels == 1 {
            return Spectrum::new(y * scale);
        }
        let stride = self.table.m_max;
        let r = fourier(&ak[stride..stride + m], cos_phi);
        let b = fourier(&ak[2 * stride..2 * stride + m], cos_phi);
        let g = 1.39829 * y - 0.100913 * b - 0.297375 * r;
        Spectrum::from_rgb(r * scale, g * scale, b * scale).clamp_default()
    }

    /// Returns the value of the table for a pair of directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        let mu_i = cos_theta(&-*wi);
        let mu_o = cos_theta(wo);
        let cos_phi = cos_d_phi(&-*wi, wo) as f64;

        let (ak, m) = match self.blend_coefficients(mu_i, mu_o) {
            Some(blend) => blend,
            None => return Spectrum::ZERO,
        };
        let y = max(0.0, fourier(&ak[0..m], cos_phi));
        self.to_spectrum(y, &ak, m, cos_phi, self.scale(mu_i, mu_o))
    }

    /// Samples the zenith from the `a0` spline and the azimuth from the
    /// luminance series.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        let mu_o = cos_theta(wo);
        let (mu_i, _, pdf_mu) = sample_catmull_rom_2d(
            &self.table.mu,
            &self.table.mu,
            &self.table.a0,
            &self.table.cdf,
            mu_o,
            u[1],
        );

        let (ak, m) = match self.blend_coefficients(mu_i, mu_o) {
            Some(blend) if blend.1 > 0 => blend,
            _ => return BxDFSample::from(self.get_type()),
        };

        let (y, pdf_phi, phi) = sample_fourier(&ak[0..m], &self.table.recip, u[0]);
        let pdf_phi = if pdf_phi.is_nan() { 0.0 } else { pdf_phi };
        let pdf = max(0.0, pdf_phi * pdf_mu);

        let sin2_theta_i = max(0.0, 1.0 - mu_i * mu_i);
        let norm = (sin2_theta_i / sin_2_theta(wo)).sqrt();
        let norm = if norm.is_finite() { norm } else { 0.0 };
        let (sin_phi, cos_phi) = (sin(phi), cos(phi));

        // Renormalize; rounding here compounds across repeated bounces.
        let wi = -Vector3f::new(
            norm * (cos_phi * wo.x - sin_phi * wo.y),
            norm * (sin_phi * wo.x + cos_phi * wo.y),
            mu_i,
        )
        .normalize();

        let f = self.to_spectrum(y, &ak, m, cos_phi as f64, self.scale(mu_i, mu_o));
        BxDFSample::new(f, pdf, wi, self.get_type())
    }

    /// Density of `sample_f` for a direction pair.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        let mu_i = cos_theta(&-*wi);
        let mu_o = cos_theta(wo);
        let cos_phi = cos_d_phi(&-*wi, wo) as f64;

        let (weights_i, offset_i) = match self.table.get_weights_and_offset(mu_i) {
            Some(w) => w,
            None => return 0.0,
        };
        let (weights_o, offset_o) = match self.table.get_weights_and_offset(mu_o) {
            Some(w) => w,
            None => return 0.0,
        };

        let n_mu = self.table.mu.len();
        let mut ak = vec![0.0; self.table.m_max];
        let mut m_max = 0;
        for (o, wt_o) in weights_o.iter().enumerate() {
            if *wt_o == 0.0 {
                continue;
            }
            for (i, wt_i) in weights_i.iter().enumerate() {
                let weight = wt_i * wt_o;
                if weight == 0.0 {
                    continue;
                }
                let (m, ap) = self.table.get_ak(
                    (offset_i + i as isize) as usize,
                    (offset_o + o as isize) as usize,
                );
                m_max = max(m_max, m);
                for k in 0..m {
                    ak[k] += weight * ap[k];
                }
            }
        }

        // Normalize by the marginal integral of the zenith row.
        let mut rho = 0.0;
        for (o, wt_o) in weights_o.iter().enumerate() {
            if *wt_o != 0.0 {
                let row = (offset_o + o as isize) as usize;
                rho += wt_o * self.table.cdf[row * n_mu + n_mu - 1] * TWO_PI;
            }
        }

        let y = fourier(&ak[0..m_max], cos_phi);
        if rho > 0.0 && y > 0.0 {
            y / rho
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::approx_eq;

    fn constant_bsdf(mode: TransportMode) -> FourierBSDF {
        let table = FourierBSDFTable::constant(vec![-1.0, -0.5, 0.0, 0.5, 1.0], 0.2, 1.5);
        FourierBSDF::new(Arc::new(table), mode)
    }

    #[test]
    fn evaluates_at_grid_nodes() {
        let bsdf = constant_bsdf(TransportMode::Importance);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.75_f32.sqrt(), 0.0, 0.5);
        let f = bsdf.f(&wo, &wi);
        assert!(approx_eq!(f32, f[0], 0.4, epsilon = 0.0001), "{}", f);
    }

    #[test]
    fn radiance_crossing_applies_eta() {
        let bsdf = constant_bsdf(TransportMode::Radiance);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.75_f32.sqrt(), 0.0, -0.5);
        let f = bsdf.f(&wo, &wi);
        let expected = 0.2 / 0.5 / (1.5 * 1.5);
        assert!(approx_eq!(f32, f[0], expected, epsilon = 0.0001), "{}", f);
    }

    #[test]
    fn samples_are_unit_and_finite() {
        let bsdf = constant_bsdf(TransportMode::Radiance);
        let wo = Vector3f::new(0.3, 0.4, 0.866).normalize();
        let mut rng = RNG::new(31);
        for _ in 0..64 {
            let s = bsdf.sample_f(&wo, &rng.uniform_point2f());
            assert!(s.pdf >= 0.0);
            assert!(!s.f.has_nans());
            if s.is_valid() {
                assert!((s.wi.length() - 1.0).abs() < 1e-3);
            }
        }
    }
}
