//! BSSRDF profile table.

use super::*;

/// Default number of albedo samples.
pub const N_RHO_SAMPLES: usize = 100;

/// Default number of radius samples.
pub const N_RADIUS_SAMPLES: usize = 64;

/// Radial scattering profile tabulated over albedo and optical radius.
/// Only `BSSRDFTable::new` creates one and the result is never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct BSSRDFTable {
    /// Single-scattering albedo samples.
    pub rho_samples: Vec<Float>,

    /// Optical radius samples.
    pub radius_samples: Vec<Float>,

    /// `2πr` times the profile, row-major by albedo.
    pub profile: Vec<Float>,

    /// Effective albedo for each albedo sample.
    pub rho_eff: Vec<Float>,

    /// Running integral of each `profile` row.
    pub profile_cdf: Vec<Float>,
}

impl BSSRDFTable {
    /// Builds the table by integrating photon beam diffusion at every grid
    /// point.
    ///
    /// * `n_rho_samples`    - Number of albedo samples.
    /// * `n_radius_samples` - Number of radius samples (at least 2).
    /// * `g`                - Phase function asymmetry.
    /// * `eta`              - Relative index of refraction.
    pub fn new(n_rho_samples: usize, n_radius_samples: usize, g: Float, eta: Float) -> Self {
        let mut radius_samples = Vec::with_capacity(n_radius_samples);
        radius_samples.push(0.0);
        radius_samples.push(2.5e-3);
        while radius_samples.len() < n_radius_samples {
            let last = radius_samples[radius_samples.len() - 1];
            radius_samples.push(last * 1.2);
        }
        radius_samples.truncate(n_radius_samples);

        let denom = 1.0 - (-8.0 as Float).exp();
        let last = max(n_rho_samples, 2) - 1;
        let rho_samples: Vec<Float> = (0..n_rho_samples)
            .map(|i| (1.0 - (-8.0 * i as Float / last as Float).exp()) / denom)
            .collect();

        let mut profile = Vec::with_capacity(n_rho_samples * n_radius_samples);
        let mut profile_cdf = Vec::with_capacity(n_rho_samples * n_radius_samples);
        let mut rho_eff = Vec::with_capacity(n_rho_samples);
        for &rho in rho_samples.iter() {
            let row: Vec<Float> = radius_samples
                .iter()
                .map(|&r| {
                    TWO_PI
                        * r
                        * (beam_diffusion_ss(rho, 1.0 - rho, g, eta, r)
                            + beam_diffusion_ms(rho, 1.0 - rho, g, eta, r))
                })
                .collect();
            let (cdf, total) = integrate_catmull_rom(&radius_samples, &row);
            profile.extend_from_slice(&row);
            profile_cdf.extend_from_slice(&cdf);
            rho_eff.push(total);
        }
        debug!(
            "BSSRDF table {}x{} built for g={} eta={}",
            n_rho_samples, n_radius_samples, g, eta
        );

        Self {
            rho_samples,
            radius_samples,
            profile,
            rho_eff,
            profile_cdf,
        }
    }

    /// Builds the table at the default resolution.
    ///
    /// * `g`   - Phase function asymmetry.
    /// * `eta` - Relative index of refraction.
    pub fn with_defaults(g: Float, eta: Float) -> Self {
        Self::new(N_RHO_SAMPLES, N_RADIUS_SAMPLES, g, eta)
    }

    /// Stored profile value at grid indices.
    pub fn eval_profile(&self, rho_index: usize, radius_index: usize) -> Float {
        self.profile[rho_index * self.radius_samples.len() + radius_index]
    }

    /// Tensor-product Catmull-Rom interpolation of the stored profile.
    /// Returns 0 outside the tabulated range.
    ///
    /// * `rho`       - Single-scattering albedo.
    /// * `r_optical` - Optical radius.
    pub fn profile_value(&self, rho: Float, r_optical: Float) -> Float {
        let (rho_weights, rho_offset) = match catmull_rom_weights(&self.rho_samples, rho) {
            Some(w) => w,
            None => return 0.0,
        };
        let (radius_weights, radius_offset) =
            match catmull_rom_weights(&self.radius_samples, r_optical) {
                Some(w) => w,
                None => return 0.0,
            };

        let mut value = 0.0;
        for (i, rho_weight) in rho_weights.iter().enumerate() {
            if *rho_weight == 0.0 {
                continue;
            }
            for (j, radius_weight) in radius_weights.iter().enumerate() {
                if *radius_weight == 0.0 {
                    continue;
                }
                value += rho_weight
                    * radius_weight
                    * self.eval_profile(
                        (rho_offset + i as isize) as usize,
                        (radius_offset + j as isize) as usize,
                    );
            }
        }
        value
    }

    /// Interpolated effective albedo.
    ///
    /// * `rho` - Single-scattering albedo.
    pub fn rho_eff_value(&self, rho: Float) -> Float {
        match catmull_rom_weights(&self.rho_samples, rho) {
            Some((weights, offset)) => weights
                .iter()
                .enumerate()
                .filter(|(_, w)| **w != 0.0)
                .map(|(i, w)| w * self.rho_eff[(offset + i as isize) as usize])
                .sum(),
            None => 0.0,
        }
    }
}

/// Inverts the effective albedo table to find scattering coefficients that
/// reproduce a diffuse reflectance with a given mean free path.
/// Returns `(sigma_a, sigma_s)`.
///
/// * `table`   - Profile table.
/// * `rho_eff` - Desired diffuse reflectance.
/// * `mfp`     - Mean free path.
pub fn subsurface_from_diffuse(
    table: &BSSRDFTable,
    rho_eff: &Spectrum,
    mfp: &Spectrum,
) -> (Spectrum, Spectrum) {
    let mut sigma_a = Spectrum::ZERO;
    let mut sigma_s = Spectrum::ZERO;
    for c in 0..RGB_SAMPLES {
        // No medium along a channel without a positive mean free path.
        if mfp[c] <= 0.0 {
            continue;
        }
        let rho = invert_catmull_rom(&table.rho_samples, &table.rho_eff, rho_eff[c]);
        sigma_s[c] = rho / mfp[c];
        sigma_a[c] = (1.0 - rho) / mfp[c];
    }
    (sigma_a, sigma_s)
}
