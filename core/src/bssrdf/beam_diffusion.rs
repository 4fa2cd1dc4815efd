//! Photon beam diffusion.

use super::*;

/// Number of depth samples used by each beam integral.
pub const PBD_SAMPLES: usize = 100;

/// Multiple-scattering radiant exitance at radius `r` from a normally
/// incident beam, using the dipole approximation.
///
/// * `sigma_s` - Scattering coefficient.
/// * `sigma_a` - Absorption coefficient.
/// * `g`       - Phase function asymmetry.
/// * `eta`     - Relative index of refraction.
/// * `r`       - Radial distance.
pub fn beam_diffusion_ms(sigma_s: Float, sigma_a: Float, g: Float, eta: Float, r: Float) -> Float {
    // Reduced coefficients.
    let sigmap_s = sigma_s * (1.0 - g);
    let sigmap_t = sigma_a + sigmap_s;
    let rhop = sigmap_s / sigmap_t;

    // Non-classical diffusion coefficient and effective transport coefficient.
    let d_g = (2.0 * sigma_a + sigmap_s) / (3.0 * sigmap_t * sigmap_t);
    let sigma_tr = safe_sqrt(sigma_a / d_g);

    // Linear extrapolation distance and exitance scale factors.
    let fm1 = fresnel_moment_1(eta);
    let fm2 = fresnel_moment_2(eta);
    let ze = -2.0 * d_g * (1.0 + 3.0 * fm2) / (1.0 - 2.0 * fm1);
    let c_phi = 0.25 * (1.0 - 2.0 * fm1);
    let c_e = 0.5 * (1.0 - 3.0 * fm2);

    let sum: Float = (0..PBD_SAMPLES)
        .map(|i| {
            // Real and virtual point source depths.
            let zr = -(1.0 - (i as Float + 0.5) / PBD_SAMPLES as Float).ln() / sigmap_t;
            let zv = -zr + 2.0 * ze;
            let dr = (r * r + zr * zr).sqrt();
            let dv = (r * r + zv * zv).sqrt();

            let fluence =
                INV_FOUR_PI / d_g * ((-sigma_tr * dr).exp() / dr - (-sigma_tr * dv).exp() / dv);
            let irradiance = INV_FOUR_PI
                * (zr * (1.0 + sigma_tr * dr) * (-sigma_tr * dr).exp() / (dr * dr * dr)
                    - zv * (1.0 + sigma_tr * dv) * (-sigma_tr * dv).exp() / (dv * dv * dv));

            let exitance = fluence * c_phi + irradiance * c_e;
            let kappa = 1.0 - (-2.0 * sigmap_t * (dr + zr)).exp();
            kappa * rhop * rhop * exitance
        })
        .sum();
    sum / PBD_SAMPLES as Float
}

/// Single-scattering radiant exitance at radius `r` from a normally
/// incident beam.
///
/// * `sigma_s` - Scattering coefficient.
/// * `sigma_a` - Absorption coefficient.
/// * `g`       - Phase function asymmetry.
/// * `eta`     - Relative index of refraction.
/// * `r`       - Radial distance.
pub fn beam_diffusion_ss(sigma_s: Float, sigma_a: Float, g: Float, eta: Float, r: Float) -> Float {
    let sigma_t = sigma_a + sigma_s;
    let rho = sigma_s / sigma_t;

    // Minimum depth below the critical angle.
    let t_crit = r * safe_sqrt(eta * eta - 1.0);

    let sum: Float = (0..PBD_SAMPLES)
        .map(|i| {
            let ti = t_crit - (1.0 - (i as Float + 0.5) / PBD_SAMPLES as Float).ln() / sigma_t;
            let d = (r * r + ti * ti).sqrt();
            let cos_o = ti / d;
            rho * (-sigma_t * (d + t_crit)).exp() / (d * d)
                * phase_hg(cos_o, g)
                * (1.0 - fr_dielectric(-cos_o, 1.0, eta))
                * abs(cos_o)
        })
        .sum();
    sum / PBD_SAMPLES as Float
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exitance_decays_with_radius() {
        let near = beam_diffusion_ms(0.8, 0.2, 0.0, 1.33, 0.01);
        let far = beam_diffusion_ms(0.8, 0.2, 0.0, 1.33, 1.0);
        assert!(near > far && far > 0.0, "{} {}", near, far);

        let near = beam_diffusion_ss(0.8, 0.2, 0.0, 1.33, 0.01);
        let far = beam_diffusion_ss(0.8, 0.2, 0.0, 1.33, 1.0);
        assert!(near > far && far >= 0.0, "{} {}", near, far);
    }

    #[test]
    fn no_scattering_no_exitance() {
        assert_eq!(beam_diffusion_ss(0.0, 1.0, 0.0, 1.33, 0.1), 0.0);
        assert_eq!(beam_diffusion_ms(0.0, 1.0, 0.0, 1.33, 0.1), 0.0);
    }
}
