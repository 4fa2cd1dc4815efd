//! Trowbridge-Reitz Distribution

use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;

/// Smallest alpha used; D diverges as alpha approaches zero, so perfectly
/// smooth surfaces must use the specular lobes instead.
const MIN_ALPHA: Float = 0.001;

/// Anisotropic Trowbridge-Reitz (GGX) distribution.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrowbridgeReitzDistribution {
    /// Restrict sampling to normals visible from the outgoing direction.
    pub sample_visible_area: bool,

    /// Roughness for microfacets oriented perpendicular to the x-axis
    /// (α = √2 σ for RMS slope σ).
    pub alpha_x: Float,

    /// Roughness for microfacets oriented perpendicular to the y-axis.
    pub alpha_y: Float,
}

impl TrowbridgeReitzDistribution {
    /// Create a new `TrowbridgeReitzDistribution`. Alphas are clamped to a
    /// small positive minimum.
    ///
    /// * `alpha_x`             - Roughness along x.
    /// * `alpha_y`             - Roughness along y.
    /// * `sample_visible_area` - Sample only visible normals.
    pub fn new(alpha_x: Float, alpha_y: Float, sample_visible_area: bool) -> Self {
        Self {
            sample_visible_area,
            alpha_x: max(MIN_ALPHA, alpha_x),
            alpha_y: max(MIN_ALPHA, alpha_y),
        }
    }

    /// Maps a perceptually linear roughness in [0, 1] to alpha. Monotone and
    /// continuous, approaching zero at the mirror end.
    ///
    /// * `roughness` - Roughness parameter value.
    pub fn roughness_to_alpha(roughness: Float) -> Float {
        let x = max(roughness, 1e-3).ln();
        1.62142 + x * (0.819955 + x * (0.1734 + x * (0.0171201 + x * 0.000640711)))
    }

    /// Returns D(wh).
    pub fn d(&self, wh: &Vector3f) -> Float {
        let tan2_theta = tan_2_theta(wh);
        if tan2_theta.is_infinite() || tan2_theta.is_nan() {
            return 0.0;
        }

        let cos4_theta = cos_2_theta(wh) * cos_2_theta(wh);
        let e = (cos_2_phi(wh) / (self.alpha_x * self.alpha_x)
            + sin_2_phi(wh) / (self.alpha_y * self.alpha_y))
            * tan2_theta;
        1.0 / (PI * self.alpha_x * self.alpha_y * cos4_theta * (1.0 + e) * (1.0 + e))
    }

    /// Returns Λ(w) for the Smith masking function.
    pub fn lambda(&self, w: &Vector3f) -> Float {
        let abs_tan_theta = abs(tan_theta(w));
        if abs_tan_theta.is_infinite() || abs_tan_theta.is_nan() {
            return 0.0;
        }

        let alpha = (cos_2_phi(w) * self.alpha_x * self.alpha_x
            + sin_2_phi(w) * self.alpha_y * self.alpha_y)
            .sqrt();
        let alpha2_tan2_theta = (alpha * abs_tan_theta) * (alpha * abs_tan_theta);
        (-1.0 + (1.0 + alpha2_tan2_theta).sqrt()) / 2.0
    }

    /// Samples a microfacet normal on the same side as `wo`.
    pub fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f {
        if self.sample_visible_area {
            let flip = wo.z < 0.0;
            let w = if flip { -*wo } else { *wo };
            let wh = self.sample_visible(&w, u);
            return if flip { -wh } else { wh };
        }

        // Draw from D(wh) cos(θh).
        let (phi, alpha2) = if self.alpha_x == self.alpha_y {
            (TWO_PI * u[1], self.alpha_x * self.alpha_x)
        } else {
            let mut phi = (self.alpha_y / self.alpha_x * (TWO_PI * u[1] + 0.5 * PI).tan()).atan();
            if u[1] > 0.5 {
                phi += PI;
            }
            let (sin_phi, cos_phi) = phi.sin_cos();
            let inv = cos_phi * cos_phi / (self.alpha_x * self.alpha_x)
                + sin_phi * sin_phi / (self.alpha_y * self.alpha_y);
            (phi, 1.0 / inv)
        };
        let tan2_theta = alpha2 * u[0] / (1.0 - u[0]);
        let cos_theta = 1.0 / (1.0 + tan2_theta).sqrt();
        let sin_theta = safe_sqrt(1.0 - cos_theta * cos_theta);

        let wh = spherical_direction(sin_theta, cos_theta, phi);
        if same_hemisphere(wo, &wh) {
            wh
        } else {
            -wh
        }
    }

    /// Visible normal sampling for `wi` in the upper hemisphere: stretch to
    /// the unit-roughness configuration, sample a slope, rotate back and
    /// unstretch.
    fn sample_visible(&self, wi: &Vector3f, u: &Point2f) -> Vector3f {
        let stretched = Vector3f::new(self.alpha_x * wi.x, self.alpha_y * wi.y, wi.z).normalize();

        let (sx, sy) = sample_unit_slope(cos_theta(&stretched), u[0], u[1]);

        let (cp, sp) = (cos_phi(&stretched), sin_phi(&stretched));
        let slope_x = self.alpha_x * (cp * sx - sp * sy);
        let slope_y = self.alpha_y * (sp * sx + cp * sy);

        Vector3f::new(-slope_x, -slope_y, 1.0).normalize()
    }
}

/// Samples the slope distribution of visible normals for unit roughness.
///
/// * `cos_theta` - Cosine of the stretched incident direction.
/// * `u1`        - Uniform random value.
/// * `u2`        - Uniform random value.
fn sample_unit_slope(cos_theta: Float, u1: Float, u2: Float) -> (Float, Float) {
    if cos_theta > 0.9999 {
        let r = (u1 / (1.0 - u1)).sqrt();
        let (s, c) = (TWO_PI * u2).sin_cos();
        return (r * c, r * s);
    }

    let sin_theta = safe_sqrt(1.0 - cos_theta * cos_theta);
    let tan_theta = sin_theta / cos_theta;
    let a = 1.0 / tan_theta;
    let g1 = 2.0 / (1.0 + (1.0 + 1.0 / (a * a)).sqrt());

    // slope_x
    let a = 2.0 * u1 / g1 - 1.0;
    let tmp = min(1.0 / (a * a - 1.0), 1e10);
    let b = tan_theta;
    let d = max(b * b * tmp * tmp - (a * a - b * b) * tmp, 0.0).sqrt();
    let slope_x_1 = b * tmp - d;
    let slope_x_2 = b * tmp + d;
    let slope_x = if a < 0.0 || slope_x_2 > 1.0 / tan_theta {
        slope_x_1
    } else {
        slope_x_2
    };

    // slope_y
    let (s, u2) = if u2 > 0.5 {
        (1.0, 2.0 * (u2 - 0.5))
    } else {
        (-1.0, 2.0 * (0.5 - u2))
    };
    let z = (u2 * (u2 * (u2 * 0.27385 - 0.73369) + 0.46341))
        / (u2 * (u2 * (u2 * 0.093073 + 0.309420) - 1.000000) + 0.597999);
    let slope_y = s * z * (1.0 + slope_x * slope_x).sqrt();

    (slope_x, slope_y)
}
