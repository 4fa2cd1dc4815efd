//! Fresnel Specular

use super::*;
use crate::material::TransportMode;

/// A single delta lobe that reflects with probability F and refracts
/// otherwise, so the sample weight needs no further division.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FresnelSpecular {
    r: Spectrum,
    t: Spectrum,

    /// Index of refraction above the surface (normal side).
    eta_a: Float,

    /// Index of refraction below the surface.
    eta_b: Float,

    mode: TransportMode,
}

impl FresnelSpecular {
    /// Create a new instance of `FresnelSpecular`.
    ///
    /// * `r`     - Spectrum used to scale the reflected colour.
    /// * `t`     - Spectrum used to scale the transmitted colour.
    /// * `eta_a` - Index of refraction above the surface.
    /// * `eta_b` - Index of refraction below the surface.
    /// * `mode`  - Transport mode.
    pub fn new(r: Spectrum, t: Spectrum, eta_a: Float, eta_b: Float, mode: TransportMode) -> Self {
        Self {
            r,
            t,
            eta_a,
            eta_b,
            mode,
        }
    }

    pub fn get_type(&self) -> BxDFType {
        BxDFType::REFLECTION | BxDFType::TRANSMISSION | BxDFType::SPECULAR
    }

    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Chooses reflection when `u[0] < F`, refraction otherwise.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        let fr = fr_dielectric(cos_theta(wo), self.eta_a, self.eta_b);

        if u[0] < fr {
            let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
            let bxdf_type = BxDFType::SPECULAR | BxDFType::REFLECTION;
            return BxDFSample::new(fr * self.r / abs_cos_theta(&wi), fr, wi, bxdf_type);
        }

        let (eta_i, eta_t) = if cos_theta(wo) > 0.0 {
            (self.eta_a, self.eta_b)
        } else {
            (self.eta_b, self.eta_a)
        };
        let bxdf_type = BxDFType::SPECULAR | BxDFType::TRANSMISSION;
        let n = Normal3f::new(0.0, 0.0, 1.0).face_forward(wo);
        match refract(wo, &n, eta_i / eta_t) {
            Some(wi) => {
                let mut ft = self.t * (1.0 - fr);
                if self.mode == TransportMode::Radiance {
                    ft *= (eta_i * eta_i) / (eta_t * eta_t);
                }
                BxDFSample::new(ft / abs_cos_theta(&wi), 1.0 - fr, wi, bxdf_type)
            }
            None => BxDFSample::from(bxdf_type),
        }
    }
}
