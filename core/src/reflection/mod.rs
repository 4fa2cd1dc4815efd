//! Reflection Models

use crate::geometry::*;
use crate::microfacet::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::spectrum::*;

mod bsdf;
mod bsdf_reader;
mod bxdf_sample;
mod bxdf_type;
mod common;
mod fourier_bsdf;
mod fourier_bsdf_table;
mod fresnel;
mod fresnel_blend;
mod fresnel_specular;
mod lambertian_reflection;
mod microfacet_reflection;
mod microfacet_transmission;
mod specular_reflection;
mod specular_transmission;

// Re-export
pub use bsdf::*;
pub use bsdf_reader::*;
pub use bxdf_sample::*;
pub use bxdf_type::*;
pub use common::*;
pub use fourier_bsdf::*;
pub use fourier_bsdf_table::*;
pub use fresnel::*;
pub use fresnel_blend::*;
pub use fresnel_specular::*;
pub use lambertian_reflection::*;
pub use microfacet_reflection::*;
pub use microfacet_transmission::*;
pub use specular_reflection::*;
pub use specular_transmission::*;

/// A single scattering lobe expressed in the local shading frame.
#[derive(Clone, Debug, PartialEq)]
pub enum BxDF {
    LambertianReflection(LambertianReflection),
    SpecularReflection(SpecularReflection),
    SpecularTransmission(SpecularTransmission),
    FresnelSpecular(FresnelSpecular),
    MicrofacetReflection(MicrofacetReflection),
    MicrofacetTransmission(MicrofacetTransmission),
    FresnelBlend(FresnelBlend),
    FourierBSDF(FourierBSDF),
}

impl BxDF {
    /// Returns the lobe type.
    pub fn get_type(&self) -> BxDFType {
        match self {
            BxDF::LambertianReflection(bxdf) => bxdf.get_type(),
            BxDF::SpecularReflection(bxdf) => bxdf.get_type(),
            BxDF::SpecularTransmission(bxdf) => bxdf.get_type(),
            BxDF::FresnelSpecular(bxdf) => bxdf.get_type(),
            BxDF::MicrofacetReflection(bxdf) => bxdf.get_type(),
            BxDF::MicrofacetTransmission(bxdf) => bxdf.get_type(),
            BxDF::FresnelBlend(bxdf) => bxdf.get_type(),
            BxDF::FourierBSDF(bxdf) => bxdf.get_type(),
        }
    }

    /// Returns true if every flag of this lobe is contained in `t`.
    ///
    /// * `t` - Requested flags.
    pub fn matches_flags(&self, t: BxDFType) -> bool {
        t.contains(self.get_type())
    }

    /// Returns the value of the distribution function for a pair of
    /// directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        match self {
            BxDF::LambertianReflection(bxdf) => bxdf.f(wo, wi),
            BxDF::SpecularReflection(bxdf) => bxdf.f(wo, wi),
            BxDF::SpecularTransmission(bxdf) => bxdf.f(wo, wi),
            BxDF::FresnelSpecular(bxdf) => bxdf.f(wo, wi),
            BxDF::MicrofacetReflection(bxdf) => bxdf.f(wo, wi),
            BxDF::MicrofacetTransmission(bxdf) => bxdf.f(wo, wi),
            BxDF::FresnelBlend(bxdf) => bxdf.f(wo, wi),
            BxDF::FourierBSDF(bxdf) => bxdf.f(wo, wi),
        }
    }

    /// Samples an incident direction for `wo`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        match self {
            BxDF::SpecularReflection(bxdf) => bxdf.sample_f(wo),
            BxDF::SpecularTransmission(bxdf) => bxdf.sample_f(wo),
            BxDF::FresnelSpecular(bxdf) => bxdf.sample_f(wo, u),
            BxDF::MicrofacetReflection(bxdf) => bxdf.sample_f(wo, u),
            BxDF::MicrofacetTransmission(bxdf) => bxdf.sample_f(wo, u),
            BxDF::FresnelBlend(bxdf) => bxdf.sample_f(wo, u),
            BxDF::FourierBSDF(bxdf) => bxdf.sample_f(wo, u),
            BxDF::LambertianReflection(_) => self.cosine_sample_f(wo, u),
        }
    }

    /// Evaluates the density of `sample_f`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            BxDF::SpecularReflection(_)
            | BxDF::SpecularTransmission(_)
            | BxDF::FresnelSpecular(_) => 0.0,
            BxDF::MicrofacetReflection(bxdf) => bxdf.pdf(wo, wi),
            BxDF::MicrofacetTransmission(bxdf) => bxdf.pdf(wo, wi),
            BxDF::FresnelBlend(bxdf) => bxdf.pdf(wo, wi),
            BxDF::FourierBSDF(bxdf) => bxdf.pdf(wo, wi),
            BxDF::LambertianReflection(_) => {
                if same_hemisphere(wo, wi) {
                    abs_cos_theta(wi) * INV_PI
                } else {
                    0.0
                }
            }
        }
    }

    /// Hemispherical-directional reflectance: the fraction of light arriving
    /// over the hemisphere that leaves towards `wo`.
    ///
    /// * `wo`      - Outgoing direction.
    /// * `samples` - Uniform 2D samples for the Monte Carlo estimate.
    pub fn rho_hd(&self, wo: &Vector3f, samples: &[Point2f]) -> Spectrum {
        if let BxDF::LambertianReflection(bxdf) = self {
            return bxdf.rho_hd();
        }
        if samples.is_empty() {
            return Spectrum::ZERO;
        }
        let sum = samples.iter().fold(Spectrum::ZERO, |acc, u| {
            acc + self.sample_f(wo, u).weight()
        });
        sum / samples.len() as Float
    }

    /// Cosine-weighted hemisphere sampling on the side of `wo`.
    fn cosine_sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        let mut wi = cosine_sample_hemisphere(u);
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }
        let pdf = self.pdf(wo, &wi);
        BxDFSample::new(self.f(wo, &wi), pdf, wi, self.get_type())
    }
}

macro_rules! bxdf_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for BxDF {
                fn from(bxdf: $variant) -> Self {
                    BxDF::$variant(bxdf)
                }
            }
        )*
    };
}

bxdf_from!(
    LambertianReflection,
    SpecularReflection,
    SpecularTransmission,
    FresnelSpecular,
    MicrofacetReflection,
    MicrofacetTransmission,
    FresnelBlend,
    FourierBSDF
);
