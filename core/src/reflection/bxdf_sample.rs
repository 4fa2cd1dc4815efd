//! BxDF Sample

use super::*;

/// Result of sampling a lobe. A zero `pdf` means no direction was produced.
#[derive(Copy, Clone, Debug, Default)]
pub struct BxDFSample {
    /// The sample value.
    pub f: Spectrum,

    /// The value of the PDF.
    pub pdf: Float,

    /// The sampled incident direction.
    pub wi: Vector3f,

    /// The type of lobe that produced the sample.
    pub bxdf_type: BxDFType,
}

impl BxDFSample {
    /// Create a new `BxDFSample`.
    ///
    /// * `f`         - The sample value.
    /// * `pdf`       - The value of the PDF.
    /// * `wi`        - The sampled incident direction.
    /// * `bxdf_type` - The type of lobe.
    pub fn new(f: Spectrum, pdf: Float, wi: Vector3f, bxdf_type: BxDFType) -> Self {
        Self {
            f,
            pdf,
            wi,
            bxdf_type,
        }
    }

    /// Returns true if a direction with positive density was produced.
    pub fn is_valid(&self) -> bool {
        self.pdf > 0.0
    }

    /// Returns the Monte Carlo weight `f |cos θi| / pdf` for a sample whose
    /// `wi` is in the local shading frame. World-space samples from
    /// `BSDF::sample_f` go through `BSDF::weight`.
    pub fn weight(&self) -> Spectrum {
        if self.pdf > 0.0 {
            self.f * abs_cos_theta(&self.wi) / self.pdf
        } else {
            Spectrum::ZERO
        }
    }
}

impl From<BxDFType> for BxDFSample {
    /// A failed sample of the given lobe type.
    fn from(bxdf_type: BxDFType) -> Self {
        Self {
            bxdf_type,
            ..Default::default()
        }
    }
}
