//! BxDF Type

use bitflags::bitflags;

bitflags! {
    /// Classifies a lobe by hemisphere and by how concentrated it is.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct BxDFType: u8 {
        const REFLECTION = 0b00001;
        const TRANSMISSION = 0b00010;
        const DIFFUSE = 0b00100;
        const GLOSSY = 0b01000;
        const SPECULAR = 0b10000;
        const ALL = Self::REFLECTION.bits()
            | Self::TRANSMISSION.bits()
            | Self::DIFFUSE.bits()
            | Self::GLOSSY.bits()
            | Self::SPECULAR.bits();
    }
}

impl BxDFType {
    /// Tests whether any bit of `flag` is set.
    ///
    /// * `flag` - Flags to test.
    pub fn matches(&self, flag: Self) -> bool {
        self.intersects(flag)
    }

    /// Returns true for delta-distributed lobes.
    pub fn is_specular(&self) -> bool {
        self.contains(Self::SPECULAR)
    }
}

impl Default for BxDFType {
    fn default() -> Self {
        Self::empty()
    }
}
