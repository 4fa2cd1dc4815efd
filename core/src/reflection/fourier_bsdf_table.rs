//! Fourier BSDF Table

use super::bsdf_reader::*;
use crate::interpolation::*;
use crate::pbrt::*;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Read, Write};

/// Measured or precomputed BSDF stored as Fourier series in Δφ for every
/// pair of discretized zenith cosines.
#[derive(Clone, Debug, PartialEq)]
pub struct FourierBSDFTable {
    /// Relative index of refraction across the surface.
    pub eta: Float,

    /// Maximum series length over all direction pairs.
    pub m_max: usize,

    /// 1 for monochrome tables; 3 for luminance, red and blue.
    pub n_channels: usize,

    /// Sorted zenith cosines.
    pub mu: Vec<Float>,

    /// Series length per `(μi, μo)` pair.
    pub m: Vec<usize>,

    /// Start of each pair's coefficients inside `a`.
    pub a_offset: Vec<usize>,

    /// All series coefficients.
    pub a: Vec<Float>,

    /// First coefficient of every pair, used for zenith sampling.
    pub a0: Vec<Float>,

    /// Running integrals of `a0` rows.
    pub cdf: Vec<Float>,

    /// `1 / k` for `k < m_max`.
    pub recip: Vec<Float>,
}

impl FourierBSDFTable {
    /// Loads a table from a file.
    ///
    /// * `path` - The file path.
    pub fn from_file(path: &str) -> Result<Self, String> {
        let mut reader = open_file(path)?;
        Self::read(&mut reader).map_err(|err| format!("{}: {}", path, err))
    }

    /// Parses a table from a byte stream.
    ///
    /// * `reader` - Source positioned at the header.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, String> {
        reader.check_header()?;

        let flags = reader.read_i32_le()?;
        let n_mu = non_negative(reader.read_i32_le()?, "nMu")?;
        let n_coeffs = non_negative(reader.read_i32_le()?, "nCoeffs")?;
        let m_max = non_negative(reader.read_i32_le()?, "mMax")?;
        let n_channels = non_negative(reader.read_i32_le()?, "nChannels")?;
        let n_bases = reader.read_i32_le()?;
        reader.read_i32_vec(3)?;
        let eta = reader.read_f32_le()?;
        reader.read_i32_vec(4)?;

        // Only uniform (untextured) monochrome and RGB tables are supported.
        if flags != 1 || (n_channels != 1 && n_channels != 3) || n_bases != 1 {
            return Err(format!(
                "Unsupported BSDF file: flags={} channels={} bases={}",
                flags, n_channels, n_bases
            ));
        }

        let pairs = n_mu * n_mu;
        let mu = reader.read_f32_vec(n_mu)?;
        let cdf = reader.read_f32_vec(pairs)?;
        let offset_and_length = reader.read_i32_vec(pairs * 2)?;
        let a = reader.read_f32_vec(n_coeffs)?;

        let mut a0 = Vec::with_capacity(pairs);
        let mut a_offset = Vec::with_capacity(pairs);
        let mut m = Vec::with_capacity(pairs);
        for pair in offset_and_length.chunks_exact(2) {
            let offset = non_negative(pair[0], "offset")?;
            let length = non_negative(pair[1], "length")?;
            if offset + length * n_channels > a.len() || length > m_max {
                return Err(format!(
                    "Coefficient range {}+{} is out of bounds",
                    offset, length
                ));
            }
            a_offset.push(offset);
            m.push(length);
            a0.push(if length > 0 { a[offset] } else { 0.0 });
        }

        let recip = (0..m_max).map(|i| 1.0 / i as Float).collect();

        Ok(Self {
            eta,
            m_max,
            n_channels,
            mu,
            m,
            a_offset,
            a,
            a0,
            cdf,
            recip,
        })
    }

    /// Monochrome table whose series is the constant `a0` for every pair of
    /// zenith cosines, i.e. a BSDF independent of Δφ.
    ///
    /// * `mu`  - Sorted zenith cosines.
    /// * `a0`  - The constant coefficient.
    /// * `eta` - Relative index of refraction.
    pub fn constant(mu: Vec<Float>, a0: Float, eta: Float) -> Self {
        let n_mu = mu.len();
        let pairs = n_mu * n_mu;
        let first = mu.first().copied().unwrap_or(0.0);
        let row: Vec<Float> = mu.iter().map(|m| a0 * (m - first)).collect();
        Self {
            eta,
            m_max: 1,
            n_channels: 1,
            m: vec![1; pairs],
            a_offset: (0..pairs).collect(),
            a: vec![a0; pairs],
            a0: vec![a0; pairs],
            cdf: row.iter().copied().cycle().take(pairs).collect(),
            recip: vec![Float::INFINITY],
            mu,
        }
    }

    /// Encodes the table in the format `read` accepts.
    ///
    /// * `writer` - Destination.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), String> {
        let err = |e: std::io::Error| format!("Error writing BSDF table. {}", e);
        let count = |n: usize| i32::try_from(n).map_err(|_| format!("{} does not fit in i32", n));

        writer.write_all(&BSDF_FILE_HEADER).map_err(err)?;
        let header = [
            1,
            count(self.mu.len())?,
            count(self.a.len())?,
            count(self.m_max)?,
            count(self.n_channels)?,
            1,
            0,
            0,
            0,
        ];
        for v in header {
            writer.write_i32::<LittleEndian>(v).map_err(err)?;
        }
        writer.write_f32::<LittleEndian>(self.eta).map_err(err)?;
        for _ in 0..4 {
            writer.write_i32::<LittleEndian>(0).map_err(err)?;
        }
        for v in self.mu.iter().chain(self.cdf.iter()) {
            writer.write_f32::<LittleEndian>(*v).map_err(err)?;
        }
        for (offset, length) in self.a_offset.iter().zip(self.m.iter()) {
            writer.write_i32::<LittleEndian>(count(*offset)?).map_err(err)?;
            writer.write_i32::<LittleEndian>(count(*length)?).map_err(err)?;
        }
        for v in self.a.iter() {
            writer.write_f32::<LittleEndian>(*v).map_err(err)?;
        }
        Ok(())
    }

    /// Returns the series length and coefficients (all channels, channel
    /// major) for a pair of zenith indices.
    ///
    /// * `offset_i` - Index into `mu` for the incident direction.
    /// * `offset_o` - Index into `mu` for the outgoing direction.
    pub fn get_ak(&self, offset_i: usize, offset_o: usize) -> (usize, &[Float]) {
        let pair = offset_o * self.mu.len() + offset_i;
        let start = self.a_offset[pair];
        (self.m[pair], &self.a[start..])
    }

    /// Spline weights and first node index for a zenith cosine.
    ///
    /// * `cos_theta` - The zenith cosine.
    pub fn get_weights_and_offset(&self, cos_theta: Float) -> Option<([Float; 4], isize)> {
        catmull_rom_weights(&self.mu, cos_theta)
    }
}

fn non_negative(v: i32, name: &str) -> Result<usize, String> {
    usize::try_from(v).map_err(|_| format!("Negative {} ({})", name, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn constant_table_bytes(mu: &[f32], a0: f32, eta: f32) -> Vec<u8> {
        let mut out = Vec::new();
        FourierBSDFTable::constant(mu.to_vec(), a0, eta).write(&mut out).unwrap();
        out
    }

    #[test]
    fn parses_constant_table() {
        let mu = [-1.0, -0.5, 0.0, 0.5, 1.0];
        let bytes = constant_table_bytes(&mu, 0.25, 1.5);
        let table = FourierBSDFTable::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(table.mu, mu.to_vec());
        assert_eq!(table.n_channels, 1);
        assert_eq!(table.m_max, 1);
        assert_eq!(table.eta, 1.5);
        let (m, ak) = table.get_ak(2, 3);
        assert_eq!(m, 1);
        assert_eq!(ak.len(), 8);
        assert_eq!(ak[0], 0.25);
    }

    #[test]
    fn written_table_reads_back() {
        let table = FourierBSDFTable::constant(vec![-1.0, 0.0, 1.0], 0.5, 1.33);
        let mut out = Vec::new();
        table.write(&mut out).unwrap();
        assert_eq!(FourierBSDFTable::read(&mut Cursor::new(out)).unwrap(), table);
    }

    #[test]
    fn rejects_bad_header() {
        let mut bytes = constant_table_bytes(&[0.0, 1.0], 0.1, 1.0);
        bytes[0] = b'X';
        let err = FourierBSDFTable::read(&mut Cursor::new(bytes)).unwrap_err();
        assert!(err.starts_with("Invalid header"));
    }

    #[test]
    fn rejects_truncated_file() {
        let bytes = constant_table_bytes(&[0.0, 1.0], 0.1, 1.0);
        let truncated = bytes[..bytes.len() - 2].to_vec();
        assert!(FourierBSDFTable::read(&mut Cursor::new(truncated)).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(FourierBSDFTable::from_file("/nonexistent/table.bsdf").is_err());
    }
}
