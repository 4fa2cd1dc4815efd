//! BSDF Reader

use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read};

/// Tabulated scattering files start with `SCATFUN` followed by a version byte.
pub const BSDF_FILE_HEADER: [u8; 8] = *b"SCATFUN\x01";

/// Opens a file for buffered reading.
///
/// * `path` - The file path.
pub fn open_file(path: &str) -> Result<BufReader<File>, String> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| format!("Could not open {}. {}", path, err))
}

/// Little-endian readers for tabulated scattering files.
pub trait BSDFReader {
    /// Reads the header bytes and compares them to `BSDF_FILE_HEADER`.
    fn check_header(&mut self) -> Result<(), String>;

    /// Reads one 32-bit signed value.
    fn read_i32_le(&mut self) -> Result<i32, String>;

    /// Reads one 32-bit floating point value.
    fn read_f32_le(&mut self) -> Result<f32, String>;

    /// Reads `count` 32-bit signed values.
    fn read_i32_vec(&mut self, count: usize) -> Result<Vec<i32>, String>;

    /// Reads `count` 32-bit floating point values.
    fn read_f32_vec(&mut self, count: usize) -> Result<Vec<f32>, String>;
}

impl<R: Read> BSDFReader for R {
    fn check_header(&mut self) -> Result<(), String> {
        let mut header = [0_u8; 8];
        self.read_exact(&mut header)
            .map_err(|err| format!("Error reading header. {}", err))?;
        if header == BSDF_FILE_HEADER {
            Ok(())
        } else {
            Err(format!(
                "Invalid header '{}'. Expected '{}'.",
                String::from_utf8_lossy(&header),
                String::from_utf8_lossy(&BSDF_FILE_HEADER),
            ))
        }
    }

    fn read_i32_le(&mut self) -> Result<i32, String> {
        self.read_i32::<LittleEndian>()
            .map_err(|err| format!("Error reading one i32. {}.", err))
    }

    fn read_f32_le(&mut self) -> Result<f32, String> {
        self.read_f32::<LittleEndian>()
            .map_err(|err| format!("Error reading one f32. {}.", err))
    }

    fn read_i32_vec(&mut self, count: usize) -> Result<Vec<i32>, String> {
        let mut buffer = vec![0_i32; count];
        self.read_i32_into::<LittleEndian>(&mut buffer)
            .map_err(|err| format!("Error reading {} i32. {}.", count, err))?;
        Ok(buffer)
    }

    fn read_f32_vec(&mut self, count: usize) -> Result<Vec<f32>, String> {
        let mut buffer = vec![0.0_f32; count];
        self.read_f32_into::<LittleEndian>(&mut buffer)
            .map_err(|err| format!("Error reading {} f32. {}.", count, err))?;
        Ok(buffer)
    }
}
