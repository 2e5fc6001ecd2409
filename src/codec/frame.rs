use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use crate::error::{Error, Result};

/// Leading header of a compressed save file.
///
/// Bits 6-7 of the first byte select the width of the little-endian
/// length delta that follows it. The delta is added to the size of the
/// compressed block to obtain the decompressed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub size_class: u8,
    pub delta_width: usize,
    pub length_delta: u32,
}

impl FrameHeader {
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let first = *raw.first().ok_or(Error::FrameTooShort { len: raw.len() })?;
        let size_class = (first >> 6) & 3;
        let delta_width = match size_class {
            2 => 2,
            3 => 4,
            _ => return Err(Error::InvalidSizeClass { size_class }),
        };

        if raw.len() < 1 + delta_width {
            return Err(Error::FrameTooShort { len: raw.len() });
        }
        let delta_bytes = &raw[1..1 + delta_width];
        let length_delta = match delta_width {
            2 => LittleEndian::read_u16(delta_bytes) as u32,
            _ => LittleEndian::read_u32(delta_bytes),
        };

        Ok(Self { size_class, delta_width, length_delta })
    }

    /// Bytes taken by the header itself
    pub fn header_len(&self) -> usize {
        1 + self.delta_width
    }

    pub fn decompressed_len(&self, file_len: usize) -> usize {
        (file_len - self.header_len()) + self.length_delta as usize
    }
}

/// Upper bound on LZ4 block expansion: a match length extension byte
/// adds at most 255 output bytes
const MAX_EXPANSION: usize = 255;

/// Strip the frame header and decompress the LZ4 block behind it
pub fn decompress_frame(raw: &[u8]) -> Result<Vec<u8>> {
    let header = FrameHeader::parse(raw)?;
    let expected = header.decompressed_len(raw.len());
    let compressed_len = raw.len() - header.header_len();
    let limit = compressed_len.saturating_mul(MAX_EXPANSION);
    if expected > limit {
        return Err(Error::LengthMismatch { expected, actual: limit });
    }
    debug!(
        size_class = header.size_class,
        length_delta = header.length_delta,
        expected,
        "decompressing save frame"
    );

    let mut output = vec![0u8; expected];
    let produced = lz4_flex::block::decompress_into(&raw[header.header_len()..], &mut output)
        .map_err(|e| Error::Decompression(e.to_string()))?;
    if produced != expected {
        return Err(Error::LengthMismatch { expected, actual: produced });
    }
    Ok(output)
}

/// Read a save file from disk and decompress it
pub fn read_frame_file(path: &Path) -> Result<Vec<u8>> {
    let raw = std::fs::read(path)?;
    decompress_frame(&raw)
}

/// Path the decompressed copy of `input` is written to for inspection
pub fn diagnostic_path(input: &Path) -> std::path::PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".decomp");
    name.into()
}

pub fn write_diagnostic(input: &Path, decompressed: &[u8]) -> Result<()> {
    let path = diagnostic_path(input);
    std::fs::write(&path, decompressed)?;
    debug!(path = %path.display(), len = decompressed.len(), "wrote decompressed save");
    Ok(())
}
