// Dictionary binary format: header parsing, validation

use crate::FstError;

/// Header magic constants (little-endian).
pub(crate) const COOKIE1: u32 = 0x4B44_5846;
pub(crate) const COOKIE2: u32 = 0x0001_F57A;

/// Format version written by [`crate::FstBuilder`].
pub const FORMAT_VERSION: u8 = 1;

/// Size of the binary header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Parsed dictionary header.
///
/// The header occupies the first 16 bytes of a dictionary image:
/// - bytes 0..4: cookie1 (magic number)
/// - bytes 4..8: cookie2 (magic number)
/// - byte 8: format version
/// - bytes 9..12: reserved (must be zero)
/// - bytes 12..16: number of keys stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub key_count: u32,
}

/// Parses and validates the 16-byte header.
pub fn parse_header(data: &[u8]) -> Result<Header, FstError> {
    if data.len() < HEADER_SIZE {
        return Err(FstError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let cookie1 = read_u32(data, 0);
    let cookie2 = read_u32(data, 4);

    if cookie1 != COOKIE1 || cookie2 != COOKIE2 {
        return Err(FstError::InvalidMagic);
    }

    let version = data[8];
    if version != FORMAT_VERSION {
        return Err(FstError::UnsupportedVersion(version));
    }

    if data[9..12] != [0u8; 3] {
        return Err(FstError::ReservedBytes);
    }

    Ok(Header {
        version,
        key_count: read_u32(data, 12),
    })
}

/// Serialize a header for `key_count` keys.
pub fn write_header(buf: &mut Vec<u8>, key_count: u32) {
    buf.extend_from_slice(&COOKIE1.to_le_bytes());
    buf.extend_from_slice(&COOKIE2.to_le_bytes());
    buf.push(FORMAT_VERSION);
    buf.extend_from_slice(&[0u8; 3]);
    buf.extend_from_slice(&key_count.to_le_bytes());
}

#[inline]
pub(crate) fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Round `offset` up to the next multiple of `align`.
#[inline]
pub(crate) fn align_to(offset: usize, align: usize) -> usize {
    let partial = offset % align;
    if partial > 0 { offset + (align - partial) } else { offset }
}
