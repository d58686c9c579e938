//! Text encodings used by GFF payloads.
//!
//! The format family predates any single text encoding: PC builds of the
//! newer games store UTF-16, console builds may flip the byte order and the
//! oldest games wrote single byte Latin-1. Which encoding applies is not
//! recorded in the files themselves, so callers pick one per game.

use widestring::U16String;

/// A text encoding for string payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8, one byte per code unit
    Utf8,
    /// UTF-16 little endian, two bytes per code unit
    Utf16Le,
    /// UTF-16 big endian, two bytes per code unit
    Utf16Be,
    /// ISO 8859-1, one byte per code unit
    Latin1,
}

impl Encoding {
    /// Size in bytes of one code unit of this encoding
    pub fn unit_size(self) -> u64 {
        match self {
            Encoding::Utf8 | Encoding::Latin1 => 1,
            Encoding::Utf16Le | Encoding::Utf16Be => 2,
        }
    }
}

/// Decode raw bytes into a string, replacing invalid sequences.
///
/// A trailing odd byte of a UTF-16 buffer is dropped.
pub fn decode_bytes(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
        Encoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
        Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

fn decode_utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect();

    U16String::from_vec(units).to_string_lossy()
}
