//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

use crate::types::FourCc;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// file is not a GFF container
    #[error("file is not a GFF container")]
    InvalidFile,

    /// container layout version is not supported
    #[error("unsupported GFF container version {0}")]
    UnsupportedVersion(FourCc),

    /// container holds a different payload than the caller asked for
    #[error("GFF container holds {found}, expected {expected}")]
    WrongType {
        /// The payload tag the caller asked for
        expected: FourCc,
        /// The payload tag found in the header
        found: FourCc,
    },

    /// container declares more data than the file holds
    #[error("block at {offset:#x} is past the end of the file ({size:#x} bytes)")]
    TruncatedFile {
        /// Offset of the block that does not fit
        offset: u64,
        /// Size of the file in bytes
        size: u64,
    },

    /// file is larger than the 32 bit offsets of the format allow
    #[error("file is too large for a GFF container ({size} bytes)")]
    TooLarge {
        /// Size of the file in bytes
        size: u64,
    },

    /// container has no struct templates at all
    #[error("GFF container declares no struct templates")]
    NoStructs,

    /// a data reference points outside the data area
    #[error("data reference {offset:#x}+{len:#x} is outside the data area ({size:#x} bytes)")]
    OutOfBounds {
        /// Offset of the reference, relative to the data area
        offset: u64,
        /// Length of the referenced block in bytes
        len: u64,
        /// Size of the data area in bytes
        size: u64,
    },

    /// a field has a different type than the accessor expects
    #[error("field {label} has type {found:#06x}, expected {expected}")]
    FieldTypeMismatch {
        /// Numeric label of the field
        label: u32,
        /// What the accessor expected to find
        expected: &'static str,
        /// The raw type id found in the field template
        found: u16,
    },

    /// a field carries a type id this reader does not know
    #[error("field {label} has unknown type {raw:#06x}")]
    UnknownFieldType {
        /// Numeric label of the field
        label: u32,
        /// The raw type id found in the field template
        raw: u16,
    },

    /// a struct is missing a field the caller requires
    #[error("struct {strct} has no field {label}")]
    MissingField {
        /// Label of the struct template
        strct: FourCc,
        /// Numeric label of the missing field
        label: u32,
    },

    /// a struct template index points outside the template block
    #[error("struct template {index} out of range ({count} templates)")]
    BadStructIndex {
        /// The out of range template index
        index: usize,
        /// Number of templates in the container
        count: usize,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
