//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

use aurora_gff4::FourCc;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// the container holding the talk table could not be read
    #[error("unable to load GFF talk table")]
    GffError(#[from] aurora_gff4::Error),

    /// file is not a talk table
    #[error("file is not a talk table")]
    InvalidFile,

    /// talk table version is not supported
    #[error("unsupported talk table version {0}")]
    UnsupportedVersion(FourCc),

    /// a block the header declares does not fit
    #[error("talk table ends at {size:#x}, expected data at {offset:#x}")]
    Truncated {
        /// Extent the header asks for
        offset: u64,
        /// Where the data that is present ends
        size: u64,
    },

    /// a Huffman coded string could not be decoded
    #[error("unable to decode Huffman coded string")]
    Huffman(#[from] HuffmanError),
}

/// Error type describing why a Huffman coded string could not be decoded
///
/// These always fail the one string being decoded, never the whole table.
#[derive(Error, Diagnostic, Debug)]
pub enum HuffmanError {
    /// tree blob holds no nodes
    #[error("Huffman tree is empty")]
    EmptyTree,

    /// a walk reached a node outside the tree
    #[error("node {node} is outside the Huffman tree ({count} nodes)")]
    BadNode {
        /// The out of range node index
        node: i32,
        /// Number of nodes in the tree
        count: usize,
    },

    /// the bit cursor ran past the end of the bitstream
    #[error("bit {bit} is past the end of the bitstream ({len} bits)")]
    BitOutOfRange {
        /// Absolute index of the bit that was requested
        bit: u64,
        /// Number of bits in the stream
        len: u64,
    },

    /// a walk took more steps than the tree has nodes
    #[error("no leaf after {0} steps, the Huffman tree has a cycle")]
    StepLimit(usize),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
