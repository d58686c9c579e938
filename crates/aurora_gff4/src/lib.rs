//! # GFF V4 Container Documentation
//!
//! This crate provides utilities to read data from the **GFF** (Generic File
//! Format) V4.0 and V4.1 container layout used by BioWare's later Aurora-era
//! games, most prominently the *Dragon Age* series. A GFF container is a
//! self-describing block store: a set of struct templates describes the
//! shapes of the records, and a data area holds the record instances.
//!
//! This reader covers the subset of the layout consumed by talk tables:
//! integer fields, string fields, lists of structs and lists of scalars.
//!
//! ## File Structure
//!
//! A GFF file consists of a header, a block of struct templates, one block of
//! field templates per struct template, and the data area.
//!
//! ### Header
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: `"GFF "`                                          |
//! | 0x0004         | Container version      | 4 bytes: `"V4.0"` or `"V4.1"`                              |
//! | 0x0008         | Platform               | 4 bytes: target platform tag, e.g. `"PC  "`                |
//! | 0x000C         | File type              | 4 bytes: payload tag, e.g. `"TLK "`                        |
//! | 0x0010         | Type version           | 4 bytes: payload version tag, e.g. `"V0.5"`                |
//! | 0x0014         | Struct count           | 4 bytes: number of struct templates                        |
//! | 0x0018         | String count           | 4 bytes: V4.1 only, entries in the shared string table     |
//! | 0x001C         | String offset          | 4 bytes: V4.1 only, offset of the shared string table      |
//! | ...            | Data offset            | 4 bytes: offset of the data area                           |
//!
//! The header and all template blocks are little endian regardless of
//! platform. The data area follows the byte order of the target platform:
//! `"PS3 "` and `"X360"` files store it big endian, everything else little
//! endian.
//!
//! The V4.1 shared string table is not used by any talk table payload; its
//! header fields are parsed and otherwise ignored.
//!
//! ### Struct Templates
//!
//! Directly after the header. Each template is 16 bytes:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Label                  | 4 bytes: four character tag of the struct shape         |
//! | 0x0004         | Field count            | 4 bytes: number of field templates                      |
//! | 0x0008         | Field offset           | 4 bytes: file offset of this struct's field templates   |
//! | 0x000C         | Size                   | 4 bytes: size of one instance in the data area          |
//!
//! The first struct template describes the top level struct, of which one
//! instance sits at the very start of the data area.
//!
//! ### Field Templates
//!
//! Each field template is 12 bytes:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Label                  | 4 bytes: numeric field label                            |
//! | 0x0004         | Type and flags         | 4 bytes: type id in the low 16 bits, flags in the high  |
//! | 0x0008         | Offset                 | 4 bytes: field position inside a struct instance        |
//!
//! Flag bits: `0x80000000` marks a list, `0x40000000` a struct element type
//! (the struct template index then sits in the low 16 bits), `0x20000000` an
//! indirect reference.
//!
//! ### Data Area
//!
//! Scalar fields are stored inline in their struct instance. Strings and
//! lists are stored out of line: the field slot holds a 32 bit offset
//! relative to the start of the data area, where a 32 bit count is followed
//! by the payload (code units for strings, packed elements for lists).
//!
//! ## Additional Information
//!
//! - **File Extensions**: `.gff`, plus payload specific extensions like `.tlk`
//! - **Endianness**: templates little-endian, data area per platform tag
//!

pub mod encoding;
pub mod error;
pub mod read;
pub mod types;

pub use encoding::{decode_bytes, Encoding};
pub use error::Error;
pub use read::{Gff4File, Gff4Struct, Gff4StructRef};
pub use types::{ByteOrder, FourCc};
