//! # Talk Table Format Documentation
//!
//! This crate provides utilities to read the **talk table** formats used by
//! BioWare's Aurora-era games. A talk table maps 32 bit *string references*
//! (StrRefs) to localized text; game data stores only the references, and the
//! table of the selected language resolves them to strings.
//!
//! Two unrelated on-disk families share the job and this crate reads both:
//!
//! - the plain row table (`"TLK "` magic, version `"V3.0"`), used up to
//!   *Neverwinter Nights 2*: a fixed size entry table in front of one raw
//!   text block, where a string reference is simply a row ordinal,
//! - the GFF'd table (`"GFF "` magic), used by the *Dragon Age* series: talk
//!   table payloads of version `"V0.2"` (text stored per entry) or `"V0.4"`/
//!   `"V0.5"` (all text Huffman coded into two shared blobs) inside a GFF V4
//!   container read through the [`aurora_gff4`] crate.
//!
//! [`read_talk_table`] picks the family by the leading tag; both variants
//! implement the [`TalkTable`] trait. Text is decoded lazily on the first
//! lookup of each reference and cached for the lifetime of the table.
//!
//! ## Plain Row Table Structure
//!
//! The whole file is little endian.
//!
//! ### Header
//!
//! | Offset (bytes) | Field                  | Description                                              |
//! |----------------|------------------------|----------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: `"TLK "`                                        |
//! | 0x0004         | Version                | 4 bytes: `"V3.0"`                                        |
//! | 0x0008         | Language ID            | 4 bytes: numeric id of the stored language               |
//! | 0x000C         | String count           | 4 bytes: number of rows in the entry table               |
//! | 0x0010         | String entries offset  | 4 bytes: file offset of the raw text block               |
//!
//! ### Entry Table
//!
//! Directly after the header. Each row is 40 bytes:
//!
//! | Offset (bytes) | Field                  | Description                                              |
//! |----------------|------------------------|----------------------------------------------------------|
//! | 0x0000         | Flags                  | 4 bytes: 0x1 text present, 0x2 sound present, 0x4 sound length present |
//! | 0x0004         | Sound ResRef           | 16 bytes: zero padded resource name of the voice over    |
//! | 0x0014         | Volume variance        | 4 bytes: unused by the games                             |
//! | 0x0018         | Pitch variance         | 4 bytes: unused by the games                             |
//! | 0x001C         | Text offset            | 4 bytes: start of the text, relative to the text block   |
//! | 0x0020         | Text length            | 4 bytes: length of the text in bytes                     |
//! | 0x0024         | Sound length           | 4 bytes: float, length of the voice over in seconds      |
//!
//! The text block holds the raw string bytes back to back, under an encoding
//! the file does not record; callers pick one per game.
//!
//! ## GFF'd Table Structure
//!
//! The container layout (header, templates, data area, byte order) is
//! documented in [`aurora_gff4`]. Talk tables use the payload tag `"TLK "`
//! and address their fields by numeric label.
//!
//! ### V0.2 Fields
//!
//! | Label | Field       | Description                                        |
//! |-------|-------------|----------------------------------------------------|
//! | 19001 | String list | list of string structs on the top level struct     |
//! | 19002 | String ID   | uint32 string reference, 0xFFFFFFFF marks "absent" |
//! | 19003 | String      | the text itself, stored per entry                  |
//!
//! ### V0.4 / V0.5 Fields
//!
//! | Label | Field       | Description                                        |
//! |-------|-------------|----------------------------------------------------|
//! | 19007 | String list | list of string structs on the top level struct     |
//! | 19008 | Huffman tree| int32 list, the serialized decoding tree           |
//! | 19009 | Bitstream   | uint32 list, the packed bits of all strings        |
//! | 19010 | String ID   | uint32 string reference, 0xFFFFFFFF marks "absent" |
//! | 19011 | Bit offset  | uint32, absolute bit the entry's text starts at    |
//!
//! The two revisions share one layout; the Huffman coding itself is
//! documented in the [`huffman`] module.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.tlk`
//! - **Endianness**: plain row tables little endian; GFF'd tables follow the
//!   platform tag of their container
//!

pub mod error;
pub mod gff;
pub mod huffman;
pub mod read;
pub mod tlk;

pub use aurora_gff4::{ByteOrder, Encoding, FourCc};
pub use gff::GffTalkTable;
pub use read::{read_talk_table, StrRef, TalkTable};
pub use tlk::TlkTalkTable;
