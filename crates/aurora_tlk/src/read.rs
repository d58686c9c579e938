//! The talk table capability and format sniffing
//!

use std::fmt::Debug;
use std::io::{Read, Seek, SeekFrom};

use derive_more::derive::{Constructor, Display, From, Into};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use aurora_gff4::Encoding;

use crate::error::{Error, Result};
use crate::gff::GffTalkTable;
use crate::tlk::TlkTalkTable;

/// Shown in place of text whose bytes cannot be interpreted because the
/// table was opened without an encoding
pub(crate) const NO_ENCODING_TEXT: &str = "[???]";

/// A string reference, the 32 bit key of one localized text row
///
/// The all ones value is reserved as a sentinel for "no string".
#[derive(
    Constructor, Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrRef(u32);

impl StrRef {
    /// Sentinel marking an absent string reference
    pub const INVALID: StrRef = StrRef(0xFFFF_FFFF);

    /// Whether this reference can name an entry
    pub fn is_valid(self) -> bool {
        self != StrRef::INVALID
    }
}

/// Capability interface of a loaded talk table
///
/// The members of the format family implement this independently; callers
/// pick a variant by file sniffing through [`read_talk_table`] rather than
/// through a type hierarchy.
///
/// Lookups are total: asking for a reference the table does not hold yields
/// an empty result, never an error. Text is decoded on the first lookup and
/// cached, so repeated lookups of one reference are cheap and always return
/// the same text.
pub trait TalkTable: Debug {
    /// Whether the table has an entry for `strref`
    fn has_entry(&self, strref: StrRef) -> bool;

    /// The text of `strref`, or `None` when the table has no such entry
    fn get(&self, strref: StrRef) -> Option<&str>;

    /// The text of `strref`, or an empty string when the table has no such
    /// entry
    fn string(&self, strref: StrRef) -> String {
        self.get(strref).map_or_else(String::new, str::to_owned)
    }

    /// Resource name of the sound linked to `strref`, if any
    fn sound_resref(&self, strref: StrRef) -> Option<String>;

    /// Numeric id of the sound linked to `strref`, if any
    fn sound_id(&self, strref: StrRef) -> Option<u32>;

    /// All string references present in the table, in no particular order
    fn str_refs(&self) -> Vec<StrRef>;

    /// Number of entries in the table
    fn len(&self) -> usize;

    /// Whether the table holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read a talk table, picking the format variant by its leading tag.
///
/// `"TLK "` selects the plain row table, `"GFF "` the GFF'd family. Anything
/// else fails with [`Error::InvalidFile`]. The encoding applies to stored
/// text; of the GFF'd family only V0.2 uses it, the Huffman'd revisions are
/// always UTF-16.
pub fn read_talk_table<R: Read + Seek>(
    mut reader: R,
    encoding: Option<Encoding>,
) -> Result<Box<dyn TalkTable>> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;

    match &magic {
        b"GFF " => Ok(Box::new(GffTalkTable::new(reader, encoding)?)),
        b"TLK " => Ok(Box::new(TlkTalkTable::new(reader, encoding)?)),
        _ => Err(Error::InvalidFile),
    }
}
