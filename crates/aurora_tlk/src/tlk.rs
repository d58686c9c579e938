//! The plain row talk table
//!

use std::fmt::{self, Debug};
use std::io::{Cursor, Read};
use std::sync::OnceLock;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, warn};

use aurora_gff4::{decode_bytes, Encoding, FourCc};

use crate::error::{Error, Result};
use crate::read::{StrRef, TalkTable, NO_ENCODING_TEXT};

/// The row has text in the text block
const FLAG_TEXT_PRESENT: u32 = 0x1;

/// The row is linked to a voice over sound resource
const FLAG_SOUND_PRESENT: u32 = 0x2;

/// The sound length field of the row is meaningful
const FLAG_SOUND_LENGTH_PRESENT: u32 = 0x4;

/// One row of the entry table
///
/// Rows keep their slice coordinates into the text block; the text itself is
/// decoded on the first lookup.
struct Row {
    flags: u32,
    sound_resref: String,
    offset: u32,
    length: u32,
    sound_length: f32,
    text: OnceLock<String>,
}

/// Plain row talk table reader
///
/// This is the `"TLK "`/`"V3.0"` member of the family: a fixed size entry
/// table in front of one raw text block, where a string reference is simply
/// the ordinal of its row. Rows carry their own sound linkage, so unlike the
/// GFF'd family [`sound_resref`](TalkTable::sound_resref) yields real values.
///
/// The whole file is little endian.
pub struct TlkTalkTable {
    encoding: Option<Encoding>,
    language_id: u32,
    rows: Vec<Row>,
    text: Vec<u8>,
}

impl Debug for TlkTalkTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "TlkTalkTable(language {}, {} rows, ",
            self.language_id,
            self.rows.len()
        )?;
        match self.encoding {
            Some(encoding) => write!(f, "{encoding:?})"),
            None => write!(f, "no encoding)"),
        }
    }
}

impl TlkTalkTable {
    /// Read a plain row talk table, decoding text under `encoding`.
    #[tracing::instrument(skip(reader))]
    pub fn new<R: Read>(mut reader: R, encoding: Option<Encoding>) -> Result<TlkTalkTable> {
        let mut file = Vec::new();
        reader.read_to_end(&mut file)?;

        Self::from_bytes(file, encoding)
    }

    fn from_bytes(file: Vec<u8>, encoding: Option<Encoding>) -> Result<TlkTalkTable> {
        let mut cursor = Cursor::new(file.as_slice());

        let mut magic = [0u8; 4];
        cursor.read_exact(&mut magic)?;
        if &magic != b"TLK " {
            return Err(Error::InvalidFile);
        }

        let mut version = [0u8; 4];
        cursor.read_exact(&mut version)?;
        if &version != b"V3.0" {
            return Err(Error::UnsupportedVersion(FourCc(version)));
        }

        let language_id = cursor.read_u32::<LittleEndian>()?;
        let count = cursor.read_u32::<LittleEndian>()?;
        let strings_offset = cursor.read_u32::<LittleEndian>()?;

        if u64::from(strings_offset) > file.len() as u64 {
            return Err(Error::Truncated {
                offset: u64::from(strings_offset),
                size: file.len() as u64,
            });
        }

        // The 40 byte rows sit between the 20 byte header and the text block.
        let rows_end = 20 + u64::from(count) * 40;
        if rows_end > u64::from(strings_offset) {
            return Err(Error::Truncated {
                offset: rows_end,
                size: u64::from(strings_offset),
            });
        }

        let mut rows = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let flags = cursor.read_u32::<LittleEndian>()?;

            let mut resref = [0u8; 16];
            cursor.read_exact(&mut resref)?;
            let end = resref.iter().position(|&b| b == 0).unwrap_or(resref.len());
            let sound_resref = String::from_utf8_lossy(&resref[..end]).into_owned();

            // Volume and pitch variance, unused by the games
            let _ = cursor.read_u32::<LittleEndian>()?;
            let _ = cursor.read_u32::<LittleEndian>()?;

            let offset = cursor.read_u32::<LittleEndian>()?;
            let length = cursor.read_u32::<LittleEndian>()?;
            let sound_length = cursor.read_f32::<LittleEndian>()?;

            rows.push(Row {
                flags,
                sound_resref,
                offset,
                length,
                sound_length,
                text: OnceLock::new(),
            });
        }

        let text = file[strings_offset as usize..].to_vec();

        debug!(language_id, rows = rows.len(), "loaded TLK talk table");

        Ok(TlkTalkTable {
            encoding,
            language_id,
            rows,
            text,
        })
    }

    /// Numeric id of the language the table holds text for
    pub fn language_id(&self) -> u32 {
        self.language_id
    }

    /// The encoding the table was opened with
    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    /// Length in seconds of the sound linked to `strref`, if recorded
    pub fn sound_length(&self, strref: StrRef) -> Option<f32> {
        let row = self.row(strref)?;

        (row.flags & FLAG_SOUND_LENGTH_PRESENT != 0).then_some(row.sound_length)
    }

    fn row(&self, strref: StrRef) -> Option<&Row> {
        self.rows.get(u32::from(strref) as usize)
    }

    /// The cached text of a row, decoding it on the first call.
    fn text<'a>(&'a self, row: &'a Row) -> &'a str {
        row.text.get_or_init(|| self.resolve(row))
    }

    fn resolve(&self, row: &Row) -> String {
        if row.flags & FLAG_TEXT_PRESENT == 0 || row.length == 0 {
            return String::new();
        }

        let Some(encoding) = self.encoding else {
            return NO_ENCODING_TEXT.to_owned();
        };

        let end = u64::from(row.offset) + u64::from(row.length);
        if end > self.text.len() as u64 {
            warn!(
                offset = row.offset,
                length = row.length,
                "string row lies outside the text block"
            );
            return String::new();
        }

        decode_bytes(&self.text[row.offset as usize..end as usize], encoding)
    }
}

impl TalkTable for TlkTalkTable {
    fn has_entry(&self, strref: StrRef) -> bool {
        self.row(strref).is_some()
    }

    fn get(&self, strref: StrRef) -> Option<&str> {
        self.row(strref).map(|row| self.text(row))
    }

    fn sound_resref(&self, strref: StrRef) -> Option<String> {
        let row = self.row(strref)?;
        if row.flags & FLAG_SOUND_PRESENT == 0 || row.sound_resref.is_empty() {
            return None;
        }

        Some(row.sound_resref.clone())
    }

    /// V3.0 rows link sounds by name, numeric sound ids only exist in later
    /// family members.
    fn sound_id(&self, _strref: StrRef) -> Option<u32> {
        None
    }

    fn str_refs(&self) -> Vec<StrRef> {
        (0..self.rows.len() as u32).map(StrRef::new).collect()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}
