//! The GFF'd talk table family
//!

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::io::Read;
use std::sync::OnceLock;

use tracing::{debug, warn};

use aurora_gff4::{Encoding, FourCc, Gff4File, Gff4Struct, Gff4StructRef};

use crate::error::{Error, Result};
use crate::huffman::{decode_string, BitStream, HuffTree};
use crate::read::{StrRef, TalkTable, NO_ENCODING_TEXT};

/// Payload tag of talk table containers
const TLK_ID: FourCc = FourCc::new(b"TLK ");

/// The flat revision, one text field per entry
const VERSION_02: FourCc = FourCc::new(b"V0.2");

/// The first Huffman'd revision
const VERSION_04: FourCc = FourCc::new(b"V0.4");

/// The second Huffman'd revision, same layout as V0.4
const VERSION_05: FourCc = FourCc::new(b"V0.5");

// Field labels of the V0.2 schema
const FIELD_STRING_LIST: u32 = 19001;
const FIELD_STRING_ID: u32 = 19002;
const FIELD_STRING: u32 = 19003;

// Field labels of the V0.4/V0.5 schema
const FIELD_HUFF_STRING_LIST: u32 = 19007;
const FIELD_HUFF_TREE: u32 = 19008;
const FIELD_HUFF_BIT_STREAM: u32 = 19009;
const FIELD_HUFF_STRING_ID: u32 = 19010;
const FIELD_HUFF_BIT_OFFSET: u32 = 19011;

/// One talk table entry
///
/// Fresh entries only hold a handle to their struct instance. The text cell
/// is set on the first lookup and the handle is never read again after that.
struct Entry {
    strct: Gff4StructRef,
    text: OnceLock<String>,
}

impl Entry {
    fn new(strct: Gff4StructRef) -> Entry {
        Entry {
            strct,
            text: OnceLock::new(),
        }
    }
}

/// GFF'd talk table reader
///
/// Entries are collected at load time, their text is decoded lazily on the
/// first lookup and cached for the lifetime of the table. The cache cells are
/// write once, so a table can be shared between threads and concurrent first
/// lookups of one entry settle on the same text.
///
/// ```no_run
/// use std::io::prelude::*;
///
/// use aurora_tlk::TalkTable;
///
/// fn print_greeting(reader: impl Read) -> aurora_tlk::error::Result<()> {
///     let tlk = aurora_tlk::GffTalkTable::new(reader, None)?;
///
///     println!("{}", tlk.string(aurora_tlk::StrRef::new(5)));
///
///     Ok(())
/// }
/// ```
pub struct GffTalkTable {
    gff: Gff4File,
    encoding: Option<Encoding>,
    version: FourCc,
    entries: HashMap<StrRef, Entry>,
    blobs: OnceLock<Option<(HuffTree, BitStream)>>,
}

impl Debug for GffTalkTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "GffTalkTable({}, {} entries, ",
            self.version,
            self.entries.len()
        )?;
        match self.encoding {
            Some(encoding) => write!(f, "{encoding:?})"),
            None => write!(f, "no encoding)"),
        }
    }
}

impl GffTalkTable {
    /// Read a GFF'd talk table.
    ///
    /// The encoding is used for the stored text of the flat V0.2 revision;
    /// the Huffman'd revisions always decode to UTF-16 and ignore it.
    #[tracing::instrument(skip(reader))]
    pub fn new<R: Read>(reader: R, encoding: Option<Encoding>) -> Result<GffTalkTable> {
        let gff = Gff4File::new(reader, TLK_ID)?;
        let version = gff.type_version();

        let mut entries = HashMap::new();
        let top = gff.top_level();

        match version {
            VERSION_02 => {
                if top.has_field(FIELD_STRING_LIST) {
                    populate(top, FIELD_STRING_LIST, FIELD_STRING_ID, &mut entries)?;
                } else {
                    warn!(
                        label = FIELD_STRING_LIST,
                        "talk table has no string list, no strings loaded"
                    );
                }
            }
            VERSION_04 | VERSION_05 => {
                let missing = [FIELD_HUFF_STRING_LIST, FIELD_HUFF_TREE, FIELD_HUFF_BIT_STREAM]
                    .into_iter()
                    .find(|&label| !top.has_field(label));

                match missing {
                    None => {
                        populate(top, FIELD_HUFF_STRING_LIST, FIELD_HUFF_STRING_ID, &mut entries)?
                    }
                    Some(label) => {
                        warn!(label, "talk table is missing a Huffman field, no strings loaded")
                    }
                }
            }
            version => return Err(Error::UnsupportedVersion(version)),
        }

        debug!(version = %version, entries = entries.len(), "loaded GFF talk table");

        Ok(GffTalkTable {
            gff,
            encoding,
            version,
            entries,
            blobs: OnceLock::new(),
        })
    }

    /// Version tag of the table, one of `"V0.2"`, `"V0.4"` or `"V0.5"`
    pub fn version(&self) -> FourCc {
        self.version
    }

    /// The encoding the table was opened with
    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    /// The cached text of an entry, decoding it on the first call.
    fn text<'a>(&'a self, entry: &'a Entry) -> &'a str {
        entry.text.get_or_init(|| self.resolve(entry))
    }

    fn resolve(&self, entry: &Entry) -> String {
        // The version was validated by the constructor and never changes.
        if self.version == VERSION_02 {
            self.resolve_flat(entry)
        } else {
            self.resolve_huffman(entry)
        }
    }

    fn resolve_flat(&self, entry: &Entry) -> String {
        let Some(encoding) = self.encoding else {
            return NO_ENCODING_TEXT.to_owned();
        };

        match self
            .gff
            .structure(entry.strct)
            .and_then(|strct| strct.string(FIELD_STRING, encoding))
        {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "unable to read a talk table string");
                String::new()
            }
        }
    }

    fn resolve_huffman(&self, entry: &Entry) -> String {
        let Some((tree, bits)) = self.huffman_blobs() else {
            return String::new();
        };

        let offset = self
            .gff
            .structure(entry.strct)
            .and_then(|strct| strct.uint(FIELD_HUFF_BIT_OFFSET, 0));

        let offset = match offset {
            Ok(offset) => offset as u32,
            Err(error) => {
                warn!(%error, "unable to read the bit offset of a talk table entry");
                return String::new();
            }
        };

        match decode_string(tree, bits, offset) {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, offset, "unable to decode a Huffman coded string");
                String::new()
            }
        }
    }

    /// The shared tree and bitstream, fetched and parsed once per table.
    fn huffman_blobs(&self) -> Option<&(HuffTree, BitStream)> {
        self.blobs
            .get_or_init(|| {
                let byte_order = self.gff.byte_order();
                let top = self.gff.top_level();

                let fetch = |label: u32| match top.data(label) {
                    Ok(Some(data)) => Some(data),
                    Ok(None) => {
                        warn!(label, "talk table is missing a Huffman blob");
                        None
                    }
                    Err(error) => {
                        warn!(label, %error, "unable to read a Huffman blob");
                        None
                    }
                };

                let tree = HuffTree::new(&fetch(FIELD_HUFF_TREE)?, byte_order);
                let bits = BitStream::new(&fetch(FIELD_HUFF_BIT_STREAM)?, byte_order);

                Some((tree, bits))
            })
            .as_ref()
    }
}

impl TalkTable for GffTalkTable {
    fn has_entry(&self, strref: StrRef) -> bool {
        self.entries.contains_key(&strref)
    }

    fn get(&self, strref: StrRef) -> Option<&str> {
        self.entries.get(&strref).map(|entry| self.text(entry))
    }

    /// This family carries no audio linkage at all.
    fn sound_resref(&self, _strref: StrRef) -> Option<String> {
        None
    }

    fn sound_id(&self, _strref: StrRef) -> Option<u32> {
        None
    }

    fn str_refs(&self) -> Vec<StrRef> {
        self.entries.keys().copied().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Collect the pending entries of a string list.
///
/// List elements whose reference field is absent or holds the all ones
/// sentinel are skipped. A reference that shows up twice keeps its last
/// element, matching how the tables are patched in the wild.
fn populate(
    top: Gff4Struct<'_>,
    list_label: u32,
    id_label: u32,
    entries: &mut HashMap<StrRef, Entry>,
) -> Result<()> {
    for strct in top.list(list_label)? {
        let strref = StrRef::new(strct.uint(id_label, u64::from(u32::MAX))? as u32);
        if !strref.is_valid() {
            continue;
        }

        entries.insert(strref, Entry::new(strct.handle()));
    }

    Ok(())
}
