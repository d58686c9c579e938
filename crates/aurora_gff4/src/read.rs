//! Types for reading GFF containers
//!

use std::fmt::{self, Debug};
use std::io::{Cursor, Read};

use binrw::BinRead;
use tracing::debug;

use crate::{
    encoding::{decode_bytes, Encoding},
    error::{Error, Result},
    types::{
        ByteOrder, FieldTemplate, FieldType, FourCc, Gff4Header, StructTemplate, GFF_VERSION_40,
        GFF_VERSION_41,
    },
};

/// One struct template together with its field templates
#[derive(Debug)]
struct StructDef {
    template: StructTemplate,
    fields: Vec<FieldTemplate>,
}

/// GFF container reader
///
/// Parses the header and template blocks eagerly and keeps the data area in
/// memory. Struct instances are read lazily through [`Gff4Struct`] views.
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn dump_type(reader: impl Read) -> aurora_gff4::error::Result<()> {
///     let gff = aurora_gff4::Gff4File::new(reader, aurora_gff4::FourCc::new(b"TLK "))?;
///
///     println!("{} {}", gff.file_type(), gff.type_version());
///
///     Ok(())
/// }
/// ```
pub struct Gff4File {
    header: Gff4Header,
    byte_order: ByteOrder,
    structs: Vec<StructDef>,
    file: Vec<u8>,
    data_start: usize,
}

impl Debug for Gff4File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Gff4File({} {} in {}, {} structs, {} data bytes)",
            self.header.file_type,
            self.header.type_version,
            self.header.version,
            self.structs.len(),
            self.data().len()
        )
    }
}

impl Gff4File {
    /// Read a GFF container, requiring its payload to match `expected_type`.
    #[tracing::instrument(skip(reader))]
    pub fn new<R: Read>(mut reader: R, expected_type: FourCc) -> Result<Gff4File> {
        let mut file = Vec::new();
        reader.read_to_end(&mut file)?;

        Self::from_bytes(file, expected_type)
    }

    fn from_bytes(file: Vec<u8>, expected_type: FourCc) -> Result<Gff4File> {
        let size = file.len() as u64;

        // All offsets in the format are 32 bit
        if size > u64::from(u32::MAX) {
            return Err(Error::TooLarge { size });
        }

        let mut cursor = Cursor::new(&file);
        let header = match Gff4Header::read(&mut cursor) {
            Ok(header) => header,
            Err(binrw::Error::BadMagic { .. }) => return Err(Error::InvalidFile),
            Err(e) => return Err(e.into()),
        };

        if header.version != GFF_VERSION_40 && header.version != GFF_VERSION_41 {
            return Err(Error::UnsupportedVersion(header.version));
        }

        if header.file_type != expected_type {
            return Err(Error::WrongType {
                expected: expected_type,
                found: header.file_type,
            });
        }

        let data_start = u64::from(header.data_offset);
        if data_start > size {
            return Err(Error::TruncatedFile {
                offset: data_start,
                size,
            });
        }

        let template_base = cursor.position();
        let template_end = template_base + u64::from(header.struct_count) * 16;
        if template_end > size {
            return Err(Error::TruncatedFile {
                offset: template_end,
                size,
            });
        }

        let mut structs = Vec::with_capacity(header.struct_count as usize);
        for index in 0..header.struct_count {
            cursor.set_position(template_base + u64::from(index) * 16);
            let template = StructTemplate::read(&mut cursor)?;

            let field_end =
                u64::from(template.field_offset) + u64::from(template.field_count) * 12;
            if field_end > size {
                return Err(Error::TruncatedFile {
                    offset: field_end,
                    size,
                });
            }

            cursor.set_position(u64::from(template.field_offset));
            let mut fields = Vec::with_capacity(template.field_count as usize);
            for _ in 0..template.field_count {
                fields.push(FieldTemplate::read(&mut cursor)?);
            }

            structs.push(StructDef { template, fields });
        }

        if structs.is_empty() {
            return Err(Error::NoStructs);
        }

        let byte_order = header.byte_order();
        debug!(
            file_type = %header.file_type,
            type_version = %header.type_version,
            structs = structs.len(),
            ?byte_order,
            "parsed GFF container"
        );

        Ok(Gff4File {
            header,
            byte_order,
            structs,
            file,
            data_start: data_start as usize,
        })
    }

    /// Tag of the payload stored in this container
    pub fn file_type(&self) -> FourCc {
        self.header.file_type
    }

    /// Version tag of the payload format
    pub fn type_version(&self) -> FourCc {
        self.header.type_version
    }

    /// Tag of the platform this container was built for
    pub fn platform(&self) -> FourCc {
        self.header.platform
    }

    /// Byte order of the data area
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// The top level struct of the container
    ///
    /// Every container stores one instance of its first struct template at
    /// the start of the data area.
    pub fn top_level(&self) -> Gff4Struct<'_> {
        Gff4Struct {
            file: self,
            index: 0,
            offset: 0,
        }
    }

    /// Resolve a handle created with [`Gff4Struct::handle`].
    pub fn structure(&self, handle: Gff4StructRef) -> Result<Gff4Struct<'_>> {
        let index = handle.index as usize;
        if index >= self.structs.len() {
            return Err(Error::BadStructIndex {
                index,
                count: self.structs.len(),
            });
        }

        Ok(Gff4Struct {
            file: self,
            index,
            offset: handle.offset,
        })
    }

    fn data(&self) -> &[u8] {
        &self.file[self.data_start..]
    }
}

/// A plain handle to a struct instance
///
/// Unlike [`Gff4Struct`] this does not borrow the container, so it can be
/// stored and resolved later through [`Gff4File::structure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gff4StructRef {
    index: u32,
    offset: u32,
}

/// A view of one struct instance in the data area
#[derive(Debug, Clone, Copy)]
pub struct Gff4Struct<'a> {
    file: &'a Gff4File,
    index: usize,
    offset: u32,
}

impl<'a> Gff4Struct<'a> {
    /// Four character label of this struct's template
    pub fn label(&self) -> FourCc {
        self.def().template.label
    }

    /// A handle to this instance that does not borrow the container
    pub fn handle(&self) -> Gff4StructRef {
        Gff4StructRef {
            index: self.index as u32,
            offset: self.offset,
        }
    }

    /// Whether this struct has a field with the given label
    pub fn has_field(&self, label: u32) -> bool {
        self.field(label).is_some()
    }

    /// Read an integer field, returning `default` if the field is absent.
    ///
    /// Signed values are sign extended and reinterpreted as unsigned.
    pub fn uint(&self, label: u32, default: u64) -> Result<u64> {
        let Some(field) = self.field(label) else {
            return Ok(default);
        };

        if field.is_list() || field.is_struct() {
            return Err(Error::FieldTypeMismatch {
                label,
                expected: "an integer",
                found: field.raw_type(),
            });
        }

        let offset = self.slot_offset(field);
        match FieldType::from_raw(field.raw_type()) {
            Some(FieldType::Uint8) => Ok(u64::from(self.read_bytes(offset, 1)?[0])),
            Some(FieldType::Sint8) => Ok(self.read_bytes(offset, 1)?[0] as i8 as i64 as u64),
            Some(FieldType::Uint16) => Ok(u64::from(self.read_u16(offset)?)),
            Some(FieldType::Sint16) => Ok(self.read_u16(offset)? as i16 as i64 as u64),
            Some(FieldType::Uint32) => Ok(u64::from(self.read_u32(offset)?)),
            Some(FieldType::Sint32) => Ok(self.read_u32(offset)? as i32 as i64 as u64),
            Some(FieldType::Uint64 | FieldType::Sint64) => self.read_u64(offset),
            Some(_) => Err(Error::FieldTypeMismatch {
                label,
                expected: "an integer",
                found: field.raw_type(),
            }),
            None => Err(Error::UnknownFieldType {
                label,
                raw: field.raw_type(),
            }),
        }
    }

    /// Read a string field, returning an empty string if the field is absent.
    ///
    /// The field stores a reference into the data area, where the string is
    /// laid out as a code unit count followed by the raw code units.
    pub fn string(&self, label: u32, encoding: Encoding) -> Result<String> {
        let Some(field) = self.field(label) else {
            return Ok(String::new());
        };

        if field.is_list()
            || field.is_struct()
            || FieldType::from_raw(field.raw_type()) != Some(FieldType::String)
        {
            return Err(Error::FieldTypeMismatch {
                label,
                expected: "a string",
                found: field.raw_type(),
            });
        }

        let reference = u64::from(self.read_u32(self.slot_offset(field))?);
        let count = u64::from(self.read_u32(reference)?);
        let bytes = self.read_bytes(reference + 4, count * encoding.unit_size())?;

        Ok(decode_bytes(bytes, encoding))
    }

    /// Read a list of structs.
    ///
    /// The field stores a reference into the data area, where the list is
    /// laid out as an element count followed by the instances themselves.
    pub fn list(&self, label: u32) -> Result<Vec<Gff4Struct<'a>>> {
        let Some(field) = self.field(label) else {
            return Err(Error::MissingField {
                strct: self.label(),
                label,
            });
        };

        if !field.is_list() || !field.is_struct() {
            return Err(Error::FieldTypeMismatch {
                label,
                expected: "a struct list",
                found: field.raw_type(),
            });
        }

        let element = usize::from(field.raw_type());
        if element >= self.file.structs.len() {
            return Err(Error::BadStructIndex {
                index: element,
                count: self.file.structs.len(),
            });
        }

        let element_size = u64::from(self.file.structs[element].template.size);
        let reference = u64::from(self.read_u32(self.slot_offset(field))?);
        let count = u64::from(self.read_u32(reference)?);

        // Zero sized elements would all alias the same offset
        if element_size == 0 {
            return Ok(Vec::new());
        }

        // Bound the whole run before building any views
        self.read_bytes(reference + 4, count * element_size)?;

        let mut items = Vec::with_capacity(count as usize);
        for index in 0..count {
            items.push(Gff4Struct {
                file: self.file,
                index: element,
                offset: (reference + 4 + index * element_size) as u32,
            });
        }

        Ok(items)
    }

    /// Read the raw bytes of a scalar list field, `None` if the field is
    /// absent.
    ///
    /// The returned buffer holds the packed elements without the leading
    /// count, in the byte order of the data area.
    pub fn data(&self, label: u32) -> Result<Option<Vec<u8>>> {
        let Some(field) = self.field(label) else {
            return Ok(None);
        };

        if !field.is_list() || field.is_struct() {
            return Err(Error::FieldTypeMismatch {
                label,
                expected: "a scalar list",
                found: field.raw_type(),
            });
        }

        let element = match FieldType::from_raw(field.raw_type()) {
            Some(ty) => ty,
            None => {
                return Err(Error::UnknownFieldType {
                    label,
                    raw: field.raw_type(),
                })
            }
        };
        let Some(element_size) = element.scalar_size() else {
            return Err(Error::FieldTypeMismatch {
                label,
                expected: "a scalar list",
                found: field.raw_type(),
            });
        };

        let reference = u64::from(self.read_u32(self.slot_offset(field))?);
        let count = u64::from(self.read_u32(reference)?);
        let bytes = self.read_bytes(reference + 4, count * element_size)?;

        Ok(Some(bytes.to_vec()))
    }

    fn def(&self) -> &'a StructDef {
        &self.file.structs[self.index]
    }

    fn field(&self, label: u32) -> Option<&'a FieldTemplate> {
        self.def().fields.iter().find(|field| field.label == label)
    }

    fn slot_offset(&self, field: &FieldTemplate) -> u64 {
        u64::from(self.offset) + u64::from(field.offset)
    }

    fn read_bytes(&self, offset: u64, len: u64) -> Result<&'a [u8]> {
        let data = self.file.data();
        let size = data.len() as u64;

        let end = offset.saturating_add(len);
        if end > size {
            return Err(Error::OutOfBounds { offset, len, size });
        }

        Ok(&data[offset as usize..end as usize])
    }

    fn read_u16(&self, offset: u64) -> Result<u16> {
        Ok(self.file.byte_order.read_u16(self.read_bytes(offset, 2)?))
    }

    fn read_u32(&self, offset: u64) -> Result<u32> {
        Ok(self.file.byte_order.read_u32(self.read_bytes(offset, 4)?))
    }

    fn read_u64(&self, offset: u64) -> Result<u64> {
        Ok(self.file.byte_order.read_u64(self.read_bytes(offset, 8)?))
    }
}
