//! Base types for the structure of GFF containers.

use std::fmt;

use binrw::BinRead;
use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

/// Container version tag for GFF V4.0 files
pub const GFF_VERSION_40: FourCc = FourCc::new(b"V4.0");

/// Container version tag for GFF V4.1 files
pub const GFF_VERSION_41: FourCc = FourCc::new(b"V4.1");

/// Marks a field template as a list of its element type
pub const FIELD_FLAG_LIST: u32 = 0x8000_0000;

/// Marks a field template as holding a nested struct
pub const FIELD_FLAG_STRUCT: u32 = 0x4000_0000;

/// Marks a field template as an indirect reference into the data area
pub const FIELD_FLAG_REFERENCE: u32 = 0x2000_0000;

/// A four character code tag
///
/// GFF containers identify themselves, their payload type and their version
/// with human readable four byte tags such as `"GFF "`, `"TLK "` or `"V4.0"`.
#[derive(BinRead, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    /// Build a tag from a four byte string literal.
    pub const fn new(tag: &[u8; 4]) -> FourCc {
        FourCc(*tag)
    }

    /// Get the raw bytes of the tag
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| (0x20..0x7F).contains(b)) {
            for b in self.0 {
                write!(f, "{}", char::from(b))?;
            }
            Ok(())
        } else {
            write!(f, "{:#010X}", u32::from_be_bytes(self.0))
        }
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc(\"{self}\")")
    }
}

/// Byte order of the data area of a container
///
/// Header and template blocks are always little endian, but the data area
/// follows the byte order of the platform the file was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Read a `u16` from the start of `buf`
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            ByteOrder::Little => LittleEndian::read_u16(buf),
            ByteOrder::Big => BigEndian::read_u16(buf),
        }
    }

    /// Read a `u32` from the start of `buf`
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            ByteOrder::Little => LittleEndian::read_u32(buf),
            ByteOrder::Big => BigEndian::read_u32(buf),
        }
    }

    /// Read a `u64` from the start of `buf`
    pub fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            ByteOrder::Little => LittleEndian::read_u64(buf),
            ByteOrder::Big => BigEndian::read_u64(buf),
        }
    }

    /// Fill `dst` with `u16` values read from `src`
    ///
    /// `src` must be exactly twice as long as `dst`.
    pub fn read_u16_into(self, src: &[u8], dst: &mut [u16]) {
        match self {
            ByteOrder::Little => LittleEndian::read_u16_into(src, dst),
            ByteOrder::Big => BigEndian::read_u16_into(src, dst),
        }
    }

    /// Fill `dst` with `u32` values read from `src`
    ///
    /// `src` must be exactly four times as long as `dst`.
    pub fn read_u32_into(self, src: &[u8], dst: &mut [u32]) {
        match self {
            ByteOrder::Little => LittleEndian::read_u32_into(src, dst),
            ByteOrder::Big => BigEndian::read_u32_into(src, dst),
        }
    }

    /// Fill `dst` with `i32` values read from `src`
    ///
    /// `src` must be exactly four times as long as `dst`.
    pub fn read_i32_into(self, src: &[u8], dst: &mut [i32]) {
        match self {
            ByteOrder::Little => LittleEndian::read_i32_into(src, dst),
            ByteOrder::Big => BigEndian::read_i32_into(src, dst),
        }
    }
}

/// GFF container header
///
/// Every container starts with the magic `"GFF "` followed by version and
/// platform tags. V4.1 headers carry two extra fields for a shared string
/// table which V4.0 headers lack.
#[derive(BinRead, Debug, Clone, Copy, PartialEq)]
#[br(little, magic = b"GFF ")]
pub struct Gff4Header {
    /// Container layout version, `"V4.0"` or `"V4.1"`
    pub version: FourCc,

    /// Tag of the platform the file was built for, e.g. `"PC  "`
    pub platform: FourCc,

    /// Tag of the payload stored in the container, e.g. `"TLK "`
    pub file_type: FourCc,

    /// Version of the payload format, independent of the container version
    pub type_version: FourCc,

    /// Number of struct templates following the header
    pub struct_count: u32,

    /// Number of entries in the shared string table (V4.1 only)
    #[br(if(version == GFF_VERSION_41))]
    pub string_count: Option<u32>,

    /// Offset of the shared string table (V4.1 only)
    #[br(if(version == GFF_VERSION_41))]
    pub string_offset: Option<u32>,

    /// Offset from the start of the file to the data area
    pub data_offset: u32,
}

impl Gff4Header {
    /// Byte order of the data area, derived from the platform tag.
    pub fn byte_order(&self) -> ByteOrder {
        match self.platform.as_bytes() {
            b"PS3 " | b"X360" => ByteOrder::Big,
            _ => ByteOrder::Little,
        }
    }
}

/// Struct template
///
/// Describes the layout of one struct shape used in the data area. All
/// instances of the struct share the field templates referenced here.
#[derive(BinRead, Debug, Clone, Copy, PartialEq)]
#[br(little)]
pub struct StructTemplate {
    /// Four character label of the struct shape
    pub label: FourCc,

    /// Number of field templates belonging to this struct
    pub field_count: u32,

    /// Offset from the start of the file to this struct's field templates
    pub field_offset: u32,

    /// Size in bytes of one instance of this struct in the data area
    pub size: u32,
}

/// Field template
///
/// Describes one field of a struct template: a numeric label, the field type
/// with its flag bits, and the offset of the field inside a struct instance.
#[derive(BinRead, Debug, Clone, Copy, PartialEq)]
#[br(little)]
pub struct FieldTemplate {
    /// Numeric label identifying the field
    pub label: u32,

    /// Field type in the low 16 bits, flags in the high bits
    pub type_and_flags: u32,

    /// Offset of the field inside a struct instance
    pub offset: u32,
}

impl FieldTemplate {
    /// The raw type id in the low 16 bits
    ///
    /// For struct fields this doubles as the index of the element's struct
    /// template.
    pub fn raw_type(&self) -> u16 {
        (self.type_and_flags & 0xFFFF) as u16
    }

    /// Whether the field is a list of its element type
    pub fn is_list(&self) -> bool {
        self.type_and_flags & FIELD_FLAG_LIST != 0
    }

    /// Whether the field holds a struct
    pub fn is_struct(&self) -> bool {
        self.type_and_flags & FIELD_FLAG_STRUCT != 0
    }

    /// Whether the field is an indirect reference into the data area
    pub fn is_reference(&self) -> bool {
        self.type_and_flags & FIELD_FLAG_REFERENCE != 0
    }
}

/// Scalar field types understood by this reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Uint8,
    Sint8,
    Uint16,
    Sint16,
    Uint32,
    Sint32,
    Uint64,
    Sint64,
    Float32,
    Float64,
    String,
}

impl FieldType {
    /// Map a raw type id to a known field type.
    pub fn from_raw(raw: u16) -> Option<FieldType> {
        match raw {
            0 => Some(FieldType::Uint8),
            1 => Some(FieldType::Sint8),
            2 => Some(FieldType::Uint16),
            3 => Some(FieldType::Sint16),
            4 => Some(FieldType::Uint32),
            5 => Some(FieldType::Sint32),
            6 => Some(FieldType::Uint64),
            7 => Some(FieldType::Sint64),
            8 => Some(FieldType::Float32),
            9 => Some(FieldType::Float64),
            14 => Some(FieldType::String),
            _ => None,
        }
    }

    /// Size in bytes of one element of this type in the data area
    ///
    /// Strings are stored indirectly and have no inline scalar size.
    pub fn scalar_size(self) -> Option<u64> {
        match self {
            FieldType::Uint8 | FieldType::Sint8 => Some(1),
            FieldType::Uint16 | FieldType::Sint16 => Some(2),
            FieldType::Uint32 | FieldType::Sint32 | FieldType::Float32 => Some(4),
            FieldType::Uint64 | FieldType::Sint64 | FieldType::Float64 => Some(8),
            FieldType::String => None,
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{ByteOrder, FieldTemplate, FieldType, FourCc, Gff4Header, StructTemplate};

    #[test]
    fn read_v40_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x47, 0x46, 0x46, 0x20,
            0x56, 0x34, 0x2E, 0x30,
            0x50, 0x43, 0x20, 0x20,
            0x54, 0x4C, 0x4B, 0x20,
            0x56, 0x30, 0x2E, 0x35,
            0x02, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00,
        ]);

        let expected = Gff4Header {
            version: FourCc::new(b"V4.0"),
            platform: FourCc::new(b"PC  "),
            file_type: FourCc::new(b"TLK "),
            type_version: FourCc::new(b"V0.5"),
            struct_count: 2,
            string_count: None,
            string_offset: None,
            data_offset: 0x38,
        };

        assert_eq!(Gff4Header::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_v41_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x47, 0x46, 0x46, 0x20,
            0x56, 0x34, 0x2E, 0x31,
            0x50, 0x43, 0x20, 0x20,
            0x54, 0x4C, 0x4B, 0x20,
            0x56, 0x30, 0x2E, 0x32,
            0x01, 0x00, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00,
            0x80, 0x00, 0x00, 0x00,
            0x40, 0x00, 0x00, 0x00,
        ]);

        let expected = Gff4Header {
            version: FourCc::new(b"V4.1"),
            platform: FourCc::new(b"PC  "),
            file_type: FourCc::new(b"TLK "),
            type_version: FourCc::new(b"V0.2"),
            struct_count: 1,
            string_count: Some(16),
            string_offset: Some(0x80),
            data_offset: 0x40,
        };

        assert_eq!(Gff4Header::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_invalid_magic() {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x54, 0x4C, 0x4B, 0x20,
            0x56, 0x34, 0x2E, 0x30,
            0x50, 0x43, 0x20, 0x20,
            0x54, 0x4C, 0x4B, 0x20,
            0x56, 0x30, 0x2E, 0x35,
            0x02, 0x00, 0x00, 0x00,
            0x38, 0x00, 0x00, 0x00,
        ]);

        assert!(Gff4Header::read(&mut input).is_err());
    }

    #[test]
    fn read_struct_template() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x53, 0x54, 0x52, 0x4E,
            0x02, 0x00, 0x00, 0x00,
            0x2C, 0x00, 0x00, 0x00,
            0x08, 0x00, 0x00, 0x00,
        ]);

        let expected = StructTemplate {
            label: FourCc::new(b"STRN"),
            field_count: 2,
            field_offset: 0x2C,
            size: 8,
        };

        assert_eq!(StructTemplate::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn field_template_flags() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x3F, 0x4A, 0x00, 0x00,
            0x01, 0x00, 0x00, 0xC0,
            0x00, 0x00, 0x00, 0x00,
        ]);

        let field = FieldTemplate::read(&mut input)?;

        assert_eq!(field.label, 19007);
        assert!(field.is_list());
        assert!(field.is_struct());
        assert!(!field.is_reference());
        assert_eq!(field.raw_type(), 1);

        Ok(())
    }

    #[test]
    fn field_type_from_raw() {
        assert_eq!(FieldType::from_raw(4), Some(FieldType::Uint32));
        assert_eq!(FieldType::from_raw(14), Some(FieldType::String));
        assert_eq!(FieldType::from_raw(16), None);
        assert_eq!(FieldType::from_raw(0xFFFE), None);
    }

    #[test]
    fn fourcc_display() {
        assert_eq!(FourCc::new(b"TLK ").to_string(), "TLK ");
        assert_eq!(FourCc::new(b"V4.0").to_string(), "V4.0");
        assert_eq!(FourCc(*b"\x01\x02\x03\x04").to_string(), "0x01020304");
    }

    #[test]
    fn platform_byte_order() {
        let mut header = Gff4Header {
            version: FourCc::new(b"V4.0"),
            platform: FourCc::new(b"PC  "),
            file_type: FourCc::new(b"TLK "),
            type_version: FourCc::new(b"V0.5"),
            struct_count: 0,
            string_count: None,
            string_offset: None,
            data_offset: 0,
        };
        assert_eq!(header.byte_order(), ByteOrder::Little);

        header.platform = FourCc::new(b"PS3 ");
        assert_eq!(header.byte_order(), ByteOrder::Big);

        header.platform = FourCc::new(b"X360");
        assert_eq!(header.byte_order(), ByteOrder::Big);
    }

    #[test]
    fn byte_order_reads() {
        let bytes = [0x01, 0x02, 0x03, 0x04];

        assert_eq!(ByteOrder::Little.read_u32(&bytes), 0x04030201);
        assert_eq!(ByteOrder::Big.read_u32(&bytes), 0x01020304);
        assert_eq!(ByteOrder::Little.read_u16(&bytes), 0x0201);
        assert_eq!(ByteOrder::Big.read_u16(&bytes), 0x0102);

        let mut words = [0i32; 1];
        ByteOrder::Little.read_i32_into(&[0xBE, 0xFF, 0xFF, 0xFF], &mut words);
        assert_eq!(words[0], -66);

        ByteOrder::Big.read_i32_into(&[0xFF, 0xFF, 0xFF, 0xBE], &mut words);
        assert_eq!(words[0], -66);
    }
}
