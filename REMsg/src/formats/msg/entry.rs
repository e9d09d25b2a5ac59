//! Message entries and their on-disk head layout
//!
//! Reading is staged: [`EntryHead`] and [`RawAttribute`] hold unresolved pool
//! offsets until the string pool at the end of the file has been decoded, and
//! only then is a [`MsgEntry`] assembled.

use super::attribute::{AttributeHeader, AttributeValue, ValueType};
use super::writer::{Anchor, LayoutWriter};
use crate::error::Result;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::Read;
use uuid::Uuid;

/// How an entry identifies itself in the head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryIdentity {
    /// Name hash, used from version 16 on
    Hash(u32),
    /// Position in the entry list, used by older versions
    Index(i32),
}

impl EntryIdentity {
    /// Raw head field
    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::Hash(hash) => hash as i32,
            Self::Index(index) => index,
        }
    }
}

impl fmt::Display for EntryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(hash) => write!(f, "hash {hash:#010x}"),
            Self::Index(index) => write!(f, "index {index}"),
        }
    }
}

/// One message: a name, one string per language and a row of attribute values
#[derive(Debug, Clone, PartialEq)]
pub struct MsgEntry {
    pub guid: Uuid,
    /// Copied through untouched
    pub crc: u32,
    pub identity: EntryIdentity,
    pub name: String,
    /// One string per document language, in language list order
    pub contents: Vec<String>,
    /// One value per attribute header, in header order
    pub attributes: Vec<AttributeValue>,
}

impl MsgEntry {
    /// Content for the language stored at `index` of the document's language list
    #[must_use]
    pub fn content(&self, index: usize) -> Option<&str> {
        self.contents.get(index).map(String::as_str)
    }

    /// Attribute value by header name
    #[must_use]
    pub fn attribute<'a>(
        &'a self,
        headers: &[AttributeHeader],
        name: &str,
    ) -> Option<&'a AttributeValue> {
        headers
            .iter()
            .position(|h| h.name == name)
            .and_then(|i| self.attributes.get(i))
    }

    /// Emit the fixed-size head, leaving placeholders for every offset
    pub(crate) fn write_head<'a>(
        &'a self,
        out: &mut LayoutWriter<'a>,
        index: usize,
        identity: EntryIdentity,
    ) -> Result<()> {
        out.mark(Anchor::EntryHead(index));
        out.write_bytes(&self.guid.to_bytes_le());
        out.write_u32(self.crc)?;
        out.write_i32(identity.raw())?;
        out.string_placeholder(&self.name)?;
        out.anchor_placeholder(Anchor::EntryAttributes(index))?;
        for content in &self.contents {
            out.string_placeholder(content)?;
        }
        Ok(())
    }

    /// Emit the attribute block; values must already be checked against `headers`
    pub(crate) fn write_attributes<'a>(
        &'a self,
        out: &mut LayoutWriter<'a>,
        index: usize,
    ) -> Result<()> {
        out.mark(Anchor::EntryAttributes(index));
        for value in &self.attributes {
            match value {
                AttributeValue::Int64(v) => out.write_i64(*v)?,
                AttributeValue::Double(v) => out.write_f64(*v)?,
                AttributeValue::String(s) => out.string_placeholder(s)?,
            }
        }
        Ok(())
    }
}

/// Entry head as stored, offsets still absolute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHead {
    pub guid: Uuid,
    pub crc: u32,
    pub identity: EntryIdentity,
    pub name_offset: u64,
    pub attribute_offset: u64,
    pub content_offsets: Vec<u64>,
}

impl EntryHead {
    /// Read a head with `language_count` content offsets
    pub fn read<R: Read>(
        reader: &mut R,
        language_count: usize,
        hash_identity: bool,
    ) -> Result<Self> {
        let mut guid = [0u8; 16];
        reader.read_exact(&mut guid)?;
        let crc = reader.read_u32::<LittleEndian>()?;
        let raw_identity = reader.read_i32::<LittleEndian>()?;
        let identity = if hash_identity {
            EntryIdentity::Hash(raw_identity as u32)
        } else {
            EntryIdentity::Index(raw_identity)
        };
        let name_offset = reader.read_u64::<LittleEndian>()?;
        let attribute_offset = reader.read_u64::<LittleEndian>()?;
        let content_offsets = (0..language_count)
            .map(|_| reader.read_u64::<LittleEndian>())
            .collect::<std::io::Result<Vec<_>>>()?;

        Ok(Self {
            guid: Uuid::from_bytes_le(guid),
            crc,
            identity,
            name_offset,
            attribute_offset,
            content_offsets,
        })
    }
}

/// An attribute slot before string resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawAttribute {
    Int64(i64),
    Double(f64),
    /// Absolute offset of a pool string
    PoolOffset(u64),
}

/// Read one 8-byte slot per header
pub fn read_attributes<R: Read>(
    reader: &mut R,
    headers: &[AttributeHeader],
) -> Result<Vec<RawAttribute>> {
    headers
        .iter()
        .map(|header| {
            Ok(match header.value_type {
                ValueType::Int64 => RawAttribute::Int64(reader.read_i64::<LittleEndian>()?),
                ValueType::Double => RawAttribute::Double(reader.read_f64::<LittleEndian>()?),
                ValueType::Null | ValueType::Wstring => {
                    RawAttribute::PoolOffset(reader.read_u64::<LittleEndian>()?)
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Cursor;

    fn head_bytes(identity: i32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&[
            0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
            0xEE, 0xFF,
        ]);
        data.write_u32::<LittleEndian>(0xDEAD_BEEF).unwrap();
        data.write_i32::<LittleEndian>(identity).unwrap();
        data.write_u64::<LittleEndian>(100).unwrap();
        data.write_u64::<LittleEndian>(200).unwrap();
        data.write_u64::<LittleEndian>(300).unwrap();
        data.write_u64::<LittleEndian>(308).unwrap();
        data
    }

    #[test]
    fn test_read_head_mixed_endian_guid() {
        let data = head_bytes(3);
        let head = EntryHead::read(&mut Cursor::new(&data), 2, false).unwrap();
        assert_eq!(
            head.guid.to_string(),
            "00112233-4455-6677-8899-aabbccddeeff"
        );
        assert_eq!(head.crc, 0xDEAD_BEEF);
        assert_eq!(head.identity, EntryIdentity::Index(3));
        assert_eq!(head.name_offset, 100);
        assert_eq!(head.attribute_offset, 200);
        assert_eq!(head.content_offsets, vec![300, 308]);
    }

    #[test]
    fn test_read_head_hash_identity() {
        let data = head_bytes(-1);
        let head = EntryHead::read(&mut Cursor::new(&data), 2, true).unwrap();
        assert_eq!(head.identity, EntryIdentity::Hash(0xFFFF_FFFF));
        assert_eq!(head.identity.raw(), -1);
    }

    #[test]
    fn test_read_head_truncated() {
        let data = head_bytes(0);
        let err = EntryHead::read(&mut Cursor::new(&data), 3, false).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn test_read_attribute_slots() {
        let headers = vec![
            AttributeHeader::new("a", ValueType::Int64),
            AttributeHeader::new("b", ValueType::Double),
            AttributeHeader::new("c", ValueType::Wstring),
            AttributeHeader::new("", ValueType::Null),
        ];
        let mut data = Vec::new();
        data.write_i64::<LittleEndian>(-7).unwrap();
        data.write_f64::<LittleEndian>(1.5).unwrap();
        data.write_u64::<LittleEndian>(512).unwrap();
        data.write_u64::<LittleEndian>(400).unwrap();

        let raw = read_attributes(&mut Cursor::new(&data), &headers).unwrap();
        assert_eq!(
            raw,
            vec![
                RawAttribute::Int64(-7),
                RawAttribute::Double(1.5),
                RawAttribute::PoolOffset(512),
                RawAttribute::PoolOffset(400),
            ]
        );
    }
}
