//! MSG file reading and parsing
//!
//! Every section offset stored in the header is checked against the position
//! where the section actually begins. Strings are resolved only after the pool
//! at the end of the file has been decoded.

use super::attribute::{AttributeHeader, AttributeValue, ValueType};
use super::document::MsgDocument;
use super::entry::{EntryHead, EntryIdentity, MsgEntry, RawAttribute, read_attributes};
use super::string_pool::StringPool;
use super::version::{ensure_supported, is_encrypted, is_hash_identity};
use super::{HEADER_OFFSET, MSG_MAGIC};
use crate::error::{Error, Result};
use crate::utils::{hash_name, is_known_language};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Read a .msg file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, plus any
/// [`parse_msg_bytes`] error.
pub fn read_msg<P: AsRef<Path>>(path: P) -> Result<MsgDocument> {
    let data = fs::read(path)?;
    parse_msg_bytes(&data)
}

/// Parse MSG data from bytes
///
/// # Errors
///
/// Returns [`Error::InvalidMsgMagic`] if the data is not a GMSG container,
/// [`Error::UnsupportedVersion`] for unknown revisions,
/// [`Error::FormatViolation`] if a section does not start where the header says,
/// [`Error::HashMismatch`] or [`Error::IndexMismatch`] for entries whose identity
/// does not match their name or position, and [`Error::Io`] for truncated data.
pub fn parse_msg_bytes(data: &[u8]) -> Result<MsgDocument> {
    let mut cursor = Cursor::new(data);

    // Header
    let version = cursor.read_i32::<LittleEndian>()?;
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if &magic != MSG_MAGIC {
        return Err(Error::InvalidMsgMagic(magic));
    }
    ensure_supported(version)?;
    let encrypted = is_encrypted(version);
    let hash_identity = is_hash_identity(version);

    let header_offset = cursor.read_u64::<LittleEndian>()?;
    if header_offset != HEADER_OFFSET {
        return Err(Error::FormatViolation {
            context: "header offset",
            expected: HEADER_OFFSET,
            actual: header_offset,
        });
    }

    let entry_count = read_count(&mut cursor, "entry count")?;
    let attribute_count = read_count(&mut cursor, "attribute count")?;
    let language_count = read_count(&mut cursor, "language count")?;
    skip_alignment(&mut cursor)?;

    let data_offset = if encrypted {
        Some(cursor.read_u64::<LittleEndian>()?)
    } else {
        None
    };
    let unknown_offset = cursor.read_u64::<LittleEndian>()?;
    let languages_offset = cursor.read_u64::<LittleEndian>()?;
    let attribute_types_offset = cursor.read_u64::<LittleEndian>()?;
    let attribute_names_offset = cursor.read_u64::<LittleEndian>()?;
    let entry_offsets = (0..entry_count)
        .map(|_| cursor.read_u64::<LittleEndian>())
        .collect::<std::io::Result<Vec<_>>>()?;

    tracing::debug!(
        "MSG v{version:#x}: {entry_count} entries, {attribute_count} attributes, {language_count} languages"
    );

    // Always a single zero u64
    expect_position(&cursor, unknown_offset, "unknown data offset")?;
    let unknown = cursor.read_u64::<LittleEndian>()?;
    if unknown != 0 {
        return Err(Error::FormatViolation {
            context: "unknown data",
            expected: 0,
            actual: unknown,
        });
    }

    expect_position(&cursor, languages_offset, "languages offset")?;
    let languages = (0..language_count)
        .map(|_| cursor.read_i32::<LittleEndian>())
        .collect::<std::io::Result<Vec<_>>>()?;
    check_languages(&languages);
    skip_alignment(&mut cursor)?;

    expect_position(&cursor, attribute_types_offset, "attribute types offset")?;
    let value_types = (0..attribute_count)
        .map(|_| ValueType::from_code(cursor.read_i32::<LittleEndian>()?))
        .collect::<Result<Vec<_>>>()?;
    skip_alignment(&mut cursor)?;

    expect_position(&cursor, attribute_names_offset, "attribute names offset")?;
    let attribute_name_offsets = (0..attribute_count)
        .map(|_| cursor.read_u64::<LittleEndian>())
        .collect::<std::io::Result<Vec<_>>>()?;

    // Pass 1: raw structure
    let heads = entry_offsets
        .iter()
        .map(|&offset| {
            expect_position(&cursor, offset, "entry head offset")?;
            EntryHead::read(&mut cursor, language_count, hash_identity)
        })
        .collect::<Result<Vec<_>>>()?;

    // Names are not known yet; an empty name is enough to read fixed-size slots
    let unnamed: Vec<AttributeHeader> = value_types
        .iter()
        .map(|&ty| AttributeHeader::new(String::new(), ty))
        .collect();
    let raw_attributes = heads
        .iter()
        .map(|head| {
            expect_position(&cursor, head.attribute_offset, "entry attribute offset")?;
            read_attributes(&mut cursor, &unnamed)
        })
        .collect::<Result<Vec<_>>>()?;

    // String pool runs to the end of the data
    let pool_start = cursor.position();
    let data_offset = match data_offset {
        Some(offset) => {
            expect_position(&cursor, offset, "string pool offset")?;
            offset
        }
        None => pool_start,
    };
    let blob = usize::try_from(data_offset)
        .ok()
        .and_then(|start| data.get(start..))
        .ok_or(Error::FormatViolation {
            context: "string pool offset",
            expected: data_offset,
            actual: data.len() as u64,
        })?;
    let pool = StringPool::from_bytes(blob, encrypted)?;
    let resolve = |offset: u64| -> Result<String> {
        let relative = offset
            .checked_sub(data_offset)
            .ok_or(Error::OffsetNotFound(offset))?;
        pool.find(relative).map(str::to_owned)
    };

    // Pass 2: resolve strings
    let attribute_headers = value_types
        .iter()
        .zip(&attribute_name_offsets)
        .map(|(&ty, &offset)| Ok(AttributeHeader::new(resolve(offset)?, ty)))
        .collect::<Result<Vec<_>>>()?;

    let mut entries = Vec::with_capacity(heads.len());
    for (index, (head, raw)) in heads.into_iter().zip(raw_attributes).enumerate() {
        let name = resolve(head.name_offset)?;
        check_identity(&name, index, head.identity)?;

        let contents = head
            .content_offsets
            .iter()
            .map(|&offset| resolve(offset))
            .collect::<Result<Vec<_>>>()?;

        let attributes = attribute_headers
            .iter()
            .zip(raw)
            .map(|(header, slot)| {
                Ok(match slot {
                    RawAttribute::Int64(v) => AttributeValue::Int64(v),
                    RawAttribute::Double(v) => AttributeValue::Double(v),
                    RawAttribute::PoolOffset(offset) => {
                        let value = resolve(offset)?;
                        if header.value_type == ValueType::Null && !value.is_empty() {
                            return Err(Error::NonEmptyNullAttribute {
                                entry: name.clone(),
                                value,
                            });
                        }
                        AttributeValue::String(value)
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        entries.push(MsgEntry {
            guid: head.guid,
            crc: head.crc,
            identity: head.identity,
            name,
            contents,
            attributes,
        });
    }

    Ok(MsgDocument::from_parts(
        version,
        languages,
        attribute_headers,
        entries,
        data.to_vec(),
    ))
}

fn read_count(cursor: &mut Cursor<&[u8]>, context: &'static str) -> Result<usize> {
    let value = cursor.read_i32::<LittleEndian>()?;
    usize::try_from(value).map_err(|_| Error::InvalidCount { context, value })
}

/// Skip to the next multiple of 8; padding content is not checked
fn skip_alignment(cursor: &mut Cursor<&[u8]>) -> Result<()> {
    let rem = cursor.position() % 8;
    if rem != 0 {
        cursor.seek(SeekFrom::Current((8 - rem) as i64))?;
    }
    Ok(())
}

fn expect_position(cursor: &Cursor<&[u8]>, expected: u64, context: &'static str) -> Result<()> {
    let actual = cursor.position();
    if actual == expected {
        Ok(())
    } else {
        Err(Error::FormatViolation {
            context,
            expected,
            actual,
        })
    }
}

fn check_identity(name: &str, index: usize, identity: EntryIdentity) -> Result<()> {
    match identity {
        EntryIdentity::Hash(stored) => {
            let computed = hash_name(name);
            if stored != computed {
                return Err(Error::HashMismatch {
                    name: name.to_owned(),
                    expected: stored,
                    actual: computed,
                });
            }
        }
        EntryIdentity::Index(stored) => {
            if usize::try_from(stored).ok() != Some(index) {
                return Err(Error::IndexMismatch {
                    name: name.to_owned(),
                    expected: index as i32,
                    actual: stored,
                });
            }
        }
    }
    Ok(())
}

/// Unknown ids or a list that is not `0, 1, 2, ...` are tolerated
fn check_languages(languages: &[i32]) {
    let identity_prefix = languages
        .iter()
        .enumerate()
        .all(|(i, &id)| is_known_language(id) && usize::try_from(id).ok() == Some(i));
    if !identity_prefix {
        tracing::warn!(
            "Unexpected language list {:?}; contents are indexed by list position",
            languages
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::msg::serialize_msg;
    use crate::formats::msg::version::VERSION_LEGACY_MARKER;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn sample_entry(name: &str, identity: EntryIdentity) -> MsgEntry {
        MsgEntry {
            guid: Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff),
            crc: 42,
            identity,
            name: name.to_owned(),
            contents: vec!["こんにちは".into(), "Hello".into()],
            attributes: vec![
                AttributeValue::String(String::new()),
                AttributeValue::Int64(-3),
                AttributeValue::String("Leon".into()),
            ],
        }
    }

    fn sample_headers() -> Vec<AttributeHeader> {
        vec![
            AttributeHeader::new("", ValueType::Null),
            AttributeHeader::new("order", ValueType::Int64),
            AttributeHeader::new("speaker", ValueType::Wstring),
        ]
    }

    #[test]
    fn test_parse_index_era() {
        let entry = sample_entry("talk_00", EntryIdentity::Index(0));
        let bytes = serialize_msg(12, &[0, 1], &sample_headers(), &[entry.clone()]).unwrap();
        let doc = parse_msg_bytes(&bytes).unwrap();

        assert_eq!(doc.version(), 12);
        assert_eq!(doc.languages(), &[0, 1]);
        assert_eq!(doc.attribute_headers(), sample_headers().as_slice());
        assert_eq!(doc.entries(), &[entry]);
        assert_eq!(doc.data(), bytes.as_slice());
    }

    #[test]
    fn test_legacy_marker_is_plain() {
        let entry = sample_entry("talk_00", EntryIdentity::Index(0));
        let bytes = serialize_msg(VERSION_LEGACY_MARKER, &[0, 1], &sample_headers(), &[entry])
            .unwrap();
        // plain pool ends with the UTF-16 "Leon\0"
        assert!(bytes.ends_with(&[b'L', 0, b'e', 0, b'o', 0, b'n', 0, 0, 0]));
        let doc = parse_msg_bytes(&bytes).unwrap();
        assert_eq!(doc.entries()[0].identity, EntryIdentity::Index(0));
    }

    #[test]
    fn test_parse_hash_era() {
        let entry = sample_entry("talk_00", EntryIdentity::Hash(0));
        let bytes = serialize_msg(22, &[0, 1], &sample_headers(), &[entry]).unwrap();
        let doc = parse_msg_bytes(&bytes).unwrap();
        assert_eq!(
            doc.entries()[0].identity,
            EntryIdentity::Hash(hash_name("talk_00"))
        );
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = serialize_msg(14, &[0], &[], &[]).unwrap();
        bytes[4..8].copy_from_slice(b"GMSX");
        assert!(matches!(
            parse_msg_bytes(&bytes),
            Err(Error::InvalidMsgMagic(m)) if &m == b"GMSX"
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = serialize_msg(14, &[0], &[], &[]).unwrap();
        bytes[0..4].copy_from_slice(&99i32.to_le_bytes());
        assert!(matches!(
            parse_msg_bytes(&bytes),
            Err(Error::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_bad_header_offset() {
        let mut bytes = serialize_msg(14, &[0], &[], &[]).unwrap();
        bytes[8..16].copy_from_slice(&24u64.to_le_bytes());
        assert!(matches!(
            parse_msg_bytes(&bytes),
            Err(Error::FormatViolation { context: "header offset", expected: 16, actual: 24 })
        ));
    }

    #[test]
    fn test_misplaced_language_section() {
        let mut bytes = serialize_msg(14, &[0], &[], &[]).unwrap();
        // languages offset field follows data and unknown offsets
        bytes[48..56].copy_from_slice(&88u64.to_le_bytes());
        assert!(matches!(
            parse_msg_bytes(&bytes),
            Err(Error::FormatViolation { context: "languages offset", .. })
        ));
    }

    #[test]
    fn test_nonzero_unknown_data() {
        let mut bytes = serialize_msg(14, &[0], &[], &[]).unwrap();
        bytes[72] = 1;
        assert!(matches!(
            parse_msg_bytes(&bytes),
            Err(Error::FormatViolation { context: "unknown data", .. })
        ));
    }

    #[test]
    fn test_negative_count() {
        let mut bytes = serialize_msg(14, &[0], &[], &[]).unwrap();
        bytes[16..20].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            parse_msg_bytes(&bytes),
            Err(Error::InvalidCount { context: "entry count", value: -1 })
        ));
    }

    #[test]
    fn test_truncated_input() {
        let entry = sample_entry("a", EntryIdentity::Index(0));
        let bytes = serialize_msg(14, &[0, 1], &sample_headers(), &[entry]).unwrap();
        let err = parse_msg_bytes(&bytes[..100]).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_tampered_index() {
        let entry = sample_entry("talk_00", EntryIdentity::Index(0));
        let entry = MsgEntry {
            attributes: vec![],
            ..entry
        };
        let mut bytes = serialize_msg(14, &[0, 1], &[], &[entry]).unwrap();
        // header(32) + 5 offsets + 1 entry offset + unknown(8) + languages(8) = 96,
        // identity field follows the GUID and CRC
        bytes[96 + 20..96 + 24].copy_from_slice(&5i32.to_le_bytes());
        assert!(matches!(
            parse_msg_bytes(&bytes),
            Err(Error::IndexMismatch { expected: 0, actual: 5, .. })
        ));
    }

    /// v12 file with one language, one string column and one entry
    fn tamper_target() -> Vec<u8> {
        let entry = MsgEntry {
            guid: Uuid::nil(),
            crc: 0,
            identity: EntryIdentity::Index(0),
            name: "n".into(),
            contents: vec!["x".into()],
            attributes: vec![AttributeValue::String("Leon".into())],
        };
        let headers = [AttributeHeader::new("speaker", ValueType::Wstring)];
        serialize_msg(12, &[0], &headers, &[entry]).unwrap()
    }

    #[test]
    fn test_null_column_with_text_is_rejected() {
        let mut bytes = tamper_target();
        // header(32) + 4 offsets + 1 entry offset + unknown(8) + languages(8) = 88
        assert_eq!(bytes[88..92], 2i32.to_le_bytes());
        bytes[88..92].copy_from_slice(&(-1i32).to_le_bytes());
        match parse_msg_bytes(&bytes) {
            Err(Error::NonEmptyNullAttribute { entry, value }) => {
                assert_eq!(entry, "n");
                assert_eq!(value, "Leon");
            }
            other => panic!("expected null attribute error, got {other:?}"),
        }
    }

    #[test]
    fn test_offset_inside_string_is_rejected() {
        let mut bytes = tamper_target();
        // types padded to 96, names(8), then the head at 104:
        // GUID, CRC, identity, name and attribute offsets, then contents
        let field = 104 + 40;
        let offset = u64::from_le_bytes(bytes[field..field + 8].try_into().unwrap());
        bytes[field..field + 8].copy_from_slice(&(offset + 2).to_le_bytes());
        assert!(matches!(
            parse_msg_bytes(&bytes),
            Err(Error::OffsetNotFound(_))
        ));
    }

    #[test]
    fn test_non_identity_languages_are_accepted() {
        let bytes = serialize_msg(14, &[1, 0, 77], &[], &[]).unwrap();
        let doc = parse_msg_bytes(&bytes).unwrap();
        assert_eq!(doc.languages(), &[1, 0, 77]);
    }
}
