//! MSG serialization
//!
//! The header stores forward pointers to sections that have not been written
//! yet, and every string field points into a pool that can only be built once
//! all strings are known. Serialization therefore happens in two passes:
//!
//! 1. Every structural element is emitted at its final position. Offset fields
//!    get a `-1` placeholder and a recorded fixup.
//! 2. The string pool is built and appended, then every fixup is patched with
//!    either a section position or `pool base + string offset`.

use super::attribute::{AttributeHeader, ValueType};
use super::document::MsgDocument;
use super::entry::{EntryIdentity, MsgEntry};
use super::string_pool::StringPool;
use super::version::{ensure_supported, is_encrypted, is_hash_identity};
use super::{HEADER_OFFSET, MSG_MAGIC};
use crate::error::{Error, Result};
use crate::utils::hash_name;
use byteorder::{LittleEndian, WriteBytesExt};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const ALIGNMENT: usize = 8;

/// A section start referenced by an offset field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Anchor {
    /// String pool start, only referenced by encrypted versions
    Data,
    UnknownData,
    Languages,
    AttributeTypes,
    AttributeNames,
    EntryHead(usize),
    EntryAttributes(usize),
}

#[derive(Debug, Clone, Copy)]
enum FixupTarget<'a> {
    Anchor(Anchor),
    Str(&'a str),
}

/// Append-only layout buffer with deferred offset fields
#[derive(Debug, Default)]
pub(crate) struct LayoutWriter<'a> {
    buffer: Vec<u8>,
    anchors: HashMap<Anchor, u64>,
    fixups: Vec<(usize, FixupTarget<'a>)>,
}

impl<'a> LayoutWriter<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn position(&self) -> u64 {
        self.buffer.len() as u64
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub(crate) fn write_i32(&mut self, value: i32) -> Result<()> {
        self.buffer.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    pub(crate) fn write_u32(&mut self, value: u32) -> Result<()> {
        self.buffer.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub(crate) fn write_i64(&mut self, value: i64) -> Result<()> {
        self.buffer.write_i64::<LittleEndian>(value)?;
        Ok(())
    }

    pub(crate) fn write_u64(&mut self, value: u64) -> Result<()> {
        self.buffer.write_u64::<LittleEndian>(value)?;
        Ok(())
    }

    pub(crate) fn write_f64(&mut self, value: f64) -> Result<()> {
        self.buffer.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    /// Zero-pad to the next multiple of 8, if not already aligned
    pub(crate) fn align(&mut self) {
        let rem = self.buffer.len() % ALIGNMENT;
        if rem != 0 {
            self.buffer.resize(self.buffer.len() + ALIGNMENT - rem, 0);
        }
    }

    /// Record that `anchor` starts at the current position
    pub(crate) fn mark(&mut self, anchor: Anchor) {
        let position = self.position();
        self.anchors.insert(anchor, position);
    }

    fn placeholder(&mut self, target: FixupTarget<'a>) -> Result<()> {
        self.fixups.push((self.buffer.len(), target));
        self.write_i64(-1)
    }

    /// Offset field pointing at a section start
    pub(crate) fn anchor_placeholder(&mut self, anchor: Anchor) -> Result<()> {
        self.placeholder(FixupTarget::Anchor(anchor))
    }

    /// Offset field pointing at a pool string
    pub(crate) fn string_placeholder(&mut self, s: &'a str) -> Result<()> {
        self.placeholder(FixupTarget::Str(s))
    }

    /// Append the pool and patch every recorded placeholder
    pub(crate) fn finish(mut self, pool: &StringPool, encrypted: bool) -> Result<Vec<u8>> {
        let base = self.position();
        self.mark(Anchor::Data);
        self.write_bytes(pool.bytes(encrypted));

        for (position, target) in &self.fixups {
            let value = match target {
                FixupTarget::Anchor(anchor) => {
                    *self.anchors.get(anchor).ok_or(Error::FormatViolation {
                        context: "unresolved section offset",
                        expected: 0,
                        actual: *position as u64,
                    })?
                }
                FixupTarget::Str(s) => base + pool.find_offset(s)?,
            };
            self.buffer[*position..*position + 8].copy_from_slice(&value.to_le_bytes());
        }

        tracing::debug!(
            "Patched {} offsets, pool at {} ({} bytes)",
            self.fixups.len(),
            base,
            pool.byte_len()
        );
        Ok(self.buffer)
    }
}

/// Strings referenced by a document, in pool layout order
///
/// One empty string first if any column is null-typed, then attribute names,
/// then per entry its name, its contents and its string attribute values.
pub(crate) fn collect_strings<'a>(
    headers: &'a [AttributeHeader],
    entries: &'a [MsgEntry],
) -> IndexSet<&'a str> {
    let mut strings = IndexSet::new();
    if headers.iter().any(|h| h.value_type == ValueType::Null) {
        strings.insert("");
    }
    for header in headers {
        strings.insert(header.name.as_str());
    }
    for entry in entries {
        strings.insert(entry.name.as_str());
        for content in &entry.contents {
            strings.insert(content.as_str());
        }
        for (header, value) in headers.iter().zip(&entry.attributes) {
            if let (ValueType::Wstring, Some(s)) = (header.value_type, value.as_str()) {
                strings.insert(s);
            }
        }
    }
    strings
}

/// Check arity and attribute types of every entry before any byte is written
pub(crate) fn validate_entries(
    language_count: usize,
    headers: &[AttributeHeader],
    entries: &[MsgEntry],
) -> Result<()> {
    for entry in entries {
        if entry.contents.len() != language_count {
            return Err(Error::ArityMismatch {
                entry: entry.name.clone(),
                what: "contents",
                expected: language_count,
                actual: entry.contents.len(),
            });
        }
        if entry.attributes.len() != headers.len() {
            return Err(Error::ArityMismatch {
                entry: entry.name.clone(),
                what: "attributes",
                expected: headers.len(),
                actual: entry.attributes.len(),
            });
        }
        for (index, (header, value)) in headers.iter().zip(&entry.attributes).enumerate() {
            value.check(header, &entry.name, index)?;
        }
    }
    Ok(())
}

/// Identity written for the entry at `index`
///
/// Hash-era files always store the hash of the current name and index-era
/// files the current position, whatever the entry carried before.
pub(crate) fn derive_identity(version: i32, index: usize, entry: &MsgEntry) -> EntryIdentity {
    if is_hash_identity(version) {
        EntryIdentity::Hash(hash_name(&entry.name))
    } else {
        EntryIdentity::Index(index as i32)
    }
}

/// Serialize the parts of a document into MSG bytes
///
/// # Errors
///
/// Returns [`Error::UnsupportedVersion`] for unknown versions,
/// [`Error::ArityMismatch`] if an entry does not have one content per language
/// or one value per attribute header, and the attribute check errors from
/// [`AttributeValue::check`](super::AttributeValue::check).
pub fn serialize_msg(
    version: i32,
    languages: &[i32],
    headers: &[AttributeHeader],
    entries: &[MsgEntry],
) -> Result<Vec<u8>> {
    ensure_supported(version)?;
    validate_entries(languages.len(), headers, entries)?;

    let encrypted = is_encrypted(version);
    let mut out = LayoutWriter::new();

    // Header
    out.write_i32(version)?;
    out.write_bytes(MSG_MAGIC);
    out.write_u64(HEADER_OFFSET)?;
    out.write_i32(entries.len() as i32)?;
    out.write_i32(headers.len() as i32)?;
    out.write_i32(languages.len() as i32)?;
    out.align();

    if encrypted {
        out.anchor_placeholder(Anchor::Data)?;
    }
    out.anchor_placeholder(Anchor::UnknownData)?;
    out.anchor_placeholder(Anchor::Languages)?;
    out.anchor_placeholder(Anchor::AttributeTypes)?;
    out.anchor_placeholder(Anchor::AttributeNames)?;
    for index in 0..entries.len() {
        out.anchor_placeholder(Anchor::EntryHead(index))?;
    }

    out.mark(Anchor::UnknownData);
    out.write_u64(0)?;

    out.mark(Anchor::Languages);
    for &language in languages {
        out.write_i32(language)?;
    }
    out.align();

    out.mark(Anchor::AttributeTypes);
    for header in headers {
        out.write_i32(header.value_type.code())?;
    }
    out.align();

    out.mark(Anchor::AttributeNames);
    for header in headers {
        out.string_placeholder(&header.name)?;
    }

    for (index, entry) in entries.iter().enumerate() {
        entry.write_head(&mut out, index, derive_identity(version, index, entry))?;
    }
    for (index, entry) in entries.iter().enumerate() {
        entry.write_attributes(&mut out, index)?;
    }

    let pool = StringPool::from_strings(collect_strings(headers, entries));
    tracing::debug!(
        "Structure of {} entries ends at {}, pool holds {} strings",
        entries.len(),
        out.position(),
        pool.len()
    );
    out.finish(&pool, encrypted)
}

/// Write a document to disk, re-serializing it from its parts
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created, plus any
/// [`serialize_msg`] error.
pub fn write_msg<P: AsRef<Path>>(path: P, document: &MsgDocument) -> Result<()> {
    let bytes = document.to_bytes()?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}
