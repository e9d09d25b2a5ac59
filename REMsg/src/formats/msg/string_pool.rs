//! Deduplicated UTF-16 string pool
//!
//! The pool is the tail of every MSG file. Each string is stored as UTF-16LE
//! followed by a NUL code unit, and every string field elsewhere in the file is
//! a byte offset into this blob.

use super::cipher;
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Bidirectional offset/string store
#[derive(Debug, Default)]
pub struct StringPool {
    /// Pool-relative byte offset to string
    strings: BTreeMap<u64, String>,
    /// String to the offset of its first occurrence
    offsets: HashMap<String, u64>,
    /// Unencrypted layout
    plain: Vec<u8>,
    encrypted: OnceLock<Vec<u8>>,
}

impl StringPool {
    /// Decode a pool blob read from disk
    ///
    /// # Errors
    ///
    /// Returns [`Error::OddPoolSize`] if the blob cannot hold whole UTF-16 units,
    /// [`Error::MissingPoolTerminator`] if the last string is not terminated and
    /// [`Error::InvalidUtf16`] for unpaired surrogates.
    pub fn from_bytes(blob: &[u8], encrypted: bool) -> Result<Self> {
        if blob.len() % 2 != 0 {
            return Err(Error::OddPoolSize(blob.len()));
        }

        let plain = if encrypted {
            cipher::decrypt(blob)
        } else {
            blob.to_vec()
        };

        let mut pool = Self {
            plain,
            ..Self::default()
        };
        if encrypted {
            pool.encrypted = OnceLock::from(blob.to_vec());
        }
        if pool.plain.is_empty() {
            return Ok(pool);
        }
        if pool.plain[pool.plain.len() - 2..] != [0, 0] {
            return Err(Error::MissingPoolTerminator);
        }

        let units: Vec<u16> = pool
            .plain
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let mut start = 0usize;
        for (i, &unit) in units.iter().enumerate() {
            if unit != 0 {
                continue;
            }
            let offset = (start * 2) as u64;
            let text = String::from_utf16(&units[start..i])
                .map_err(|_| Error::InvalidUtf16 { offset })?;
            pool.offsets.entry(text.clone()).or_insert(offset);
            pool.strings.insert(offset, text);
            start = i + 1;
        }

        Ok(pool)
    }

    /// Lay out a fresh pool, in iteration order, keeping the first occurrence of duplicates
    pub fn from_strings<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pool = Self::default();
        for s in strings {
            let s = s.as_ref();
            if pool.offsets.contains_key(s) {
                continue;
            }
            let offset = pool.plain.len() as u64;
            for unit in s.encode_utf16().chain(std::iter::once(0)) {
                pool.plain.extend_from_slice(&unit.to_le_bytes());
            }
            pool.offsets.insert(s.to_owned(), offset);
            pool.strings.insert(offset, s.to_owned());
        }
        pool
    }

    /// String starting exactly at `offset`
    ///
    /// # Errors
    ///
    /// Returns [`Error::OffsetNotFound`] if no string starts there.
    pub fn find(&self, offset: u64) -> Result<&str> {
        self.strings
            .get(&offset)
            .map(String::as_str)
            .ok_or(Error::OffsetNotFound(offset))
    }

    /// Offset of the first occurrence of `s`
    ///
    /// # Errors
    ///
    /// Returns [`Error::StringNotFound`] if `s` is not in the pool.
    pub fn find_offset(&self, s: &str) -> Result<u64> {
        self.offsets
            .get(s)
            .copied()
            .ok_or_else(|| Error::StringNotFound(s.to_owned()))
    }

    #[must_use]
    pub fn plain_bytes(&self) -> &[u8] {
        &self.plain
    }

    /// Ciphered form, computed on first use
    #[must_use]
    pub fn encrypted_bytes(&self) -> &[u8] {
        self.encrypted.get_or_init(|| cipher::encrypt(&self.plain))
    }

    /// Bytes as they should be stored for a file with the given encryption flag
    #[must_use]
    pub fn bytes(&self, encrypted: bool) -> &[u8] {
        if encrypted {
            self.encrypted_bytes()
        } else {
            self.plain_bytes()
        }
    }

    /// Number of strings, counting repeated occurrences read from disk
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Byte size of the laid out pool
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.plain.len()
    }

    /// `(offset, string)` pairs in offset order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.strings.iter().map(|(&offset, s)| (offset, s.as_str()))
    }
}
