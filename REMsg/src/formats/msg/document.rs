//! Immutable MSG document

use super::attribute::AttributeHeader;
use super::builder::MsgBuilder;
use super::entry::MsgEntry;
use super::writer::serialize_msg;
use crate::error::Result;
use crate::utils::LanguageId;
use uuid::Uuid;

/// A parsed (or freshly written) MSG file
///
/// Documents are read-only. Use [`MsgDocument::to_builder`] to edit a copy.
#[derive(Debug, Clone, PartialEq)]
pub struct MsgDocument {
    version: i32,
    languages: Vec<i32>,
    attribute_headers: Vec<AttributeHeader>,
    entries: Vec<MsgEntry>,
    data: Vec<u8>,
}

impl MsgDocument {
    pub(crate) fn from_parts(
        version: i32,
        languages: Vec<i32>,
        attribute_headers: Vec<AttributeHeader>,
        entries: Vec<MsgEntry>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            version,
            languages,
            attribute_headers,
            entries,
            data,
        }
    }

    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Language ids in storage order
    #[must_use]
    pub fn languages(&self) -> &[i32] {
        &self.languages
    }

    #[must_use]
    pub fn attribute_headers(&self) -> &[AttributeHeader] {
        &self.attribute_headers
    }

    #[must_use]
    pub fn entries(&self) -> &[MsgEntry] {
        &self.entries
    }

    /// The bytes this document was parsed from or written to
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `language` in the language list, i.e. its content index
    #[must_use]
    pub fn language_index(&self, language: LanguageId) -> Option<usize> {
        self.languages.iter().position(|&id| id == language.id())
    }

    #[must_use]
    pub fn find_entry(&self, name: &str) -> Option<&MsgEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn find_entry_by_guid(&self, guid: Uuid) -> Option<&MsgEntry> {
        self.entries.iter().find(|e| e.guid == guid)
    }

    /// Text of entry `name` in `language`, if both exist
    #[must_use]
    pub fn get_string(&self, name: &str, language: LanguageId) -> Option<&str> {
        let entry = self.find_entry(name)?;
        entry.content(self.language_index(language)?)
    }

    #[must_use]
    pub fn get_string_by_guid(&self, guid: Uuid, language: LanguageId) -> Option<&str> {
        let entry = self.find_entry_by_guid(guid)?;
        entry.content(self.language_index(language)?)
    }

    /// Entries with any content containing `text`
    #[must_use]
    pub fn find_by_text(&self, text: &str, case_sensitive: bool) -> Vec<&MsgEntry> {
        if case_sensitive {
            self.entries
                .iter()
                .filter(|e| e.contents.iter().any(|c| c.contains(text)))
                .collect()
        } else {
            let needle = text.to_lowercase();
            self.entries
                .iter()
                .filter(|e| {
                    e.contents
                        .iter()
                        .any(|c| c.to_lowercase().contains(&needle))
                })
                .collect()
        }
    }

    /// Copy every field list into a builder for editing
    #[must_use]
    pub fn to_builder(&self) -> MsgBuilder {
        MsgBuilder::new(self.version)
            .with_languages(self.languages.clone())
            .with_attribute_headers(self.attribute_headers.clone())
            .with_entries(self.entries.clone())
    }

    /// Re-serialize the document from its parts
    ///
    /// For a document read from a well-formed file this reproduces [`data`](Self::data).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize_msg(
            self.version,
            &self.languages,
            &self.attribute_headers,
            &self.entries,
        )
    }
}
