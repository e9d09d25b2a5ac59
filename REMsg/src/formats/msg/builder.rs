//! Mutable staging area for creating and editing MSG documents

use super::attribute::AttributeHeader;
use super::document::MsgDocument;
use super::entry::{EntryIdentity, MsgEntry};
use super::reader::parse_msg_bytes;
use super::version::{default_language_count, is_hash_identity};
use super::writer::serialize_msg;
use crate::error::{Error, Result};
use crate::utils::{LanguageId, hash_name};
use uuid::Uuid;

/// Builder for [`MsgDocument`]
///
/// ```
/// use remsg::formats::msg::MsgBuilder;
/// use remsg::utils::LanguageId;
///
/// let mut builder = MsgBuilder::new(22);
/// let guid = builder.create(Some("greeting"), "Hello").guid;
/// builder.set_string_by_guid(guid, LanguageId::French, "Bonjour")?;
///
/// let doc = builder.to_document()?;
/// assert_eq!(doc.get_string("greeting", LanguageId::French), Some("Bonjour"));
/// # Ok::<(), remsg::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MsgBuilder {
    version: i32,
    languages: Vec<i32>,
    attribute_headers: Vec<AttributeHeader>,
    entries: Vec<MsgEntry>,
}

impl MsgBuilder {
    /// Start an empty document with the version's usual language list
    #[must_use]
    pub fn new(version: i32) -> Self {
        let languages = default_language_count(version)
            .map(|count| (0..count as i32).collect())
            .unwrap_or_default();
        Self {
            version,
            languages,
            attribute_headers: Vec::new(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_languages(mut self, languages: Vec<i32>) -> Self {
        self.languages = languages;
        self
    }

    #[must_use]
    pub fn with_attribute_headers(mut self, headers: Vec<AttributeHeader>) -> Self {
        self.attribute_headers = headers;
        self
    }

    #[must_use]
    pub fn with_entries(mut self, entries: Vec<MsgEntry>) -> Self {
        self.entries = entries;
        self
    }

    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

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

    /// Append a fully formed entry as is
    pub fn push(&mut self, entry: MsgEntry) {
        self.entries.push(entry);
    }

    fn language_count(&self) -> usize {
        self.entries
            .first()
            .map(|e| e.contents.len())
            .or_else(|| (!self.languages.is_empty()).then_some(self.languages.len()))
            .or_else(|| default_language_count(self.version))
            .unwrap_or(0)
    }

    fn identity_for(&self, name: &str, index: usize) -> EntryIdentity {
        if is_hash_identity(self.version) {
            EntryIdentity::Hash(hash_name(name))
        } else {
            EntryIdentity::Index(index as i32)
        }
    }

    /// Add an entry with `value` as the text of every language
    ///
    /// The entry gets a random GUID. Without a name, the GUID string is used.
    pub fn create(&mut self, name: Option<&str>, value: &str) -> &MsgEntry {
        let guid = Uuid::new_v4();
        let name = name.map_or_else(|| guid.to_string(), str::to_owned);
        let entry = MsgEntry {
            guid,
            crc: 0,
            identity: self.identity_for(&name, self.entries.len()),
            contents: vec![value.to_owned(); self.language_count()],
            attributes: self
                .attribute_headers
                .iter()
                .map(|h| h.value_type.default_value())
                .collect(),
            name,
        };
        tracing::debug!("Created entry {} ({})", entry.name, entry.guid);
        self.append(entry)
    }

    /// Copy an entry under a new GUID
    pub fn duplicate(&mut self, guid: Uuid) -> Result<&MsgEntry> {
        let source = self.find(guid)?;
        let mut entry = self.entries[source].clone();
        entry.guid = Uuid::new_v4();
        if let EntryIdentity::Index(_) = entry.identity {
            entry.identity = EntryIdentity::Index(self.entries.len() as i32);
        }
        Ok(self.append(entry))
    }

    fn append(&mut self, entry: MsgEntry) -> &MsgEntry {
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        &self.entries[last]
    }

    /// Remove an entry; index identities of later entries move up
    pub fn remove(&mut self, guid: Uuid) -> Result<MsgEntry> {
        let index = self.find(guid)?;
        let removed = self.entries.remove(index);
        for (i, entry) in self.entries.iter_mut().enumerate().skip(index) {
            if let EntryIdentity::Index(_) = entry.identity {
                entry.identity = EntryIdentity::Index(i as i32);
            }
        }
        Ok(removed)
    }

    fn find(&self, guid: Uuid) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.guid == guid)
            .ok_or_else(|| Error::EntryNotFound(guid.to_string()))
    }

    fn find_by_name(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| Error::EntryNotFound(name.to_owned()))
    }

    fn set_content(&mut self, index: usize, language: LanguageId, value: String) -> Result<()> {
        let count = self.entries[index].contents.len();
        let slot = self
            .languages
            .iter()
            .position(|&id| id == language.id())
            .filter(|&i| i < count)
            .ok_or(Error::LanguageOutOfRange {
                language: language.id(),
                count,
            })?;
        self.entries[index].contents[slot] = value;
        Ok(())
    }

    /// Replace one language of the entry called `name`
    pub fn set_string(
        &mut self,
        name: &str,
        language: LanguageId,
        value: impl Into<String>,
    ) -> Result<()> {
        let index = self.find_by_name(name)?;
        self.set_content(index, language, value.into())
    }

    pub fn set_string_by_guid(
        &mut self,
        guid: Uuid,
        language: LanguageId,
        value: impl Into<String>,
    ) -> Result<()> {
        let index = self.find(guid)?;
        self.set_content(index, language, value.into())
    }

    /// Replace every language of the entry called `name`
    pub fn set_string_all(&mut self, name: &str, value: &str) -> Result<()> {
        let index = self.find_by_name(name)?;
        self.entries[index].contents.fill(value.to_owned());
        Ok(())
    }

    pub fn set_string_all_by_guid(&mut self, guid: Uuid, value: &str) -> Result<()> {
        let index = self.find(guid)?;
        self.entries[index].contents.fill(value.to_owned());
        Ok(())
    }

    /// Serialize the staged document
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize_msg(
            self.version,
            &self.languages,
            &self.attribute_headers,
            &self.entries,
        )
    }

    /// Serialize and read back, yielding a document whose identities match the file
    pub fn to_document(&self) -> Result<MsgDocument> {
        parse_msg_bytes(&self.to_bytes()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::msg::attribute::{AttributeValue, ValueType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_uses_version_language_count() {
        assert_eq!(MsgBuilder::new(14).languages().len(), 28);
        assert_eq!(MsgBuilder::new(22).languages().len(), 33);
        assert!(MsgBuilder::new(13).languages().is_empty());
    }

    #[test]
    fn test_create_defaults() {
        let mut builder = MsgBuilder::new(14).with_attribute_headers(vec![
            AttributeHeader::new("id", ValueType::Int64),
            AttributeHeader::new("ratio", ValueType::Double),
            AttributeHeader::new("speaker", ValueType::Wstring),
        ]);
        let entry = builder.create(None, "text").clone();

        assert_eq!(entry.name, entry.guid.to_string());
        assert_eq!(entry.crc, 0);
        assert_eq!(entry.identity, EntryIdentity::Index(0));
        assert_eq!(entry.contents.len(), 28);
        assert!(entry.contents.iter().all(|c| c == "text"));
        assert_eq!(
            entry.attributes,
            vec![
                AttributeValue::Int64(0),
                AttributeValue::Double(0.0),
                AttributeValue::String(String::new()),
            ]
        );
    }

    #[test]
    fn test_create_follows_existing_entry_language_count() {
        let mut builder = MsgBuilder::new(14).with_languages(vec![0, 1, 2]);
        let first = builder.create(Some("a"), "x").contents.len();
        let second = builder.create(Some("b"), "y").contents.len();
        assert_eq!(first, 3);
        assert_eq!(second, 3);
    }

    #[test]
    fn test_create_hash_identity() {
        let mut builder = MsgBuilder::new(22);
        let entry = builder.create(Some("Foo"), "bar");
        assert_eq!(entry.identity, EntryIdentity::Hash(0xe7bf_eb7c));
    }

    #[test]
    fn test_duplicate() {
        let mut builder = MsgBuilder::new(14).with_languages(vec![0, 1]);
        let guid = builder.create(Some("a"), "x").guid;
        let copy = builder.duplicate(guid).unwrap().clone();
        assert_ne!(copy.guid, guid);
        assert_eq!(copy.name, "a");
        assert_eq!(copy.identity, EntryIdentity::Index(1));
        assert!(matches!(
            builder.duplicate(Uuid::nil()),
            Err(Error::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_remove_renumbers_indices() {
        let mut builder = MsgBuilder::new(14).with_languages(vec![0]);
        let first = builder.create(Some("a"), "x").guid;
        builder.create(Some("b"), "y");
        builder.create(Some("c"), "z");

        let removed = builder.remove(first).unwrap();
        assert_eq!(removed.name, "a");
        let identities: Vec<_> = builder.entries().iter().map(|e| e.identity).collect();
        assert_eq!(
            identities,
            vec![EntryIdentity::Index(0), EntryIdentity::Index(1)]
        );
    }

    #[test]
    fn test_set_string_by_language_position() {
        let mut builder = MsgBuilder::new(14).with_languages(vec![0, 1]);
        builder.create(Some("a"), "x");
        builder.set_string("a", LanguageId::English, "Hello").unwrap();
        assert_eq!(builder.entries()[0].contents, vec!["x", "Hello"]);

        assert!(matches!(
            builder.set_string("a", LanguageId::German, "Hallo"),
            Err(Error::LanguageOutOfRange { language: 4, count: 2 })
        ));
        assert!(matches!(
            builder.set_string("missing", LanguageId::English, "?"),
            Err(Error::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_set_string_all() {
        let mut builder = MsgBuilder::new(14).with_languages(vec![0, 1, 2]);
        let guid = builder.create(Some("a"), "x").guid;
        builder.set_string_all("a", "same").unwrap();
        assert!(builder.entries()[0].contents.iter().all(|c| c == "same"));
        builder.set_string_all_by_guid(guid, "again").unwrap();
        assert!(builder.entries()[0].contents.iter().all(|c| c == "again"));
    }

    #[test]
    fn test_to_document_reads_back() {
        let mut builder = MsgBuilder::new(22);
        let guid = builder.create(Some("Foo"), "bar").guid;
        let doc = builder.to_document().unwrap();

        assert_eq!(doc.len(), 1);
        let entry = doc.find_entry_by_guid(guid).unwrap();
        assert_eq!(entry.identity, EntryIdentity::Hash(hash_name("Foo")));
        assert_eq!(doc.get_string("Foo", LanguageId::Japanese), Some("bar"));
        assert_eq!(doc.data(), builder.to_bytes().unwrap().as_slice());
    }
}
