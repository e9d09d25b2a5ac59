//! JSON interchange
//!
//! The layout follows the format used by existing community tooling:
//!
//! ```json
//! {
//!   "version": 22,
//!   "attribute_headers": [{ "ty": 2, "name": "speaker" }],
//!   "entries": [{
//!     "name": "greeting",
//!     "guid": "00112233-4455-6677-8899-aabbccddeeff",
//!     "crc?": 0,
//!     "hash": 2852005650,
//!     "attributes": [{ "String": "Leon" }],
//!     "content": ["...", "Hello"]
//!   }]
//! }
//! ```
//!
//! Index-era documents export `hash` as `0xFFFFFFFF`. On import `hash` may
//! also be given as a signed 32-bit number. Double attributes must be finite,
//! since JSON has no representation for NaN or infinity.

use super::attribute::{AttributeHeader, AttributeValue, ValueType};
use super::builder::MsgBuilder;
use super::document::MsgDocument;
use super::entry::{EntryIdentity, MsgEntry};
use super::version::{DEFAULT_VERSION, is_hash_identity};
use crate::error::{Error, Result};
use crate::utils::hash_name;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// `hash` value written for entries identified by index
pub const NO_HASH: u32 = 0xFFFF_FFFF;

#[derive(Debug, Serialize, Deserialize)]
struct MsgJson {
    #[serde(default)]
    version: Option<i32>,
    #[serde(default)]
    attribute_headers: Vec<AttributeHeaderJson>,
    #[serde(default)]
    entries: Vec<MsgEntryJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AttributeHeaderJson {
    ty: i32,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct MsgEntryJson {
    #[serde(default)]
    name: String,
    #[serde(default)]
    guid: Uuid,
    #[serde(rename = "crc?", default)]
    crc: u32,
    #[serde(default, deserialize_with = "deserialize_hash")]
    hash: Option<u32>,
    #[serde(default)]
    attributes: Vec<AttributeValueJson>,
    #[serde(default)]
    content: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
enum AttributeValueJson {
    Int(i64),
    Float(f64),
    String(String),
    Unknown(String),
}

/// Accept hashes written either unsigned or as the signed `int` of other tools
fn deserialize_hash<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer)?
        .map(|raw| {
            u32::try_from(raw)
                .or_else(|_| i32::try_from(raw).map(|signed| signed as u32))
                .map_err(|_| D::Error::custom(format!("hash {raw} does not fit in 32 bits")))
        })
        .transpose()
}

impl AttributeValueJson {
    fn from_value(
        header: &AttributeHeader,
        value: &AttributeValue,
        entry: &str,
        index: usize,
    ) -> Result<Self> {
        Ok(match (header.value_type, value) {
            (_, AttributeValue::Int64(v)) => Self::Int(*v),
            (_, AttributeValue::Double(v)) if !v.is_finite() => {
                return Err(Error::NonFiniteDouble {
                    entry: entry.to_owned(),
                    index,
                    value: *v,
                });
            }
            (_, AttributeValue::Double(v)) => Self::Float(*v),
            (ValueType::Null, AttributeValue::String(s)) => Self::Unknown(s.clone()),
            (_, AttributeValue::String(s)) => Self::String(s.clone()),
        })
    }

    fn into_value(self) -> AttributeValue {
        match self {
            Self::Int(v) => AttributeValue::Int64(v),
            Self::Float(v) => AttributeValue::Double(v),
            Self::String(s) | Self::Unknown(s) => AttributeValue::String(s),
        }
    }
}

/// Export a document as pretty-printed JSON
///
/// # Errors
///
/// Returns [`Error::NonFiniteDouble`] for NaN or infinite double attributes.
pub fn to_json(document: &MsgDocument) -> Result<String> {
    let headers = document.attribute_headers();
    let json = MsgJson {
        version: Some(document.version()),
        attribute_headers: headers
            .iter()
            .map(|h| AttributeHeaderJson {
                ty: h.value_type.code(),
                name: h.name.clone(),
            })
            .collect(),
        entries: document
            .entries()
            .iter()
            .map(|entry| {
                Ok(MsgEntryJson {
                    name: entry.name.clone(),
                    guid: entry.guid,
                    crc: entry.crc,
                    hash: Some(match entry.identity {
                        EntryIdentity::Hash(hash) => hash,
                        EntryIdentity::Index(_) => NO_HASH,
                    }),
                    attributes: headers
                        .iter()
                        .zip(&entry.attributes)
                        .enumerate()
                        .map(|(index, (h, v))| {
                            AttributeValueJson::from_value(h, v, &entry.name, index)
                        })
                        .collect::<Result<Vec<_>>>()?,
                    content: entry.contents.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

/// Build a document from JSON
///
/// Missing fields fall back to defaults: version 14, nil GUIDs, zero CRCs.
/// The language list is `0..n` where `n` is the content count of the first
/// entry, or the version's usual count for documents without entries.
///
/// # Errors
///
/// Returns [`Error::JsonError`](crate::Error::JsonError) for malformed input,
/// plus any error from serializing the resulting document.
pub fn from_json(json: &str) -> Result<MsgDocument> {
    let parsed: MsgJson = serde_json::from_str(json)?;
    let version = parsed.version.unwrap_or(DEFAULT_VERSION);
    let hash_identity = is_hash_identity(version);

    let headers = parsed
        .attribute_headers
        .into_iter()
        .map(|h| Ok(AttributeHeader::new(h.name, ValueType::from_code(h.ty)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut builder = MsgBuilder::new(version).with_attribute_headers(headers);
    if let Some(first) = parsed.entries.first() {
        builder = builder.with_languages((0..first.content.len() as i32).collect());
    }

    for (index, entry) in parsed.entries.into_iter().enumerate() {
        let identity = if hash_identity {
            let computed = hash_name(&entry.name);
            if let Some(stored) = entry.hash.filter(|&h| h != computed) {
                tracing::warn!(
                    "Hash {:#x} of {:?} does not match its name, using {:#x}",
                    stored,
                    entry.name,
                    computed
                );
            }
            EntryIdentity::Hash(computed)
        } else {
            EntryIdentity::Index(index as i32)
        };

        builder.push(MsgEntry {
            guid: entry.guid,
            crc: entry.crc,
            identity,
            name: entry.name,
            contents: entry.content,
            attributes: entry
                .attributes
                .into_iter()
                .map(AttributeValueJson::into_value)
                .collect(),
        });
    }

    builder.to_document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_document(version: i32) -> MsgDocument {
        let mut builder = MsgBuilder::new(version)
            .with_languages(vec![0, 1])
            .with_attribute_headers(vec![
                AttributeHeader::new("", ValueType::Null),
                AttributeHeader::new("order", ValueType::Int64),
                AttributeHeader::new("speaker", ValueType::Wstring),
            ]);
        builder.create(Some("greeting"), "Hello");
        builder
            .set_string("greeting", crate::utils::LanguageId::Japanese, "こんにちは")
            .unwrap();
        builder.to_document().unwrap()
    }

    #[test]
    fn test_export_shape() {
        let doc = sample_document(14);
        let value: serde_json::Value = serde_json::from_str(&to_json(&doc).unwrap()).unwrap();

        assert_eq!(value["version"], 14);
        assert_eq!(value["attribute_headers"][0]["ty"], -1);
        assert_eq!(value["attribute_headers"][2]["name"], "speaker");
        let entry = &value["entries"][0];
        assert_eq!(entry["name"], "greeting");
        assert_eq!(entry["hash"], u64::from(NO_HASH));
        assert_eq!(entry["crc?"], 0);
        assert_eq!(entry["attributes"][0]["Unknown"], "");
        assert_eq!(entry["attributes"][1]["Int"], 0);
        assert_eq!(entry["attributes"][2]["String"], "");
        assert_eq!(entry["content"][1], "Hello");
    }

    #[test]
    fn test_hash_era_export() {
        let doc = sample_document(22);
        let value: serde_json::Value = serde_json::from_str(&to_json(&doc).unwrap()).unwrap();
        assert_eq!(
            value["entries"][0]["hash"],
            u64::from(hash_name("greeting"))
        );
    }

    #[test]
    fn test_round_trip_preserves_bytes() {
        for version in [14, 22] {
            let doc = sample_document(version);
            let back = from_json(&to_json(&doc).unwrap()).unwrap();
            assert_eq!(back.data(), doc.data());
        }
    }

    #[test]
    fn test_defaults_for_sparse_input() {
        let doc = from_json(r#"{ "entries": [{ "name": "a", "content": ["x", "y", "z"] }] }"#)
            .unwrap();
        assert_eq!(doc.version(), DEFAULT_VERSION);
        assert_eq!(doc.languages(), &[0, 1, 2]);
        assert_eq!(doc.entries()[0].guid, Uuid::nil());
        assert_eq!(doc.entries()[0].identity, EntryIdentity::Index(0));
    }

    #[test]
    fn test_empty_document_uses_version_languages() {
        let doc = from_json(r#"{ "version": 22 }"#).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.languages().len(), 33);
    }

    #[test]
    fn test_wrong_hash_is_recomputed() {
        let json = r#"{
            "version": 22,
            "entries": [{ "name": "Foo", "hash": 1, "content": ["bar"] }]
        }"#;
        let doc = from_json(json).unwrap();
        assert_eq!(doc.entries()[0].identity, EntryIdentity::Hash(0xe7bf_eb7c));
    }

    #[test]
    fn test_signed_hash_is_accepted() {
        // 0xe7bfeb7c written as a signed int
        let json = r#"{
            "version": 22,
            "entries": [{ "name": "Foo", "hash": -406852740, "content": ["bar"] }]
        }"#;
        let doc = from_json(json).unwrap();
        assert_eq!(doc.entries()[0].identity, EntryIdentity::Hash(0xe7bf_eb7c));

        let unsigned = json.replace("-406852740", "3888114556");
        assert_eq!(from_json(&unsigned).unwrap(), doc);
    }

    #[test]
    fn test_out_of_range_hash() {
        let json = r#"{ "entries": [{ "name": "a", "hash": 4294967296, "content": ["x"] }] }"#;
        assert!(matches!(from_json(json), Err(Error::JsonError(_))));
    }

    #[test]
    fn test_non_finite_double_is_not_exported() {
        let mut builder = MsgBuilder::new(14)
            .with_languages(vec![0])
            .with_attribute_headers(vec![AttributeHeader::new("scale", ValueType::Double)]);
        builder.create(Some("a"), "x");
        let mut entries = builder.entries().to_vec();
        entries[0].attributes = vec![AttributeValue::Double(f64::NAN)];
        let doc = builder.with_entries(entries).to_document().unwrap();

        match to_json(&doc) {
            Err(Error::NonFiniteDouble { entry, index, value }) => {
                assert_eq!(entry, "a");
                assert_eq!(index, 0);
                assert!(value.is_nan());
            }
            other => panic!("expected non-finite error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(from_json("not json"), Err(Error::JsonError(_))));
        assert!(matches!(
            from_json(r#"{ "attribute_headers": [{ "ty": 9, "name": "x" }] }"#),
            Err(Error::UnsupportedValueType(9))
        ));
        // value does not fit its column
        let json = r#"{
            "attribute_headers": [{ "ty": 0, "name": "id" }],
            "entries": [{ "name": "a", "attributes": [{ "String": "x" }], "content": ["x"] }]
        }"#;
        assert!(matches!(
            from_json(json),
            Err(Error::AttributeTypeMismatch { .. })
        ));
    }
}
