//! Error types for `REMsg`

use thiserror::Error;

/// The error type for `REMsg` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations or a truncated buffer.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Structural Errors ====================
    /// The data is not a GMSG container.
    #[error("invalid MSG magic: expected GMSG, found {0:?}")]
    InvalidMsgMagic([u8; 4]),

    /// The MSG version is not one of the known revisions.
    #[error("unsupported MSG version: {0} ({0:#x})")]
    UnsupportedVersion(i32),

    /// A section did not start where the header said it would.
    #[error("{context}: expected {expected} but found {actual}")]
    FormatViolation {
        /// Which section or field was being checked.
        context: &'static str,
        /// Value stored in the file.
        expected: u64,
        /// Value observed while reading.
        actual: u64,
    },

    /// A header count field was negative.
    #[error("invalid {context}: {value}")]
    InvalidCount {
        /// Which count was being read.
        context: &'static str,
        /// Value stored in the file.
        value: i32,
    },

    // ==================== String Pool Errors ====================
    /// UTF-16 pools must have an even byte length.
    #[error("string pool size should be even: {0}")]
    OddPoolSize(usize),

    /// The last UTF-16 code unit of the pool was not NUL.
    #[error("string pool does not end with a null terminator")]
    MissingPoolTerminator,

    /// A pool segment is not valid UTF-16.
    #[error("invalid UTF-16 string at pool offset {offset}")]
    InvalidUtf16 {
        /// Pool-relative byte offset of the segment.
        offset: u64,
    },

    /// No string starts at the given pool offset.
    #[error("no string at pool offset {0}")]
    OffsetNotFound(u64),

    /// A string used by the document was not added to the pool.
    #[error("string not found in pool: {0:?}")]
    StringNotFound(String),

    // ==================== Entry Identity Errors ====================
    /// The stored name hash does not match the hash of the resolved name.
    #[error("hash mismatch for {name:?}: stored {expected:#x}, computed {actual:#x}")]
    HashMismatch {
        /// Resolved entry name.
        name: String,
        /// Hash stored in the entry head.
        expected: u32,
        /// Hash computed from the name.
        actual: u32,
    },

    /// The stored entry index does not match the entry's position.
    #[error("index mismatch for {name:?}: stored {actual}, expected {expected}")]
    IndexMismatch {
        /// Resolved entry name.
        name: String,
        /// Position of the entry in the file.
        expected: i32,
        /// Index stored in the entry head.
        actual: i32,
    },

    // ==================== Attribute Errors ====================
    /// Unknown attribute value type code.
    #[error("unsupported attribute value type: {0}")]
    UnsupportedValueType(i32),

    /// An attribute value does not match its header's value type.
    #[error("entry {entry:?} attribute {index}: expected a {expected} value")]
    AttributeTypeMismatch {
        /// Entry name.
        entry: String,
        /// Attribute position.
        index: usize,
        /// Value type declared by the header.
        expected: &'static str,
    },

    /// A double attribute is NaN or infinite and has no JSON form.
    #[error("entry {entry:?} attribute {index}: {value} cannot be exported as JSON")]
    NonFiniteDouble {
        /// Entry name.
        entry: String,
        /// Attribute position.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// A null-typed attribute resolved to a non-empty string.
    #[error("entry {entry:?}: null attribute contains non-null value {value:?}")]
    NonEmptyNullAttribute {
        /// Entry name.
        entry: String,
        /// Offending value.
        value: String,
    },

    /// An entry's attribute or content count disagrees with the document.
    #[error("entry {entry:?} has {actual} {what}, expected {expected}")]
    ArityMismatch {
        /// Entry name.
        entry: String,
        /// "attributes" or "contents".
        what: &'static str,
        /// Count required by the document.
        expected: usize,
        /// Count found on the entry.
        actual: usize,
    },

    // ==================== Editing Errors ====================
    /// No entry matched the requested name or GUID.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// A language index outside of the entry's content list.
    #[error("language {language} out of range (entry has {count} languages)")]
    LanguageOutOfRange {
        /// Requested language id.
        language: i32,
        /// Number of languages stored.
        count: usize,
    },

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for `REMsg` operations.
pub type Result<T> = std::result::Result<T, Error>;
