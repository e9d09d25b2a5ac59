//! Attribute schema and values
//!
//! Every entry carries one value per [`AttributeHeader`] of its document, in
//! header order. Each value occupies an 8-byte slot on disk.

use crate::error::{Error, Result};
use std::fmt;

/// On-disk value type code of an attribute column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ValueType {
    /// Placeholder column; values are always the empty string
    Null = -1,
    Int64 = 0,
    Double = 1,
    Wstring = 2,
}

impl ValueType {
    /// Parse an on-disk type code
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValueType`] for any other code.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            -1 => Ok(Self::Null),
            0 => Ok(Self::Int64),
            1 => Ok(Self::Double),
            2 => Ok(Self::Wstring),
            other => Err(Error::UnsupportedValueType(other)),
        }
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Tag used for values of this type in JSON exports
    #[must_use]
    pub const fn json_tag(self) -> &'static str {
        match self {
            Self::Null => "Unknown",
            Self::Int64 => "Int",
            Self::Double => "Float",
            Self::Wstring => "String",
        }
    }

    /// Whether the slot holds a string pool offset
    #[must_use]
    pub const fn is_pooled(self) -> bool {
        matches!(self, Self::Null | Self::Wstring)
    }

    /// Value a freshly created entry gets for this column
    #[must_use]
    pub fn default_value(self) -> AttributeValue {
        match self {
            Self::Int64 => AttributeValue::Int64(0),
            Self::Double => AttributeValue::Double(0.0),
            Self::Null | Self::Wstring => AttributeValue::String(String::new()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::Wstring => "wstring",
        };
        f.write_str(name)
    }
}

/// Name and value type of one attribute column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeHeader {
    pub name: String,
    pub value_type: ValueType,
}

impl AttributeHeader {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

/// A resolved attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Int64(i64),
    Double(f64),
    /// Used by both `Wstring` and `Null` columns
    String(String),
}

impl AttributeValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check this value against its column, as required before writing
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeTypeMismatch`] when the variant does not fit the
    /// column and [`Error::NonEmptyNullAttribute`] for a non-empty null value.
    pub fn check(&self, header: &AttributeHeader, entry: &str, index: usize) -> Result<()> {
        let fits = matches!(
            (header.value_type, self),
            (ValueType::Int64, Self::Int64(_))
                | (ValueType::Double, Self::Double(_))
                | (ValueType::Wstring | ValueType::Null, Self::String(_))
        );
        if !fits {
            return Err(Error::AttributeTypeMismatch {
                entry: entry.to_owned(),
                index,
                expected: header.value_type.json_tag(),
            });
        }
        match (header.value_type, self) {
            (ValueType::Null, Self::String(s)) if !s.is_empty() => {
                Err(Error::NonEmptyNullAttribute {
                    entry: entry.to_owned(),
                    value: s.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}
