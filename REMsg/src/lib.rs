//! # REMsg
//!
//! A pure-Rust library for reading, editing and writing RE Engine `.msg`
//! localization files (GMSG containers).
//!
//! ## Supported Versions
//!
//! - **12, 0x2022033D** - Plain string pool, entries identified by index
//! - **13, 14, 15** - Encrypted string pool, entries identified by index
//! - **16, 17, 20, 22, 23, 0x20220626** - Encrypted string pool, entries identified by name hash
//!
//! Files of any other version are rejected.
//!
//! ## Quick Start
//!
//! ### Reading a MSG file
//!
//! ```no_run
//! use remsg::formats::msg::read_msg;
//! use remsg::utils::LanguageId;
//!
//! let doc = read_msg("ch_mes_main_sys.msg.22")?;
//! for entry in doc.entries() {
//!     println!("{}: {:?}", entry.name, doc.get_string(&entry.name, LanguageId::English));
//! }
//! # Ok::<(), remsg::Error>(())
//! ```
//!
//! ### Converting to JSON
//!
//! ```no_run
//! use remsg::converter::{convert_json_to_msg, convert_msg_to_json};
//!
//! convert_msg_to_json("sys.msg.22", "sys.msg.22.json")?;
//! convert_json_to_msg("sys.msg.22.json", "sys.msg.22")?;
//! # Ok::<(), remsg::Error>(())
//! ```
//!
//! ### Building a document
//!
//! ```
//! use remsg::prelude::*;
//!
//! let mut builder = MsgBuilder::new(22);
//! builder.create(Some("Foo"), "bar");
//! let doc = builder.to_document()?;
//! assert_eq!(doc.entries()[0].identity, EntryIdentity::Hash(0xe7bf_eb7c));
//! # Ok::<(), remsg::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `remsg` command-line binary

pub mod converter;
pub mod error;
pub mod formats;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::msg::{
        AttributeHeader, AttributeValue, EntryIdentity, MsgBuilder, MsgDocument, MsgEntry,
        ValueType, from_json, parse_msg_bytes, read_msg, to_json, write_msg,
    };
    pub use crate::utils::{LanguageId, hash_name};

    pub use crate::converter;
    pub use crate::converter::{BatchConvertResult, batch_msg_to_json, find_msg_files};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
