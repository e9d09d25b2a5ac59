//! RE Engine `.msg` localization container (GMSG)
//!
//! A MSG file holds a list of entries, each with a GUID, a name, one string per
//! language and a row of typed attribute values. All strings live in a
//! deduplicated UTF-16 pool at the end of the file, which is XOR-ciphered from
//! version 13 on. Newer versions identify entries by a hash of their name.
//!
//! ```no_run
//! use remsg::formats::msg::{read_msg, write_msg};
//! use remsg::utils::LanguageId;
//!
//! let doc = read_msg("ch_mes_main_sys.msg.22")?;
//! println!("{:?}", doc.get_string("sys_title", LanguageId::English));
//!
//! let mut builder = doc.to_builder();
//! builder.set_string("sys_title", LanguageId::English, "New title")?;
//! write_msg("ch_mes_main_sys.msg.22", &builder.to_document()?)?;
//! # Ok::<(), remsg::Error>(())
//! ```

pub mod attribute;
pub mod builder;
pub mod cipher;
pub mod document;
pub mod entry;
pub mod json;
pub mod reader;
pub mod string_pool;
pub mod version;
pub mod writer;

pub use attribute::{AttributeHeader, AttributeValue, ValueType};
pub use builder::MsgBuilder;
pub use document::MsgDocument;
pub use entry::{EntryHead, EntryIdentity, MsgEntry, RawAttribute};
pub use json::{from_json, to_json};
pub use reader::{parse_msg_bytes, read_msg};
pub use string_pool::StringPool;
pub use writer::{serialize_msg, write_msg};

/// File magic at byte 4
pub const MSG_MAGIC: &[u8; 4] = b"GMSG";

/// Value of the header offset field
pub const HEADER_OFFSET: u64 = 16;
