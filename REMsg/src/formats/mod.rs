//! File format handlers for RE Engine formats

pub mod msg;

// Re-export main document types
pub use msg::{MsgBuilder, MsgDocument, MsgEntry, read_msg, write_msg};
