//! MSG and JSON localization conversions
//!
//! - MSG (binary) - Container shipped in game archives, suffixed with its version (`.msg.22`)
//! - JSON - Human-readable interchange format for editing

mod json_to_msg;
mod msg_to_json;

pub use json_to_msg::{convert_json_to_msg, convert_json_to_msg_with_progress};
pub use msg_to_json::{convert_msg_to_json, convert_msg_to_json_with_progress};
