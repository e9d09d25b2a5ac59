//! Utility functions

pub mod hash;
pub mod language;

pub use hash::{hash_name, murmur3_32};
pub use language::{LanguageId, is_known_language};
