//! Version-dependent layout decisions
//!
//! The version field is not monotonic with respect to format features: two
//! revisions carry a build-date value instead of a small integer, and one of
//! them behaves like an old, unencrypted, index-identified file.

use crate::error::{Error, Result};

/// Out-of-sequence revision laid out like a pre-encryption file
pub const VERSION_LEGACY_MARKER: i32 = 0x2022033D;

/// Out-of-sequence revision laid out like a current file
pub const VERSION_BUILD_MARKER: i32 = 0x20220626;

/// Version used when a document is built without one
pub const DEFAULT_VERSION: i32 = 14;

/// Every revision this crate knows how to lay out
pub const SUPPORTED_VERSIONS: [i32; 11] = [
    12,
    13,
    14,
    15,
    16,
    17,
    20,
    22,
    23,
    VERSION_LEGACY_MARKER,
    VERSION_BUILD_MARKER,
];

/// Language count per version, for documents built without any entries
const VERSION_LANGUAGE_COUNTS: [(i32, usize); 8] = [
    (12, 23),
    (VERSION_LEGACY_MARKER, 27),
    (14, 28),
    (15, 30),
    (17, 32),
    (20, 33),
    // 32 before title update 13.0.0
    (VERSION_BUILD_MARKER, 33),
    (22, 33),
];

/// Whether the string pool is XOR-ciphered and its offset stored in the header
#[must_use]
pub const fn is_encrypted(version: i32) -> bool {
    version > 12 && version != VERSION_LEGACY_MARKER
}

/// Whether entries are identified by a name hash instead of their index
#[must_use]
pub const fn is_hash_identity(version: i32) -> bool {
    version > 15 && version != VERSION_LEGACY_MARKER
}

/// Number of languages a file of this version carries, if known
#[must_use]
pub fn default_language_count(version: i32) -> Option<usize> {
    VERSION_LANGUAGE_COUNTS
        .iter()
        .find(|(v, _)| *v == version)
        .map(|&(_, count)| count)
}

#[must_use]
pub fn is_supported(version: i32) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// Fail with [`Error::UnsupportedVersion`] for revisions outside [`SUPPORTED_VERSIONS`]
pub fn ensure_supported(version: i32) -> Result<()> {
    if is_supported(version) {
        Ok(())
    } else {
        Err(Error::UnsupportedVersion(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encryption_threshold() {
        assert!(!is_encrypted(12));
        assert!(is_encrypted(13));
        assert!(is_encrypted(22));
        assert!(!is_encrypted(VERSION_LEGACY_MARKER));
        assert!(is_encrypted(VERSION_BUILD_MARKER));
    }

    #[test]
    fn test_hash_identity_threshold() {
        assert!(!is_hash_identity(14));
        assert!(!is_hash_identity(15));
        assert!(is_hash_identity(16));
        assert!(!is_hash_identity(VERSION_LEGACY_MARKER));
        assert!(is_hash_identity(VERSION_BUILD_MARKER));
    }

    #[test]
    fn test_default_language_count() {
        assert_eq!(default_language_count(14), Some(28));
        assert_eq!(default_language_count(VERSION_LEGACY_MARKER), Some(27));
        assert_eq!(default_language_count(VERSION_BUILD_MARKER), Some(33));
        assert_eq!(default_language_count(13), None);
        assert_eq!(default_language_count(99), None);
    }

    #[test]
    fn test_unknown_version_rejected() {
        assert!(ensure_supported(22).is_ok());
        assert!(matches!(
            ensure_supported(99),
            Err(Error::UnsupportedVersion(99))
        ));
        assert!(ensure_supported(0).is_err());
    }
}
