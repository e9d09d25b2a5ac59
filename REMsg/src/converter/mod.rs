//! Format conversion utilities
//!
//! This module handles conversions between MSG and its interchange formats:
//! - MSG (binary) ↔ JSON - Single file conversion
//! - Batch MSG → JSON over a directory tree, in parallel

pub mod batch;
pub mod msg;

pub use batch::{BatchConvertResult, batch_msg_to_json, find_msg_files, is_msg_file};
pub use msg::{
    convert_json_to_msg, convert_json_to_msg_with_progress, convert_msg_to_json,
    convert_msg_to_json_with_progress,
};

/// Progress callback for single file conversions
pub type ConvertProgressCallback<'a> = &'a (dyn Fn(&ConvertProgress) + Sync);

/// Progress update for a conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertProgress {
    /// Current operation phase
    pub phase: ConvertPhase,
    /// Current step or item number (1-indexed)
    pub current: usize,
    /// Total number of steps or items
    pub total: usize,
    /// Description of the current step, or the file being processed
    pub current_file: Option<String>,
}

impl ConvertProgress {
    #[must_use]
    pub fn new(phase: ConvertPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file/item name
    #[must_use]
    pub fn with_file(
        phase: ConvertPhase,
        current: usize,
        total: usize,
        file: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }
}

/// Phase of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertPhase {
    /// Reading the source file
    ReadingSource,
    /// Parsing or decoding the source
    Parsing,
    /// Building the target representation
    Converting,
    /// Writing the output file
    WritingOutput,
    Complete,
}

impl ConvertPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadingSource => "Reading source",
            Self::Parsing => "Parsing",
            Self::Converting => "Converting",
            Self::WritingOutput => "Writing output",
            Self::Complete => "Complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_file() {
        let progress = ConvertProgress::with_file(ConvertPhase::ReadingSource, 1, 3, "a.msg.22");
        assert_eq!(progress.current_file.as_deref(), Some("a.msg.22"));
        assert_eq!(progress.phase.as_str(), "Reading source");
    }
}
