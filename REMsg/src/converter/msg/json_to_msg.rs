//! JSON to MSG conversion

use crate::converter::{ConvertPhase, ConvertProgress, ConvertProgressCallback};
use crate::error::Result;
use crate::formats::msg;
use std::path::Path;

/// Convert a JSON export back to a .msg file
///
/// # Errors
/// Returns an error if the JSON is malformed, describes an invalid document,
/// or the output cannot be written.
pub fn convert_json_to_msg<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_json_to_msg_with_progress(source, dest, &|_| {})
}

/// Convert a JSON export back to a .msg file with progress callback
///
/// # Errors
/// Returns an error if the JSON is malformed, describes an invalid document,
/// or the output cannot be written.
pub fn convert_json_to_msg_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: ConvertProgressCallback,
) -> Result<()> {
    tracing::info!(
        "Converting JSON→MSG: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress(&ConvertProgress::with_file(
        ConvertPhase::ReadingSource,
        1,
        3,
        "Reading JSON...",
    ));
    let json = std::fs::read_to_string(&source)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::Parsing,
        2,
        3,
        "Building MSG document...",
    ));
    let document = msg::from_json(&json)?;

    // from_json already serialized the document
    progress(&ConvertProgress::with_file(
        ConvertPhase::WritingOutput,
        3,
        3,
        format!("Writing {} entries...", document.len()),
    ));
    std::fs::write(&dest, document.data())?;

    progress(&ConvertProgress::new(ConvertPhase::Complete, 3, 3));
    tracing::info!("Conversion complete");
    Ok(())
}
