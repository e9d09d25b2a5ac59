//! MSG to JSON conversion

use crate::converter::{ConvertPhase, ConvertProgress, ConvertProgressCallback};
use crate::error::Result;
use crate::formats::msg;
use std::path::Path;

/// Convert a .msg file to JSON
///
/// # Errors
/// Returns an error if reading, parsing or writing fails.
pub fn convert_msg_to_json<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_msg_to_json_with_progress(source, dest, &|_| {})
}

/// Convert a .msg file to JSON with progress callback
///
/// # Errors
/// Returns an error if reading, parsing or writing fails.
pub fn convert_msg_to_json_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: ConvertProgressCallback,
) -> Result<()> {
    tracing::info!(
        "Converting MSG→JSON: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress(&ConvertProgress::with_file(
        ConvertPhase::ReadingSource,
        1,
        3,
        "Reading MSG binary...",
    ));
    let document = msg::read_msg(&source)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::Converting,
        2,
        3,
        format!("Converting {} entries to JSON...", document.len()),
    ));
    let json = msg::to_json(&document)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::WritingOutput,
        3,
        3,
        "Writing JSON...",
    ));
    std::fs::write(&dest, json)?;

    progress(&ConvertProgress::new(ConvertPhase::Complete, 3, 3));
    tracing::info!("Conversion complete");
    Ok(())
}
