//! Batch MSG conversion
//!
//! Discovers versioned `.msg.<N>` files under a directory and exports them to
//! JSON in parallel, mirroring the source directory structure.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use rayon::prelude::*;
use walkdir::WalkDir;

use super::{ConvertPhase, ConvertProgress, convert_msg_to_json};

/// Result of a batch conversion
#[derive(Debug, Clone)]
pub struct BatchConvertResult {
    /// Number of successful conversions
    pub success_count: usize,
    /// Number of failed conversions
    pub fail_count: usize,
    /// Messages for each file processed
    pub results: Vec<String>,
}

/// Whether a file name looks like `name.msg.<version>`
#[must_use]
pub fn is_msg_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let lower = name.to_ascii_lowercase();
    lower.rfind(".msg.").is_some_and(|pos| {
        let suffix = &lower[pos + ".msg.".len()..];
        !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit())
    })
}

/// Find all versioned .msg files in a directory recursively
///
/// # Returns
/// A sorted list of paths to `.msg.<N>` files found in the directory tree.
pub fn find_msg_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut msg_files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.path().is_file() && is_msg_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();

    msg_files.sort();
    msg_files
}

/// Batch convert MSG files to JSON in parallel
///
/// Each file is written to `dest_base`, under the same relative directory it
/// had below `source_base`, with `.json` appended to its file name.
///
/// # Arguments
/// * `msg_files` - List of MSG files to convert
/// * `source_base` - Base directory of the source (for calculating relative paths)
/// * `dest_base` - Destination directory for JSON files
/// * `progress` - Callback for progress updates
pub fn batch_msg_to_json<F>(
    msg_files: &[PathBuf],
    source_base: &Path,
    dest_base: &Path,
    progress: F,
) -> BatchConvertResult
where
    F: Fn(&ConvertProgress) + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = msg_files.len();

    let results: Vec<String> = msg_files
        .par_iter()
        .map(|msg_path| {
            let relative_path = msg_path
                .strip_prefix(source_base)
                .unwrap_or(msg_path.as_path());
            let display_path = relative_path.to_string_lossy();

            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&ConvertProgress::with_file(
                ConvertPhase::Converting,
                current,
                total,
                display_path.to_string(),
            ));

            let mut file_name = relative_path
                .file_name()
                .unwrap_or_default()
                .to_os_string();
            file_name.push(".json");
            let json_dest = dest_base
                .join(relative_path.parent().unwrap_or(Path::new("")))
                .join(file_name);

            if let Some(parent) = json_dest.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    return format!("Failed to create folder for {display_path}: {e}");
                }
            }

            match convert_msg_to_json(msg_path.as_path(), json_dest.as_path()) {
                Ok(()) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Converted: {display_path}")
                }
                Err(e) => {
                    tracing::warn!("Failed to convert {display_path}: {e}");
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Failed {display_path}: {e}")
                }
            }
        })
        .collect();

    BatchConvertResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}
