//! CLI command for batch MSG export

use std::path::Path;
use std::time::Instant;

use indicatif::ProgressBar;

use crate::cli::progress::{LOOKING_GLASS, TRUCK, bar_style, print_done, print_step};
use crate::converter::{batch_msg_to_json, find_msg_files};

/// Export every MSG file under `source` to JSON under `dest`
pub fn batch_export(source: &Path, dest: &Path) -> anyhow::Result<()> {
    let start = Instant::now();

    print_step(1, 2, LOOKING_GLASS, "Scanning for MSG files...");
    let files = find_msg_files(source);

    if files.is_empty() {
        println!("No MSG files found in: {}", source.display());
        return Ok(());
    }

    print_step(2, 2, TRUCK, &format!("Exporting {} MSG files...", files.len()));

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(bar_style());

    let result = batch_msg_to_json(&files, source, dest, |progress| {
        pb.set_position(progress.current as u64);
        if let Some(ref name) = progress.current_file {
            pb.set_message(name.clone());
        }
    });

    pb.finish_and_clear();

    println!();
    println!("Export complete:");
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);

    if result.fail_count > 0 {
        println!();
        println!("Failures:");
        for msg in result.results.iter().filter(|m| m.starts_with("Failed")) {
            println!("  {msg}");
        }
    }

    print_done(start.elapsed());
    Ok(())
}
