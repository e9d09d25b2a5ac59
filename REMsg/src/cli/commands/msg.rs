//! CLI commands for single MSG file operations

use std::path::{Path, PathBuf};
use std::time::Instant;

use uuid::Uuid;

use crate::cli::progress::{DISK, DOCUMENT, GEAR, LOOKING_GLASS, print_done, print_step};
use crate::converter::{convert_json_to_msg_with_progress, convert_msg_to_json_with_progress};
use crate::formats::msg::version::{is_encrypted, is_hash_identity};
use crate::formats::msg::{MsgDocument, MsgEntry, read_msg};
use crate::utils::LanguageId;

/// Show header information
pub fn info(path: &Path) -> anyhow::Result<()> {
    let doc = read_msg(path)?;
    let version = doc.version();

    println!("MSG Information: {}", path.display());
    println!();
    println!("Version: {version} ({version:#x})");
    println!("Encrypted pool: {}", yes_no(is_encrypted(version)));
    println!(
        "Entry identity: {}",
        if is_hash_identity(version) {
            "name hash"
        } else {
            "index"
        }
    );
    println!("Entries: {}", doc.len());
    println!("Size: {} bytes", doc.data().len());
    println!();

    println!("Languages ({}):", doc.languages().len());
    for (i, &id) in doc.languages().iter().enumerate() {
        match LanguageId::from_id(id) {
            Some(lang) => println!("  [{i:2}] {lang}"),
            None => println!("  [{i:2}] unknown ({id})"),
        }
    }

    if !doc.attribute_headers().is_empty() {
        println!();
        println!("Attributes ({}):", doc.attribute_headers().len());
        for header in doc.attribute_headers() {
            let name = if header.name.is_empty() {
                "<unnamed>"
            } else {
                header.name.as_str()
            };
            println!("  {name}: {}", header.value_type);
        }
    }

    Ok(())
}

/// List entries with their text in one language
pub fn list(path: &Path, language: LanguageId, limit: Option<usize>) -> anyhow::Result<()> {
    let doc = read_msg(path)?;
    let Some(index) = doc.language_index(language) else {
        anyhow::bail!("{} has no {} text", path.display(), language);
    };

    let limit = limit.unwrap_or(usize::MAX);
    for entry in doc.entries().iter().take(limit) {
        println!("{}", entry.name);
        println!("  {}", truncate_text(entry.content(index).unwrap_or(""), 100));
    }

    if doc.len() > limit {
        println!();
        println!("({} of {} entries shown)", limit, doc.len());
    }

    Ok(())
}

/// Print one entry by name or GUID
pub fn get(path: &Path, key: &str, language: Option<LanguageId>) -> anyhow::Result<()> {
    let doc = read_msg(path)?;

    let entry = key
        .parse::<Uuid>()
        .ok()
        .and_then(|guid| doc.find_entry_by_guid(guid))
        .or_else(|| doc.find_entry(key));
    let Some(entry) = entry else {
        anyhow::bail!("Entry not found: {}", key);
    };

    if let Some(language) = language {
        let Some(index) = doc.language_index(language) else {
            anyhow::bail!("{} has no {} text", path.display(), language);
        };
        println!("{}", entry.content(index).unwrap_or(""));
        return Ok(());
    }

    print_entry(&doc, entry);
    Ok(())
}

fn print_entry(doc: &MsgDocument, entry: &MsgEntry) {
    println!("Name: {}", entry.name);
    println!("GUID: {}", entry.guid);
    println!("CRC: {:#010x}", entry.crc);
    println!("Identity: {}", entry.identity);

    if !entry.attributes.is_empty() {
        println!("Attributes:");
        for (header, value) in doc.attribute_headers().iter().zip(&entry.attributes) {
            println!("  {}: {value}", header.name);
        }
    }

    println!("Contents:");
    for (&id, content) in doc.languages().iter().zip(&entry.contents) {
        if content.is_empty() {
            continue;
        }
        let label = LanguageId::from_id(id).map_or_else(|| id.to_string(), |l| l.to_string());
        println!("  {label}: {}", content.replace('\n', "\\n"));
    }
}

/// Search entry contents
pub fn search(path: &Path, query: &str, case_sensitive: bool, limit: usize) -> anyhow::Result<()> {
    let doc = read_msg(path)?;
    let matches = doc.find_by_text(query, case_sensitive);

    if matches.is_empty() {
        println!("No entries found containing '{query}'");
        return Ok(());
    }

    println!("Found {} entries containing '{}':", matches.len(), query);
    println!();

    let needle = query.to_lowercase();
    for entry in matches.iter().take(limit) {
        let hit = entry
            .contents
            .iter()
            .find(|c| {
                if case_sensitive {
                    c.contains(query)
                } else {
                    c.to_lowercase().contains(&needle)
                }
            })
            .map_or("", String::as_str);
        println!("{}", entry.name);
        println!("  {}", truncate_text(hit, 100));
    }

    if matches.len() > limit {
        println!();
        println!("({} more not shown)", matches.len() - limit);
    }

    Ok(())
}

/// Export a MSG file to JSON
pub fn export(source: &Path, output: &Path, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    convert_msg_to_json_with_progress(source, output, &|progress| {
        if let (false, Some(msg)) = (quiet, &progress.current_file) {
            let emoji = match progress.current {
                1 => LOOKING_GLASS,
                2 => GEAR,
                _ => DISK,
            };
            print_step(progress.current, progress.total, emoji, msg);
        }
    })?;

    if !quiet {
        print_done(start.elapsed());
    }
    Ok(())
}

/// Build a MSG file from JSON
pub fn import(source: &Path, output: &Path, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    convert_json_to_msg_with_progress(source, output, &|progress| {
        if let (false, Some(msg)) = (quiet, &progress.current_file) {
            let emoji = match progress.current {
                1 => DOCUMENT,
                2 => GEAR,
                _ => DISK,
            };
            print_step(progress.current, progress.total, emoji, msg);
        }
    })?;

    if !quiet {
        print_done(start.elapsed());
    }
    Ok(())
}

/// Check that re-serializing each file reproduces it byte for byte
pub fn verify(paths: &[PathBuf]) -> anyhow::Result<()> {
    let mut failures = 0usize;

    for path in paths {
        match verify_file(path) {
            Ok(None) => println!("OK       {}", path.display()),
            Ok(Some(offset)) => {
                failures += 1;
                println!("MISMATCH {} (first difference at byte {offset})", path.display());
            }
            Err(e) => {
                failures += 1;
                println!("ERROR    {}: {e}", path.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed verification", failures, paths.len());
    }
    Ok(())
}

/// First differing byte offset, or `None` when identical
fn verify_file(path: &Path) -> crate::Result<Option<usize>> {
    let doc = read_msg(path)?;
    let written = doc.to_bytes()?;
    let original = doc.data();

    if written == original {
        return Ok(None);
    }
    let offset = written
        .iter()
        .zip(original)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| written.len().min(original.len()));
    Ok(Some(offset))
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Truncate text for display
fn truncate_text(text: &str, max_chars: usize) -> String {
    let text = text.replace('\n', "\\n");
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("line\nbreak", 20), "line\\nbreak");
        assert_eq!(truncate_text("あいうえおかきくけこ", 6), "あいう...");
    }
}
