//! CLI progress display utilities
//!
//! Step indicators with emojis for single conversions and a progress bar for
//! batch exports.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressStyle};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Gear - for processing/conversion operations
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Truck - for batch operations
pub static TRUCK: Emoji<'_, '_> = Emoji("🚚 ", "");
/// Document - for file operations
pub static DOCUMENT: Emoji<'_, '_> = Emoji("📄 ", "");

/// Print a step indicator: `[1/3] 🔍 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Progress bar style for batch exports
///
/// Format: `sys.msg.22 [████████░░░░░░░░] 50/100 (50%)`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
        .expect("valid template")
        .progress_chars("##-")
}
