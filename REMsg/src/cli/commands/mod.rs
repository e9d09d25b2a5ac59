use clap::Subcommand;
use std::path::PathBuf;

use crate::utils::LanguageId;

pub mod batch;
pub mod execute;
pub mod msg;

#[derive(Subcommand)]
pub enum Commands {
    /// Show header information of a MSG file
    Info {
        /// MSG file
        file: PathBuf,
    },

    /// List entries of a MSG file
    List {
        /// MSG file
        file: PathBuf,

        /// Language to show (name or id)
        #[arg(short, long, default_value = "English")]
        language: LanguageId,

        /// Maximum number of entries to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show one entry by name or GUID
    Get {
        /// MSG file
        file: PathBuf,

        /// Entry name or GUID
        key: String,

        /// Only print this language (name or id)
        #[arg(short, long)]
        language: Option<LanguageId>,
    },

    /// Search entry contents
    Search {
        /// MSG file
        file: PathBuf,

        /// Text to look for
        query: String,

        /// Match case exactly
        #[arg(short, long)]
        case_sensitive: bool,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },

    /// Export a MSG file to JSON
    Export {
        /// Source MSG file
        source: PathBuf,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Suppress step output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Build a MSG file from JSON
    Import {
        /// Source JSON file
        source: PathBuf,

        /// Output MSG file
        #[arg(short, long)]
        output: PathBuf,

        /// Suppress step output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Re-serialize a MSG file and compare with the original bytes
    Verify {
        /// MSG file(s)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Export every MSG file under a directory to JSON
    BatchExport {
        /// Source directory
        #[arg(short, long)]
        source: PathBuf,

        /// Output directory
        #[arg(short, long)]
        destination: PathBuf,
    },
}
