//! Command execution implementations

use super::Commands;
use super::{batch, msg};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Info { file } => msg::info(file),
            Commands::List {
                file,
                language,
                limit,
            } => msg::list(file, *language, *limit),
            Commands::Get {
                file,
                key,
                language,
            } => msg::get(file, key, *language),
            Commands::Search {
                file,
                query,
                case_sensitive,
                limit,
            } => msg::search(file, query, *case_sensitive, *limit),
            Commands::Export {
                source,
                output,
                quiet,
            } => msg::export(source, output, *quiet),
            Commands::Import {
                source,
                output,
                quiet,
            } => msg::import(source, output, *quiet),
            Commands::Verify { files } => msg::verify(files),
            Commands::BatchExport {
                source,
                destination,
            } => batch::batch_export(source, destination),
        }
    }
}
