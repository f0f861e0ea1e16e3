//! CLI command implementations

mod daily;
mod info;
mod read;
mod search;
mod validate;

pub use daily::daily;
pub use info::info;
pub use read::read;
pub use search::search;
pub use validate::validate;

use anyhow::{Context, Result};
use lectern_core::corpus::Corpus;
use std::path::Path;

/// Load a corpus from a file, deriving the version name from the file stem
pub(crate) fn load_corpus(input: &str) -> Result<Corpus> {
    let path = Path::new(input);
    let version = path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Could not determine version name from file name")?
        .to_uppercase();

    Corpus::load(&version, path).with_context(|| format!("Failed to load corpus: {}", input))
}
