//! Validate command implementation

use anyhow::{bail, Result};

/// Validate a corpus file
pub fn validate(input: &str, strict: bool) -> Result<()> {
    let corpus = super::load_corpus(input)?;

    println!("Valid corpus: {}", corpus.version());
    println!("  Books:  {}", corpus.books().len());
    println!("  Verses: {}", corpus.verses().len());

    let skipped = corpus.skipped_lines();
    if skipped > 0 {
        eprintln!("Warning: {} lines could not be parsed", skipped);
        if strict {
            bail!("Validation failed for {}: {} unparseable lines", input, skipped);
        }
    }

    Ok(())
}
