//! Info command implementation

use anyhow::Result;
use serde::Serialize;

/// Per-book summary output
#[derive(Serialize)]
struct BookSummary {
    name: String,
    chapters: u32,
}

/// Corpus info output
#[derive(Serialize)]
struct CorpusInfo {
    version: String,
    books: Vec<BookSummary>,
    verses: usize,
    skipped_lines: usize,
}

/// Display information about a corpus file
pub fn info(input: &str, json: bool) -> Result<()> {
    let corpus = super::load_corpus(input)?;

    let info = CorpusInfo {
        version: corpus.version().to_string(),
        books: corpus
            .books()
            .iter()
            .map(|b| BookSummary {
                name: b.name.clone(),
                chapters: b.chapters,
            })
            .collect(),
        verses: corpus.verses().len(),
        skipped_lines: corpus.skipped_lines(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Version: {}", info.version);
        println!("Books:   {}", info.books.len());
        println!("Verses:  {}", info.verses);
        if info.skipped_lines > 0 {
            println!("Skipped: {} unparseable lines", info.skipped_lines);
        }
        for book in &info.books {
            println!("  {} ({} chapters)", book.name, book.chapters);
        }
    }

    Ok(())
}
