//! Read command implementation

use anyhow::{bail, Result};
use lectern_core::ReaderSession;
use std::sync::Arc;

/// Print a chapter from a corpus
pub fn read(input: &str, book: Option<&str>, chapter: u32, verse: Option<u32>) -> Result<()> {
    let corpus = Arc::new(super::load_corpus(input)?);

    let mut session = ReaderSession::new(corpus.clone());
    session.finish_load(session.generation());

    // No book named means the first book, but the chapter still applies
    let book = book.map(str::to_string).unwrap_or_else(|| session.book().to_string());
    if session.jump_to(&book, chapter, verse).is_none() {
        bail!("{} has no chapter {} {}", corpus.version(), book, chapter);
    }
    session.finish_load(session.generation());

    let location = session.location();
    let marked = session.take_scroll_target();

    println!("{} {} {}", corpus.version(), location.book, location.chapter);
    for v in corpus.chapter_verses(&location.book, location.chapter) {
        let marker = if marked == Some(v.verse) { ">" } else { " " };
        println!("{} {:>3}  {}", marker, v.verse, v.text);
    }

    if let Some((book, chapter)) = corpus.previous_location(&location.book, location.chapter) {
        tracing::debug!("previous: {} {}", book, chapter);
    }
    if let Some((book, chapter)) = corpus.next_location(&location.book, location.chapter) {
        println!("(next: {} {})", book, chapter);
    }

    Ok(())
}
