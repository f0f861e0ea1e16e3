//! Daily verse command implementation

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use lectern_core::daily::daily_verse;

/// Print the verse of the day
pub fn daily(input: &str, date: Option<&str>, book: Option<&str>) -> Result<()> {
    let corpus = super::load_corpus(input)?;

    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date: {} (expected YYYY-MM-DD)", s))?,
        None => Local::now().date_naive(),
    };

    let Some(verse) = daily_verse(&corpus, date, book) else {
        match book {
            Some(book) => bail!("{} has no book named {}", corpus.version(), book),
            None => bail!("Corpus is empty"),
        }
    };

    println!("{} {}:{} ({})", verse.book, verse.chapter, verse.verse, corpus.version());
    println!("{}", verse.text);

    Ok(())
}
