//! Daily verse selection
//!
//! Picks one verse per calendar day, deterministically: the day ordinal
//! modulo the candidate pool size. The pool is one book's verses when the
//! preferences name a book, the whole corpus otherwise.

use crate::corpus::Corpus;
use crate::types::Verse;
use chrono::{Datelike, NaiveDate};

/// The verse of the day for a given date
///
/// Returns `None` only when the pool is empty (an unknown book name, or an
/// empty corpus).
pub fn daily_verse<'a>(corpus: &'a Corpus, date: NaiveDate, book: Option<&str>) -> Option<&'a Verse> {
    let pool: Vec<&Verse> = match book {
        Some(name) => {
            let name = &corpus.book(name)?.name;
            corpus
                .verses()
                .iter()
                .filter(|v| &v.book == name)
                .collect()
        }
        None => corpus.verses().iter().collect(),
    };
    if pool.is_empty() {
        return None;
    }
    let idx = date.num_days_from_ce().rem_euclid(pool.len() as i32) as usize;
    Some(pool[idx])
}
