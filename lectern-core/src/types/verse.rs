//! Verse and reference types - the smallest addressable units of text

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single verse of scripture
///
/// Immutable once parsed; uniquely identified by (book, chapter, verse)
/// within a text version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verse {
    /// Book name, e.g. "Genesis" or "1 Samuel"
    pub book: String,

    /// Chapter number (1-based)
    pub chapter: u32,

    /// Verse number within the chapter (1-based)
    pub verse: u32,

    /// The verse text
    pub text: String,
}

impl Verse {
    /// Create a new verse
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32, text: impl Into<String>) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
            text: text.into(),
        }
    }

    /// The formatted reference for this verse
    pub fn reference(&self) -> VerseRef {
        VerseRef {
            book: self.book.clone(),
            chapter: self.chapter,
            verse: self.verse,
        }
    }
}

/// A verse reference, formatted as `"<Book> <Chapter>:<Verse>"`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VerseRef {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseRef {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

impl FromStr for VerseRef {
    type Err = String;

    /// Parse a formatted reference. Book names may contain spaces
    /// ("1 Samuel 3:4"), so the chapter:verse pair is taken from the
    /// last whitespace-separated token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (book, locator) = s
            .trim()
            .rsplit_once(' ')
            .ok_or_else(|| format!("Not a verse reference: {}", s))?;
        let (chapter, verse) = locator
            .split_once(':')
            .ok_or_else(|| format!("Missing chapter:verse in reference: {}", s))?;
        let chapter: u32 = chapter
            .parse()
            .map_err(|_| format!("Invalid chapter in reference: {}", s))?;
        let verse: u32 = verse
            .parse()
            .map_err(|_| format!("Invalid verse in reference: {}", s))?;
        if book.is_empty() {
            return Err(format!("Empty book name in reference: {}", s));
        }
        Ok(Self::new(book, chapter, verse))
    }
}
