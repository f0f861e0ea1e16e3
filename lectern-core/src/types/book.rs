//! Book index entries derived during corpus parsing

use serde::{Deserialize, Serialize};

/// A book of the corpus and its chapter count
///
/// The chapter count is the maximum chapter number observed for the book
/// during parsing; books are indexed in first-seen corpus order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookInfo {
    /// Book name as it appears in the corpus
    pub name: String,

    /// Number of chapters in the book
    pub chapters: u32,
}

impl BookInfo {
    pub fn new(name: impl Into<String>, chapters: u32) -> Self {
        Self {
            name: name.into(),
            chapters,
        }
    }
}
