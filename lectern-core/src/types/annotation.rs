//! Annotation records - highlights and bookmarks tied to verses

use crate::types::VerseRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of an annotation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Highlight,
    Bookmark,
}

impl AnnotationKind {
    /// Prefix used in composite document ids
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Highlight => "highlight",
            AnnotationKind::Bookmark => "bookmark",
        }
    }

    /// Name of the per-user collection holding this kind
    pub fn collection(&self) -> &'static str {
        match self {
            AnnotationKind::Highlight => "highlights",
            AnnotationKind::Bookmark => "bookmarks",
        }
    }
}

/// A highlight or bookmark record
///
/// Presence of the record in the store means the flag is set for the verse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    /// Text version the annotation was made against, e.g. "KJV"
    pub version: String,

    /// Book name
    pub book: String,

    /// Chapter number
    pub chapter: u32,

    /// Verse number
    pub verse: u32,

    /// Verse text at annotation time (bookmarks carry it for list views)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// When the annotation was created
    pub created_at: DateTime<Utc>,
}

impl Annotation {
    /// Create an annotation stamped with the current time
    pub fn new(version: impl Into<String>, book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            version: version.into(),
            book: book.into(),
            chapter,
            verse,
            text: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the verse text (used by bookmarks)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Composite document id scoping the record by kind, version, book,
    /// chapter and verse
    pub fn doc_id(&self, kind: AnnotationKind) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            kind.as_str(),
            self.version,
            self.book,
            self.chapter,
            self.verse
        )
    }

    /// The formatted reference for the annotated verse
    pub fn reference(&self) -> VerseRef {
        VerseRef::new(self.book.clone(), self.chapter, self.verse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_is_scoped_by_kind_and_location() {
        let annotation = Annotation::new("KJV", "Genesis", 1, 3);
        assert_eq!(
            annotation.doc_id(AnnotationKind::Highlight),
            "highlight_KJV_Genesis_1_3"
        );
        assert_eq!(
            annotation.doc_id(AnnotationKind::Bookmark),
            "bookmark_KJV_Genesis_1_3"
        );
    }
}
