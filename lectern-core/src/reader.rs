//! Reader navigation state machine
//!
//! A `ReaderSession` owns the (book, chapter) the reader is on and mediates
//! every move through the corpus index, so navigation can never settle on a
//! location the index does not contain. Loads are two-phase: a navigation
//! request flips the loading flag and hands back a generation token; the
//! caller resolves whatever per-chapter data it needs (annotations, for one)
//! and reports back with the token. Completions carrying a stale token are
//! discarded, which closes the race where a superseded navigation's fetch
//! lands after a newer one.

use crate::corpus::Corpus;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Direction of the last navigation, used by presentation layers to pick a
/// transition; it has no bearing on correctness
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    Forward,
    Backward,
    Jump,
}

/// A (book, chapter) pair drawn from the index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub book: String,
    pub chapter: u32,
}

/// Monotonic token identifying one load; completions with an older token
/// than the session's current one are ignored
pub type Generation = u64;

/// Navigation state for one reader
pub struct ReaderSession {
    corpus: Arc<Corpus>,
    book: String,
    chapter: u32,
    direction: NavDirection,
    scroll_target: Option<u32>,
    loading: bool,
    generation: Generation,
}

impl ReaderSession {
    /// Start a session at chapter 1 of the corpus's first book
    ///
    /// The initial position counts as a pending load: callers resolve it
    /// with [`ReaderSession::finish_load`] like any other navigation.
    pub fn new(corpus: Arc<Corpus>) -> Self {
        let book = corpus
            .books()
            .first()
            .map(|b| b.name.clone())
            .unwrap_or_default();
        Self {
            corpus,
            book,
            chapter: 1,
            direction: NavDirection::Jump,
            scroll_target: None,
            loading: true,
            generation: 1,
        }
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn location(&self) -> Location {
        Location {
            book: self.book.clone(),
            chapter: self.chapter,
        }
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn direction(&self) -> NavDirection {
        self.direction
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Advance one chapter, rolling over to the next book's chapter 1
    ///
    /// Returns the new load's generation, or `None` when a load is already
    /// pending or the session is at the final chapter of the final book.
    pub fn next_chapter(&mut self) -> Option<Generation> {
        if self.loading {
            return None;
        }
        let (book, chapter) = self.corpus.next_location(&self.book, self.chapter)?;
        let book = book.to_string();
        Some(self.begin_load(book, chapter, NavDirection::Forward, None))
    }

    /// Step back one chapter, rolling over to the prior book's last chapter
    pub fn previous_chapter(&mut self) -> Option<Generation> {
        if self.loading {
            return None;
        }
        let (book, chapter) = self.corpus.previous_location(&self.book, self.chapter)?;
        let book = book.to_string();
        Some(self.begin_load(book, chapter, NavDirection::Backward, None))
    }

    /// Jump directly to a (book, chapter), optionally targeting a verse to
    /// scroll into view once
    ///
    /// Returns `None` when a load is pending or the pair is absent from the
    /// index.
    pub fn jump_to(&mut self, book: &str, chapter: u32, target_verse: Option<u32>) -> Option<Generation> {
        if self.loading || !self.corpus.contains(book, chapter) {
            return None;
        }
        // Use the index's casing for the book name, not the caller's
        let book = self.corpus.book(book)?.name.clone();
        Some(self.begin_load(book, chapter, NavDirection::Jump, target_verse))
    }

    /// Swap the corpus (a version change), re-entering the current location
    /// when the new index has it and falling back to the first book
    /// otherwise
    pub fn set_corpus(&mut self, corpus: Arc<Corpus>) -> Generation {
        if !corpus.contains(&self.book, self.chapter) {
            self.book = corpus
                .books()
                .first()
                .map(|b| b.name.clone())
                .unwrap_or_default();
            self.chapter = 1;
        }
        self.corpus = corpus;
        let book = self.book.clone();
        let chapter = self.chapter;
        self.begin_load(book, chapter, NavDirection::Jump, None)
    }

    fn begin_load(
        &mut self,
        book: String,
        chapter: u32,
        direction: NavDirection,
        target_verse: Option<u32>,
    ) -> Generation {
        self.book = book;
        self.chapter = chapter;
        self.direction = direction;
        self.scroll_target = target_verse;
        self.loading = true;
        self.generation += 1;
        self.generation
    }

    /// Report a load's completion; returns whether the result was accepted.
    /// A stale generation leaves the session untouched.
    pub fn finish_load(&mut self, generation: Generation) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }

    /// Take the one-shot scroll target, clearing it
    pub fn take_scroll_target(&mut self) -> Option<u32> {
        self.scroll_target.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;

    /// Two-book corpus: Genesis has 2 chapters, Exodus has 1
    fn corpus() -> Arc<Corpus> {
        Arc::new(Corpus::parse(
            "KJV",
            concat!(
                "Genesis 1:1\talpha\n",
                "Genesis 2:1\tbeta\n",
                "Exodus 1:1\tgamma\n",
            ),
        ))
    }

    fn settled_session() -> ReaderSession {
        let mut session = ReaderSession::new(corpus());
        let generation = session.generation();
        assert!(session.finish_load(generation));
        session
    }

    #[test]
    fn test_session_starts_at_first_book_chapter_one() {
        let session = ReaderSession::new(corpus());
        assert_eq!(session.book(), "Genesis");
        assert_eq!(session.chapter(), 1);
        assert!(session.is_loading());
    }

    #[test]
    fn test_next_rolls_into_following_book() {
        let mut session = settled_session();

        let generation = session.next_chapter().unwrap();
        assert!(session.finish_load(generation));
        assert_eq!((session.book(), session.chapter()), ("Genesis", 2));
        assert_eq!(session.direction(), NavDirection::Forward);

        let generation = session.next_chapter().unwrap();
        assert!(session.finish_load(generation));
        assert_eq!((session.book(), session.chapter()), ("Exodus", 1));
    }

    #[test]
    fn test_next_at_corpus_end_is_a_no_op() {
        let mut session = settled_session();
        let generation = session.jump_to("Exodus", 1, None).unwrap();
        session.finish_load(generation);

        assert!(session.next_chapter().is_none());
        assert_eq!((session.book(), session.chapter()), ("Exodus", 1));
    }

    #[test]
    fn test_previous_rolls_to_prior_books_last_chapter() {
        let mut session = settled_session();
        let generation = session.jump_to("Exodus", 1, None).unwrap();
        session.finish_load(generation);

        let generation = session.previous_chapter().unwrap();
        assert!(session.finish_load(generation));
        assert_eq!((session.book(), session.chapter()), ("Genesis", 2));
        assert_eq!(session.direction(), NavDirection::Backward);
    }

    #[test]
    fn test_previous_at_corpus_start_is_a_no_op() {
        let mut session = settled_session();
        assert!(session.previous_chapter().is_none());
    }

    #[test]
    fn test_navigation_ignored_while_loading() {
        let mut session = settled_session();
        session.next_chapter().unwrap();
        assert!(session.is_loading());

        assert!(session.next_chapter().is_none());
        assert!(session.previous_chapter().is_none());
        assert!(session.jump_to("Exodus", 1, None).is_none());
    }

    #[test]
    fn test_jump_to_absent_location_is_rejected() {
        let mut session = settled_session();
        assert!(session.jump_to("Genesis", 3, None).is_none());
        assert!(session.jump_to("Leviticus", 1, None).is_none());
        assert_eq!((session.book(), session.chapter()), ("Genesis", 1));
    }

    #[test]
    fn test_jump_normalizes_book_casing() {
        let mut session = settled_session();
        let generation = session.jump_to("exodus", 1, None).unwrap();
        session.finish_load(generation);
        assert_eq!(session.book(), "Exodus");
    }

    #[test]
    fn test_scroll_target_is_one_shot() {
        let mut session = settled_session();
        let generation = session.jump_to("Genesis", 2, Some(1)).unwrap();
        session.finish_load(generation);

        assert_eq!(session.take_scroll_target(), Some(1));
        assert_eq!(session.take_scroll_target(), None);
    }

    #[test]
    fn test_stale_generation_completion_is_discarded() {
        let mut session = settled_session();
        let stale = session.next_chapter().unwrap();
        session.finish_load(stale);

        // A newer navigation supersedes the stale fetch
        let fresh = session.next_chapter().unwrap();
        assert!(!session.finish_load(stale));
        assert!(session.is_loading());

        assert!(session.finish_load(fresh));
        assert!(!session.is_loading());
        assert_eq!((session.book(), session.chapter()), ("Exodus", 1));
    }

    #[test]
    fn test_set_corpus_keeps_location_when_present() {
        let mut session = settled_session();
        let generation = session.jump_to("Genesis", 2, None).unwrap();
        session.finish_load(generation);

        let generation = session.set_corpus(corpus());
        session.finish_load(generation);
        assert_eq!((session.book(), session.chapter()), ("Genesis", 2));
    }

    #[test]
    fn test_set_corpus_falls_back_when_location_absent() {
        let mut session = settled_session();
        let generation = session.jump_to("Exodus", 1, None).unwrap();
        session.finish_load(generation);

        let single_book = Arc::new(Corpus::parse("ASV", "Genesis 1:1\talpha\n"));
        let generation = session.set_corpus(single_book);
        session.finish_load(generation);
        assert_eq!((session.book(), session.chapter()), ("Genesis", 1));
    }
}
