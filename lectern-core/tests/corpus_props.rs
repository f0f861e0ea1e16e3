//! Property tests for corpus parsing
//!
//! The central parsing property: any well-formed corpus line yields a verse
//! whose (book, chapter, verse) round-trips through the formatted reference
//! string.

use lectern_core::{Corpus, VerseRef};
use proptest::prelude::*;

/// Book names as they appear in real corpora: words separated by single
/// spaces, possibly led by an ordinal ("1 Samuel")
fn book_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{2,10}",
        "[1-3] [A-Z][a-z]{2,10}",
        "[A-Z][a-z]{2,8} of [A-Z][a-z]{2,8}",
    ]
}

/// Verse text without tabs or newlines (those delimit the line format)
fn verse_text() -> impl Strategy<Value = String> {
    "[ -~]{1,80}".prop_map(|s| s.replace('\t', " "))
}

proptest! {
    #[test]
    fn parsed_verse_round_trips_to_reference(
        book in book_name(),
        chapter in 1u32..150,
        verse in 1u32..176,
        text in verse_text(),
    ) {
        let line = format!("{} {}:{}\t{}", book, chapter, verse, text);
        let corpus = Corpus::parse("KJV", &line);

        prop_assert_eq!(corpus.skipped_lines(), 0);
        prop_assert_eq!(corpus.verses().len(), 1);

        let parsed = &corpus.verses()[0];
        prop_assert_eq!(&parsed.book, &book);
        prop_assert_eq!(parsed.chapter, chapter);
        prop_assert_eq!(parsed.verse, verse);
        prop_assert_eq!(&parsed.text, &text);

        // Format the reference and parse it back
        let formatted = parsed.reference().to_string();
        prop_assert_eq!(formatted.clone(), format!("{} {}:{}", book, chapter, verse));
        let reparsed: VerseRef = formatted.parse().unwrap();
        prop_assert_eq!(reparsed, parsed.reference());
    }

    #[test]
    fn chapter_count_is_max_of_observed_chapters(
        chapters in proptest::collection::vec(1u32..120, 1..40),
    ) {
        let mut input = String::new();
        for (i, chapter) in chapters.iter().enumerate() {
            input.push_str(&format!("Psalms {}:{}\ttext\n", chapter, i + 1));
        }
        let corpus = Corpus::parse("KJV", &input);
        let max = chapters.iter().copied().max().unwrap();
        prop_assert_eq!(corpus.book("Psalms").unwrap().chapters, max);
    }

    #[test]
    fn lines_without_tab_are_counted_as_skipped(
        book in book_name(),
        chapter in 1u32..150,
        verse in 1u32..176,
    ) {
        // Same shape but missing the tab separator
        let line = format!("{} {}:{} some text", book, chapter, verse);
        let corpus = Corpus::parse("KJV", &line);
        prop_assert_eq!(corpus.verses().len(), 0);
        prop_assert_eq!(corpus.skipped_lines(), 1);
    }
}
