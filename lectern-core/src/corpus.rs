//! Corpus parsing and the in-memory verse index
//!
//! A corpus is a line-oriented text file, one verse per line:
//!
//! ```text
//! Genesis 1:1\tIn the beginning God created the heaven and the earth.
//! ```
//!
//! Parsing produces a flat ordered verse list plus a book index whose
//! chapter counts are the maximum chapter number observed per book, with
//! books kept in first-seen order. Lines that do not match the pattern are
//! skipped and counted so corpus-format regressions show up in tooling
//! instead of vanishing silently.

use crate::error::CorpusError;
use crate::types::{BookInfo, Verse};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Maximum number of search results returned
pub const SEARCH_RESULT_CAP: usize = 100;

/// Pattern for one corpus line: `"<Book> <Chapter>:<Verse>\t<Text>"`
fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+?)\s+(\d+):(\d+)\t+(.*)$").expect("valid line pattern"))
}

/// The parsed text of one version, read-only after construction
#[derive(Debug)]
pub struct Corpus {
    version: String,
    verses: Vec<Verse>,
    books: Vec<BookInfo>,
    skipped_lines: usize,
}

impl Corpus {
    /// Parse a corpus from its raw text
    ///
    /// Malformed lines are dropped but counted; see [`Corpus::skipped_lines`].
    pub fn parse(version: impl Into<String>, input: &str) -> Self {
        let pattern = line_pattern();
        let mut verses = Vec::new();
        let mut books: Vec<BookInfo> = Vec::new();
        let mut book_index: HashMap<String, usize> = HashMap::new();
        let mut skipped_lines = 0;

        for line in input.lines() {
            let Some(captures) = pattern.captures(line) else {
                if !line.trim().is_empty() {
                    skipped_lines += 1;
                }
                continue;
            };

            let book = captures[1].trim().to_string();
            // The pattern guarantees digits; counts beyond u32 are corpus
            // corruption and treated as malformed lines.
            let (Ok(chapter), Ok(verse)) = (captures[2].parse::<u32>(), captures[3].parse::<u32>())
            else {
                skipped_lines += 1;
                continue;
            };
            let text = captures[4].to_string();

            match book_index.get(&book) {
                Some(&idx) => {
                    if chapter > books[idx].chapters {
                        books[idx].chapters = chapter;
                    }
                }
                None => {
                    book_index.insert(book.clone(), books.len());
                    books.push(BookInfo::new(book.clone(), chapter));
                }
            }

            verses.push(Verse::new(book, chapter, verse, text));
        }

        Self {
            version: version.into(),
            verses,
            books,
            skipped_lines,
        }
    }

    /// Load a corpus from a file, deriving nothing from the name: the
    /// caller supplies the version id
    pub fn load(version: impl Into<String>, path: &Path) -> Result<Self, CorpusError> {
        let input = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CorpusError::NotFound(path.display().to_string())
            } else {
                CorpusError::Io(e)
            }
        })?;
        let corpus = Self::parse(version, &input);
        if corpus.verses.is_empty() {
            return Err(CorpusError::Empty(path.display().to_string()));
        }
        Ok(corpus)
    }

    /// The text version this corpus carries, e.g. "KJV"
    pub fn version(&self) -> &str {
        &self.version
    }

    /// All parsed verses in corpus order
    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    /// Books in first-seen order
    pub fn books(&self) -> &[BookInfo] {
        &self.books
    }

    /// Number of lines dropped during parsing
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Position of a book in index order (case-insensitive)
    pub fn book_position(&self, name: &str) -> Option<usize> {
        self.books
            .iter()
            .position(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Look up a book by name (case-insensitive)
    pub fn book(&self, name: &str) -> Option<&BookInfo> {
        self.book_position(name).map(|idx| &self.books[idx])
    }

    /// Whether the index contains the given (book, chapter) pair
    pub fn contains(&self, book: &str, chapter: u32) -> bool {
        self.book(book)
            .is_some_and(|b| chapter >= 1 && chapter <= b.chapters)
    }

    /// Verses of one chapter, in corpus order
    pub fn chapter_verses<'a>(
        &'a self,
        book: &'a str,
        chapter: u32,
    ) -> impl Iterator<Item = &'a Verse> + 'a {
        self.verses
            .iter()
            .filter(move |v| v.chapter == chapter && v.book.eq_ignore_ascii_case(book))
    }

    /// The (book, chapter) following the given one in index order, rolling
    /// to chapter 1 of the next book past a book's last chapter
    pub fn next_location(&self, book: &str, chapter: u32) -> Option<(&str, u32)> {
        let idx = self.book_position(book)?;
        let current = &self.books[idx];
        if chapter < current.chapters {
            Some((current.name.as_str(), chapter + 1))
        } else {
            self.books
                .get(idx + 1)
                .map(|next| (next.name.as_str(), 1))
        }
    }

    /// The (book, chapter) preceding the given one in index order, rolling
    /// to the prior book's last chapter from chapter 1
    pub fn previous_location(&self, book: &str, chapter: u32) -> Option<(&str, u32)> {
        let idx = self.book_position(book)?;
        if chapter > 1 {
            Some((self.books[idx].name.as_str(), chapter - 1))
        } else if idx > 0 {
            let prev = &self.books[idx - 1];
            Some((prev.name.as_str(), prev.chapters))
        } else {
            None
        }
    }

    /// Linear case-insensitive search over verse text, book name and the
    /// formatted reference string
    ///
    /// Results are capped at `limit` (itself capped at
    /// [`SEARCH_RESULT_CAP`]) to bound rendering cost downstream.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Verse> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let limit = limit.min(SEARCH_RESULT_CAP);

        self.verses
            .iter()
            .filter(|v| {
                v.text.to_lowercase().contains(&query)
                    || v.book.to_lowercase().contains(&query)
                    || v.reference().to_string().to_lowercase().contains(&query)
            })
            .take(limit)
            .collect()
    }
}

/// The set of corpora available to the application, keyed by version id
///
/// Versions are discovered from `*.txt` files in a corpus directory; the
/// version id is the uppercased file stem (`kjv.txt` -> `KJV`).
#[derive(Debug, Default)]
pub struct VersionCatalog {
    corpora: HashMap<String, Arc<Corpus>>,
}

impl VersionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.txt` corpus in a directory
    pub fn load_dir(dir: &Path) -> Result<Self, CorpusError> {
        let mut catalog = Self::new();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CorpusError::NotFound(dir.display().to_string())
            } else {
                CorpusError::Io(e)
            }
        })?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let version = stem.to_uppercase();
            match Corpus::load(&version, &path) {
                Ok(corpus) => {
                    tracing::info!(
                        version = %version,
                        verses = corpus.verses().len(),
                        books = corpus.books().len(),
                        skipped = corpus.skipped_lines(),
                        "Loaded corpus"
                    );
                    catalog.insert(corpus);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Skipping corpus: {}", e);
                }
            }
        }

        if catalog.corpora.is_empty() {
            return Err(CorpusError::Empty(dir.display().to_string()));
        }
        Ok(catalog)
    }

    /// Register a corpus (used directly in tests)
    pub fn insert(&mut self, corpus: Corpus) {
        self.corpora
            .insert(corpus.version().to_string(), Arc::new(corpus));
    }

    /// Look up a corpus by version id (case-insensitive)
    pub fn get(&self, version: &str) -> Option<Arc<Corpus>> {
        self.corpora.get(&version.to_uppercase()).cloned()
    }

    /// Available version ids, sorted
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.corpora.keys().map(|k| k.as_str()).collect();
        versions.sort_unstable();
        versions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "Genesis 1:1\tIn the beginning God created the heaven and the earth.\n",
        "Genesis 1:2\tAnd the earth was without form, and void.\n",
        "Genesis 2:1\tThus the heavens and the earth were finished.\n",
        "not a verse line\n",
        "Exodus 1:1\tNow these are the names of the children of Israel.\n",
        "Exodus 1:2\tReuben, Simeon, Levi, and Judah.\n",
    );

    fn sample_corpus() -> Corpus {
        Corpus::parse("KJV", SAMPLE)
    }

    #[test]
    fn test_parse_builds_book_index_in_first_seen_order() {
        let corpus = sample_corpus();
        let books = corpus.books();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0], BookInfo::new("Genesis", 2));
        assert_eq!(books[1], BookInfo::new("Exodus", 1));
        assert_eq!(corpus.verses().len(), 5);
    }

    #[test]
    fn test_chapter_count_is_max_chapter_seen() {
        let corpus = Corpus::parse(
            "KJV",
            "Job 3:1\talpha\nJob 1:1\tbeta\nJob 2:5\tgamma\n",
        );
        assert_eq!(corpus.book("Job").unwrap().chapters, 3);
    }

    #[test]
    fn test_malformed_lines_are_counted_not_silently_dropped() {
        let corpus = sample_corpus();
        assert_eq!(corpus.skipped_lines(), 1);

        // Blank lines are not treated as malformed
        let corpus = Corpus::parse("KJV", "\n\nGenesis 1:1\tText\n\n");
        assert_eq!(corpus.skipped_lines(), 0);
        assert_eq!(corpus.verses().len(), 1);
    }

    #[test]
    fn test_parsed_verse_round_trips_to_reference() {
        let corpus = Corpus::parse("KJV", "1 Samuel 3:4\tAnd the LORD called Samuel.\n");
        let verse = &corpus.verses()[0];
        assert_eq!(verse.book, "1 Samuel");
        assert_eq!(verse.reference().to_string(), "1 Samuel 3:4");
    }

    #[test]
    fn test_chapter_verses_filters_by_book_and_chapter() {
        let corpus = sample_corpus();
        let verses: Vec<_> = corpus.chapter_verses("genesis", 1).collect();
        assert_eq!(verses.len(), 2);
        assert!(verses.iter().all(|v| v.book == "Genesis" && v.chapter == 1));
    }

    #[test]
    fn test_contains_bounds() {
        let corpus = sample_corpus();
        assert!(corpus.contains("Genesis", 1));
        assert!(corpus.contains("Genesis", 2));
        assert!(!corpus.contains("Genesis", 3));
        assert!(!corpus.contains("Genesis", 0));
        assert!(!corpus.contains("Leviticus", 1));
    }

    #[test]
    fn test_next_rolls_over_book_boundary() {
        let corpus = sample_corpus();
        assert_eq!(corpus.next_location("Genesis", 1), Some(("Genesis", 2)));
        assert_eq!(corpus.next_location("Genesis", 2), Some(("Exodus", 1)));
        assert_eq!(corpus.next_location("Exodus", 1), None);
    }

    #[test]
    fn test_previous_rolls_to_prior_books_last_chapter() {
        let corpus = sample_corpus();
        assert_eq!(corpus.previous_location("Exodus", 1), Some(("Genesis", 2)));
        assert_eq!(corpus.previous_location("Genesis", 2), Some(("Genesis", 1)));
        assert_eq!(corpus.previous_location("Genesis", 1), None);
    }

    #[test]
    fn test_search_is_case_insensitive_and_matches_references() {
        let corpus = sample_corpus();

        let by_text = corpus.search("BEGINNING", 100);
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].reference().to_string(), "Genesis 1:1");

        let by_book = corpus.search("exodus", 100);
        assert_eq!(by_book.len(), 2);

        let by_reference = corpus.search("Genesis 2:1", 100);
        assert_eq!(by_reference.len(), 1);
        assert_eq!(by_reference[0].chapter, 2);
    }

    #[test]
    fn test_search_caps_results() {
        let mut input = String::new();
        for v in 1..=250 {
            input.push_str(&format!("Psalms 1:{}\tlove endures\n", v));
        }
        let corpus = Corpus::parse("KJV", &input);
        assert_eq!(corpus.search("love", 500).len(), SEARCH_RESULT_CAP);
        assert_eq!(corpus.search("love", 10).len(), 10);
    }

    #[test]
    fn test_search_blank_query_returns_nothing() {
        let corpus = sample_corpus();
        assert!(corpus.search("   ", 100).is_empty());
    }

    #[test]
    fn test_catalog_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kjv.txt"), SAMPLE).unwrap();
        std::fs::write(dir.path().join("asv.txt"), "Genesis 1:1\tVariant text.\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let catalog = VersionCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.versions(), vec!["ASV", "KJV"]);
        assert!(catalog.get("kjv").is_some());
        assert!(catalog.get("NIV").is_none());
    }

    #[test]
    fn test_catalog_empty_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            VersionCatalog::load_dir(dir.path()),
            Err(CorpusError::Empty(_))
        ));
    }
}
