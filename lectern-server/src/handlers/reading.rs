//! Reading handlers: versions, chapters, search, daily verse

use crate::session::MaybeUser;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use lectern_core::daily::daily_verse;
use lectern_core::types::{AnnotationKind, Verse};
use lectern_core::SEARCH_RESULT_CAP;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Available text versions
#[derive(Debug, Serialize)]
pub struct VersionsResponse {
    pub versions: Vec<String>,
}

/// List loaded text versions
pub async fn list_versions(State(state): State<AppState>) -> Json<VersionsResponse> {
    Json(VersionsResponse {
        versions: state
            .catalog
            .versions()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

#[derive(Debug, Serialize)]
pub struct VerseBody {
    pub verse: u32,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct LocationBody {
    pub book: String,
    pub chapter: u32,
}

/// One chapter plus everything the reading view needs: the user's
/// annotation sets and the adjacent locations
#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub version: String,
    pub book: String,
    pub chapter: u32,
    pub verses: Vec<VerseBody>,
    pub highlights: BTreeSet<u32>,
    pub bookmarks: BTreeSet<u32>,
    pub previous: Option<LocationBody>,
    pub next: Option<LocationBody>,
}

/// Fetch one chapter
///
/// Anonymous requests get empty annotation sets; so do signed-in requests
/// when the store misbehaves, which is logged rather than failing the read.
pub async fn read_chapter(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path((version, book, chapter)): Path<(String, String, u32)>,
) -> Result<Json<ChapterResponse>, (StatusCode, String)> {
    let corpus = state.corpus(&version).ok_or((
        StatusCode::NOT_FOUND,
        format!("Unknown text version: {}", version),
    ))?;
    if !corpus.contains(&book, chapter) {
        return Err((
            StatusCode::NOT_FOUND,
            format!("No such chapter: {} {}", book, chapter),
        ));
    }
    // Canonical casing from the index
    let book = corpus
        .book(&book)
        .map(|b| b.name.clone())
        .unwrap_or(book);

    let verses: Vec<VerseBody> = corpus
        .chapter_verses(&book, chapter)
        .map(|v| VerseBody {
            verse: v.verse,
            text: v.text.clone(),
        })
        .collect();

    let (highlights, bookmarks) = match &user {
        Some(user) => {
            let highlights = annotation_set(
                &state,
                &user.uid,
                AnnotationKind::Highlight,
                corpus.version(),
                &book,
                chapter,
            )
            .await;
            let bookmarks = annotation_set(
                &state,
                &user.uid,
                AnnotationKind::Bookmark,
                corpus.version(),
                &book,
                chapter,
            )
            .await;
            (highlights, bookmarks)
        }
        None => (BTreeSet::new(), BTreeSet::new()),
    };

    let previous = corpus
        .previous_location(&book, chapter)
        .map(|(b, c)| LocationBody {
            book: b.to_string(),
            chapter: c,
        });
    let next = corpus.next_location(&book, chapter).map(|(b, c)| LocationBody {
        book: b.to_string(),
        chapter: c,
    });

    Ok(Json(ChapterResponse {
        version: corpus.version().to_string(),
        book,
        chapter,
        verses,
        highlights,
        bookmarks,
        previous,
        next,
    }))
}

/// Annotation lookup with the fall-back-to-empty policy for store failures
async fn annotation_set(
    state: &AppState,
    uid: &str,
    kind: AnnotationKind,
    version: &str,
    book: &str,
    chapter: u32,
) -> BTreeSet<u32> {
    match state
        .annotations
        .chapter_annotations(uid, kind, version, book, chapter)
        .await
    {
        Ok(set) => set,
        Err(e) => {
            tracing::warn!(uid, kind = kind.as_str(), "Annotation fetch failed: {}", e);
            BTreeSet::new()
        }
    }
}

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,

    /// Result cap; clamped to the corpus-wide maximum
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    SEARCH_RESULT_CAP
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    pub reference: String,
}

impl From<&Verse> for SearchHit {
    fn from(v: &Verse) -> Self {
        Self {
            book: v.book.clone(),
            chapter: v.chapter,
            verse: v.verse,
            text: v.text.clone(),
            reference: v.reference().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    pub total: usize,
}

/// Search a version's corpus
pub async fn search_corpus(
    State(state): State<AppState>,
    Path(version): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let corpus = state.corpus(&version).ok_or((
        StatusCode::NOT_FOUND,
        format!("Unknown text version: {}", version),
    ))?;

    let hits: Vec<SearchHit> = corpus
        .search(&query.q, query.limit)
        .into_iter()
        .map(SearchHit::from)
        .collect();
    let total = hits.len();

    Ok(Json(SearchResponse { hits, total }))
}

/// Query parameters for the daily verse
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    #[serde(default = "default_daily_version")]
    pub version: String,

    /// Restrict the pool to one book
    pub book: Option<String>,
}

fn default_daily_version() -> String {
    "KJV".to_string()
}

#[derive(Debug, Serialize)]
pub struct DailyResponse {
    pub version: String,
    pub reference: String,
    pub text: String,
}

/// The verse of the day
pub async fn daily(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailyResponse>, (StatusCode, String)> {
    let corpus = state.corpus(&query.version).ok_or((
        StatusCode::NOT_FOUND,
        format!("Unknown text version: {}", query.version),
    ))?;

    let today = chrono::Utc::now().date_naive();
    let verse = daily_verse(&corpus, today, query.book.as_deref()).ok_or((
        StatusCode::NOT_FOUND,
        "No verses available for the daily selection".to_string(),
    ))?;

    Ok(Json(DailyResponse {
        version: corpus.version().to_string(),
        reference: verse.reference().to_string(),
        text: verse.text.clone(),
    }))
}
