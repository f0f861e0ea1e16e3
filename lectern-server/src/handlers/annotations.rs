//! Annotation handlers: toggle and bookmark listing

use crate::session::AuthSession;
use crate::state::{AppState, ServerEvent};
use axum::{extract::State, http::StatusCode, Json};
use lectern_core::types::{Annotation, AnnotationKind};
use serde::{Deserialize, Serialize};

/// Request body for toggling an annotation
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub kind: AnnotationKind,
    pub version: String,
    pub book: String,
    pub chapter: u32,
    pub verse: u32,

    /// Verse text to carry on the record (bookmarks show it in lists)
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// Whether the annotation is set after the toggle
    pub set: bool,
}

/// Toggle a highlight or bookmark on one verse
pub async fn toggle_annotation(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, (StatusCode, String)> {
    let corpus = state.corpus(&request.version).ok_or((
        StatusCode::NOT_FOUND,
        format!("Unknown text version: {}", request.version),
    ))?;
    if !corpus.contains(&request.book, request.chapter) {
        return Err((
            StatusCode::NOT_FOUND,
            format!("No such chapter: {} {}", request.book, request.chapter),
        ));
    }

    // Canonical book casing so composite doc ids stay consistent
    let book = corpus
        .book(&request.book)
        .map(|b| b.name.clone())
        .unwrap_or(request.book);

    let mut annotation = Annotation::new(
        corpus.version(),
        book,
        request.chapter,
        request.verse,
    );
    if let Some(text) = request.text {
        annotation = annotation.with_text(text);
    }
    let reference = annotation.reference().to_string();

    let set = state
        .annotations
        .toggle(&user.uid, request.kind, annotation)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    state.broadcast(ServerEvent::AnnotationToggled {
        uid: user.uid,
        kind: request.kind.as_str().to_string(),
        reference,
        set,
    });

    Ok(Json(ToggleResponse { set }))
}

#[derive(Debug, Serialize)]
pub struct BookmarkBody {
    pub version: String,
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub reference: String,
    pub text: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct BookmarksResponse {
    pub bookmarks: Vec<BookmarkBody>,
}

/// All of the user's bookmarks, newest first
pub async fn list_bookmarks(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
) -> Result<Json<BookmarksResponse>, (StatusCode, String)> {
    let bookmarks = state
        .annotations
        .all_bookmarks(&user.uid)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let bookmarks = bookmarks
        .into_iter()
        .map(|b| BookmarkBody {
            reference: b.reference().to_string(),
            version: b.version,
            book: b.book,
            chapter: b.chapter,
            verse: b.verse,
            text: b.text,
            created_at: b.created_at,
        })
        .collect();

    Ok(Json(BookmarksResponse { bookmarks }))
}
