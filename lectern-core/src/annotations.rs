//! Annotation sync over the document store
//!
//! Highlights and bookmarks are presence records in per-user collections.
//! The service's whole contract with the store is: fetch the annotated
//! verse numbers for a (version, book, chapter), toggle one record, list
//! all bookmarks. Durability and conflict resolution belong to the store.

use crate::error::StoreError;
use crate::store::DocumentStore;
use crate::types::{Annotation, AnnotationKind};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Per-user annotation service
#[derive(Clone)]
pub struct AnnotationService {
    store: Arc<dyn DocumentStore>,
}

impl AnnotationService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn collection(uid: &str, kind: AnnotationKind) -> String {
        format!("users/{}/{}", uid, kind.collection())
    }

    /// Verse numbers annotated with `kind` in one chapter of one version
    pub async fn chapter_annotations(
        &self,
        uid: &str,
        kind: AnnotationKind,
        version: &str,
        book: &str,
        chapter: u32,
    ) -> Result<BTreeSet<u32>, StoreError> {
        let docs = self.store.list(&Self::collection(uid, kind)).await?;
        let mut verses = BTreeSet::new();
        for (id, doc) in docs {
            let annotation: Annotation = match serde_json::from_value(doc) {
                Ok(a) => a,
                Err(e) => {
                    tracing::warn!(doc = %id, "Skipping undecodable annotation: {}", e);
                    continue;
                }
            };
            if annotation.version == version
                && annotation.book.eq_ignore_ascii_case(book)
                && annotation.chapter == chapter
            {
                verses.insert(annotation.verse);
            }
        }
        Ok(verses)
    }

    /// Add or remove one annotation record; returns whether the flag is set
    /// after the toggle
    ///
    /// Toggling the same verse twice restores the original state.
    pub async fn toggle(
        &self,
        uid: &str,
        kind: AnnotationKind,
        annotation: Annotation,
    ) -> Result<bool, StoreError> {
        let path = format!("{}/{}", Self::collection(uid, kind), annotation.doc_id(kind));
        if self.store.get(&path).await?.is_some() {
            self.store.delete(&path).await?;
            Ok(false)
        } else {
            self.store.put(&path, serde_json::to_value(&annotation)?).await?;
            Ok(true)
        }
    }

    /// All of a user's bookmarks, newest first
    pub async fn all_bookmarks(&self, uid: &str) -> Result<Vec<Annotation>, StoreError> {
        let docs = self
            .store
            .list(&Self::collection(uid, AnnotationKind::Bookmark))
            .await?;
        let mut bookmarks = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            match serde_json::from_value::<Annotation>(doc) {
                Ok(a) => bookmarks.push(a),
                Err(e) => tracing::warn!(doc = %id, "Skipping undecodable bookmark: {}", e),
            }
        }
        bookmarks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookmarks)
    }
}
