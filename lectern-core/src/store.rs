//! Document store abstraction
//!
//! The remote per-user document collections (profiles, highlights,
//! bookmarks, preferences) sit behind this trait. The store owns
//! durability and consistency; callers only consume request/response
//! pairs. Documents are JSON values addressed by slash-separated paths
//! like `users/<uid>/highlights/<doc-id>`.

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Abstract document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` when absent
    async fn get(&self, path: &str) -> StoreResult<Option<Value>>;

    /// Create or replace one document
    async fn put(&self, path: &str, doc: Value) -> StoreResult<()>;

    /// Delete one document; absent documents are a [`StoreError::NotFound`]
    async fn delete(&self, path: &str) -> StoreResult<()>;

    /// List (id, document) pairs directly under a collection path, sorted
    /// by id
    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>>;

    /// Delete a document subtree (used when an account is removed)
    async fn delete_prefix(&self, prefix: &str) -> StoreResult<()>;
}

/// Split a document path into validated segments, rejecting anything that
/// could escape the store root
fn validate_path(path: &str) -> StoreResult<Vec<&str>> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.is_empty()
        || segments
            .iter()
            .any(|s| s.is_empty() || *s == "." || *s == ".." || s.contains('\\'))
    {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

/// Document store persisting JSON files under a local root directory
///
/// Each document lives at `<root>/<path>.json`; writes go through a temp
/// file and an atomic rename so readers never observe partial documents.
pub struct LocalDocStore {
    root: std::path::PathBuf,
}

impl LocalDocStore {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn doc_path(&self, path: &str) -> StoreResult<std::path::PathBuf> {
        let segments = validate_path(path)?;
        let mut full = self.root.clone();
        let (last, dirs) = segments.split_last().expect("validated non-empty");
        for segment in dirs {
            full.push(segment);
        }
        // Appended rather than set_extension: document ids may contain dots
        full.push(format!("{}.json", last));
        Ok(full)
    }

    fn dir_path(&self, path: &str) -> StoreResult<std::path::PathBuf> {
        let segments = validate_path(path)?;
        let mut full = self.root.clone();
        for segment in segments {
            full.push(segment);
        }
        Ok(full)
    }
}

#[async_trait]
impl DocumentStore for LocalDocStore {
    async fn get(&self, path: &str) -> StoreResult<Option<Value>> {
        let full = self.doc_path(path)?;
        match tokio::fs::read_to_string(&full).await {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    async fn put(&self, path: &str, doc: Value) -> StoreResult<()> {
        let full = self.doc_path(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        let data = serde_json::to_string_pretty(&doc)?;

        // Temp file in the same directory so the rename stays on one
        // filesystem
        let mut temp = full.clone();
        temp.as_mut_os_string().push(".tmp");
        tokio::fs::write(&temp, data)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        tokio::fs::rename(&temp, &full)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        let full = self.doc_path(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.to_string()))
            }
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>> {
        let dir = self.dir_path(collection)?;
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Backend(e.to_string())),
        };

        let mut docs = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let data = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            docs.push((id.to_string(), serde_json::from_str(&data)?));
        }
        docs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(docs)
    }

    async fn delete_prefix(&self, prefix: &str) -> StoreResult<()> {
        let dir = self.dir_path(prefix)?;
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }
}

/// In-memory document store (for testing)
#[derive(Default)]
pub struct MemoryDocStore {
    docs: std::sync::RwLock<std::collections::BTreeMap<String, Value>>,
}

impl MemoryDocStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocStore {
    async fn get(&self, path: &str) -> StoreResult<Option<Value>> {
        validate_path(path)?;
        Ok(self.docs.read().unwrap().get(path).cloned())
    }

    async fn put(&self, path: &str, doc: Value) -> StoreResult<()> {
        validate_path(path)?;
        self.docs.write().unwrap().insert(path.to_string(), doc);
        Ok(())
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        validate_path(path)?;
        self.docs
            .write()
            .unwrap()
            .remove(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        Ok(())
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>> {
        validate_path(collection)?;
        let prefix = format!("{}/", collection);
        Ok(self
            .docs
            .read()
            .unwrap()
            .iter()
            .filter(|(k, _)| {
                // Direct children only, not nested collections
                k.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .map(|(k, v)| (k[prefix.len()..].to_string(), v.clone()))
            .collect())
    }

    async fn delete_prefix(&self, prefix: &str) -> StoreResult<()> {
        validate_path(prefix)?;
        let subtree = format!("{}/", prefix);
        self.docs
            .write()
            .unwrap()
            .retain(|k, _| k != prefix && !k.starts_with(&subtree));
        Ok(())
    }
}
