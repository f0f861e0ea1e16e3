//! Application state

use anyhow::{Context, Result};
use lectern_core::annotations::AnnotationService;
use lectern_core::auth::{AuthEvent, AuthProvider, LocalAuthProvider};
use lectern_core::corpus::{Corpus, VersionCatalog};
use lectern_core::prefs::PreferenceService;
use lectern_core::profile::ProfileService;
use lectern_core::store::{DocumentStore, LocalDocStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared application state
///
/// Every collaborator (corpora, document store, auth provider) is injected
/// here at construction; handlers never reach for process-wide clients.
#[derive(Clone)]
pub struct AppState {
    /// Loaded corpora, read-only after startup
    pub catalog: Arc<VersionCatalog>,

    /// Per-user document store (annotations, profiles, preferences)
    pub store: Arc<dyn DocumentStore>,

    /// Authentication provider
    pub auth: Arc<dyn AuthProvider>,

    /// Annotation service over the store
    pub annotations: AnnotationService,

    /// Profile documents
    pub profiles: ProfileService,

    /// Per-user preference documents
    pub preferences: PreferenceService,

    /// Channel for SSE events
    pub event_tx: broadcast::Sender<ServerEvent>,
}

/// Server-sent events
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// An annotation was toggled
    AnnotationToggled {
        uid: String,
        kind: String,
        reference: String,
        set: bool,
    },

    /// A user signed in
    SignedIn { uid: String },

    /// A user signed out
    SignedOut { uid: String },
}

impl AppState {
    /// Create application state from the environment
    pub async fn new() -> Result<Self> {
        let corpus_dir =
            std::env::var("LECTERN_CORPUS_DIR").unwrap_or_else(|_| "./corpus".to_string());
        let data_path =
            std::env::var("LECTERN_DATA_PATH").unwrap_or_else(|_| "./lectern_data".to_string());
        let data_path = PathBuf::from(data_path);

        tokio::fs::create_dir_all(&data_path)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_path.display()))?;

        // Corpus parsing is CPU-bound; keep it off the runtime threads
        let corpus_dir = PathBuf::from(corpus_dir);
        let catalog = tokio::task::spawn_blocking(move || VersionCatalog::load_dir(&corpus_dir))
            .await
            .context("Corpus load task failed")??;

        let store: Arc<dyn DocumentStore> = Arc::new(LocalDocStore::new(&data_path));
        let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(store.clone()));

        Ok(Self::assemble(Arc::new(catalog), store, auth))
    }

    /// Build state from explicit parts (used by tests)
    pub fn assemble(
        catalog: Arc<VersionCatalog>,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);

        // Forward the provider's auth notifications onto the SSE channel
        let mut auth_rx = auth.subscribe();
        let forward_tx = event_tx.clone();
        tokio::spawn(async move {
            while let Ok(event) = auth_rx.recv().await {
                let event = match event {
                    AuthEvent::SignedIn { uid } => ServerEvent::SignedIn { uid },
                    AuthEvent::SignedOut { uid } => ServerEvent::SignedOut { uid },
                };
                let _ = forward_tx.send(event);
            }
        });

        Self {
            catalog,
            annotations: AnnotationService::new(store.clone()),
            profiles: ProfileService::new(store.clone()),
            preferences: PreferenceService::new(store.clone()),
            store,
            auth,
            event_tx,
        }
    }

    /// Look up a loaded corpus by version id
    pub fn corpus(&self, version: &str) -> Option<Arc<Corpus>> {
        self.catalog.get(version)
    }

    /// Subscribe to server events
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast an event
    pub fn broadcast(&self, event: ServerEvent) {
        // Ignore errors (no subscribers)
        let _ = self.event_tx.send(event);
    }
}
