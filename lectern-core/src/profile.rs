//! Profile documents in the per-user store

use crate::error::StoreError;
use crate::store::DocumentStore;
use crate::types::Profile;
use std::sync::Arc;

/// Reads and writes `users/<uid>/profile`
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn doc_path(uid: &str) -> String {
        format!("users/{}/profile", uid)
    }

    pub async fn get(&self, uid: &str) -> Result<Option<Profile>, StoreError> {
        match self.store.get(&Self::doc_path(uid)).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn put(&self, profile: &Profile) -> Result<(), StoreError> {
        self.store
            .put(&Self::doc_path(&profile.uid), serde_json::to_value(profile)?)
            .await
    }

    /// Remove the profile and every other document under the user's subtree
    pub async fn delete_user_data(&self, uid: &str) -> Result<(), StoreError> {
        self.store.delete_prefix(&format!("users/{}", uid)).await
    }
}
