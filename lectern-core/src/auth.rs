//! Authentication provider abstraction
//!
//! The application never reaches for a global auth client: a provider is
//! constructed once and handed to whoever needs it. `LocalAuthProvider`
//! keeps credential documents in the document store and session tokens in
//! memory, and broadcasts sign-in/sign-out notifications the way the
//! cloud provider's auth-state listener did.

use crate::error::{AuthError, StoreError};
use crate::store::DocumentStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// An authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// A signed-in session
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
}

/// Auth state change notifications
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn { uid: String },
    SignedOut { uid: String },
}

/// Abstract authentication provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register an email/password account and sign it in
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Sign in via a federated identity (e.g. provider "google" plus the
    /// provider's subject id), creating the account on first contact
    async fn sign_in_federated(
        &self,
        provider: &str,
        subject: &str,
        email: &str,
    ) -> Result<Session, AuthError>;

    /// Resolve a session token to its user
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError>;

    /// End a session
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    /// Change the password for the session's account
    async fn change_password(
        &self,
        token: &str,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError>;

    /// Delete the session's account, returning its uid so callers can
    /// remove the user's documents
    async fn delete_account(&self, token: &str) -> Result<String, AuthError>;

    /// Subscribe to auth state changes
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Credential document stored at `accounts/<email>`
#[derive(Debug, Serialize, Deserialize)]
struct Account {
    uid: String,
    email: String,
    /// Absent for accounts created through federated sign-in only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    digest: Option<String>,
    /// Paths of the `federated/<provider>/<subject>` link documents that
    /// resolve to this account, so deleting the account can remove them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    federated_links: Vec<String>,
    created_at: DateTime<Utc>,
}

/// Auth provider backed by the document store
pub struct LocalAuthProvider {
    store: Arc<dyn DocumentStore>,
    sessions: RwLock<HashMap<String, AuthUser>>,
    events: broadcast::Sender<AuthEvent>,
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn account_path(email: &str) -> String {
    format!("accounts/{}", email.to_lowercase())
}

fn federated_path(provider: &str, subject: &str) -> String {
    format!("federated/{}/{}", provider, subject)
}

impl LocalAuthProvider {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let (events, _) = broadcast::channel(100);
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
            events,
        }
    }

    async fn load_account(&self, email: &str) -> Result<Option<Account>, StoreError> {
        match self.store.get(&account_path(email)).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    async fn save_account(&self, account: &Account) -> Result<(), StoreError> {
        self.store
            .put(&account_path(&account.email), serde_json::to_value(account)?)
            .await
    }

    async fn open_session(&self, user: AuthUser) -> Session {
        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(token.clone(), user.clone());
        // Ignore send errors (no subscribers)
        let _ = self.events.send(AuthEvent::SignedIn {
            uid: user.uid.clone(),
        });
        Session { token, user }
    }

    fn check_password(password: &str) -> Result<(), AuthError> {
        if password.len() < MIN_PASSWORD_LEN {
            Err(AuthError::WeakPassword(MIN_PASSWORD_LEN))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        Self::check_password(password)?;
        if self.load_account(email).await?.is_some() {
            return Err(AuthError::EmailInUse(email.to_string()));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email: email.to_lowercase(),
            digest: Some(password_digest(&salt, password)),
            salt: Some(salt),
            federated_links: Vec::new(),
            created_at: Utc::now(),
        };
        self.save_account(&account).await?;

        Ok(self
            .open_session(AuthUser {
                uid: account.uid,
                email: account.email,
            })
            .await)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account = self
            .load_account(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let (Some(salt), Some(digest)) = (&account.salt, &account.digest) else {
            return Err(AuthError::InvalidCredentials);
        };
        if password_digest(salt, password) != *digest {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self
            .open_session(AuthUser {
                uid: account.uid,
                email: account.email,
            })
            .await)
    }

    async fn sign_in_federated(
        &self,
        provider: &str,
        subject: &str,
        email: &str,
    ) -> Result<Session, AuthError> {
        let link_path = federated_path(provider, subject);
        if let Some(doc) = self.store.get(&link_path).await? {
            let user: AuthUser = serde_json::from_value(doc).map_err(StoreError::from)?;
            return Ok(self.open_session(user).await);
        }

        // First contact: attach to an existing account with the same email,
        // or mint a fresh uid
        let mut account = match self.load_account(email).await? {
            Some(account) => account,
            None => Account {
                uid: Uuid::new_v4().to_string(),
                email: email.to_lowercase(),
                salt: None,
                digest: None,
                federated_links: Vec::new(),
                created_at: Utc::now(),
            },
        };
        if !account.federated_links.contains(&link_path) {
            account.federated_links.push(link_path.clone());
        }
        self.save_account(&account).await?;

        let user = AuthUser {
            uid: account.uid,
            email: email.to_lowercase(),
        };
        self.store
            .put(&link_path, serde_json::to_value(&user).map_err(StoreError::from)?)
            .await?;
        Ok(self.open_session(user).await)
    }

    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        self.sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let user = self
            .sessions
            .write()
            .await
            .remove(token)
            .ok_or(AuthError::InvalidToken)?;
        let _ = self.events.send(AuthEvent::SignedOut { uid: user.uid });
        Ok(())
    }

    async fn change_password(
        &self,
        token: &str,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        Self::check_password(new)?;
        let user = self.verify(token).await?;
        let mut account = self
            .load_account(&user.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let (Some(salt), Some(digest)) = (&account.salt, &account.digest) else {
            return Err(AuthError::InvalidCredentials);
        };
        if password_digest(salt, current) != *digest {
            return Err(AuthError::InvalidCredentials);
        }

        let salt = Uuid::new_v4().simple().to_string();
        account.digest = Some(password_digest(&salt, new));
        account.salt = Some(salt);
        self.save_account(&account).await?;
        Ok(())
    }

    async fn delete_account(&self, token: &str) -> Result<String, AuthError> {
        let user = self.verify(token).await?;

        // Remove the federated link documents first, or a later federated
        // sign-in would resurrect the deleted uid
        if let Some(account) = self.load_account(&user.email).await? {
            for link in &account.federated_links {
                match self.store.delete(link).await {
                    Ok(()) | Err(StoreError::NotFound(_)) => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        match self.store.delete(&account_path(&user.email)).await {
            Ok(()) | Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        // Drop every session for this uid, not just the calling one
        self.sessions
            .write()
            .await
            .retain(|_, u| u.uid != user.uid);
        let _ = self.events.send(AuthEvent::SignedOut {
            uid: user.uid.clone(),
        });
        Ok(user.uid)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
