//! Error types for Lectern Core

use thiserror::Error;

/// Result type alias using LecternError
pub type Result<T> = std::result::Result<T, LecternError>;

/// Top-level error type for all Lectern operations
#[derive(Debug, Error)]
pub enum LecternError {
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while loading or querying a text corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Corpus file not found: {0}")]
    NotFound(String),

    #[error("Corpus contains no parseable verses: {0}")]
    Empty(String),

    #[error("IO error reading corpus: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur during document store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by an authentication provider
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account already exists for {0}")]
    EmailInUse(String),

    #[error("Password must be at least {0} characters")]
    WeakPassword(usize),

    #[error("Invalid or expired session token")]
    InvalidToken,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
