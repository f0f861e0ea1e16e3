//! Lectern Core Library
//!
//! This crate provides the reading model for the Lectern scripture
//! application: corpus parsing and the in-memory verse index, chapter
//! navigation, search, annotation sync over a document store, accounts and
//! preferences. The corpus is read-only after load; everything mutable
//! goes through explicit state holders or the store traits so clients can
//! be handed in at construction rather than reached for globally.

pub mod annotations;
pub mod auth;
pub mod corpus;
pub mod daily;
pub mod error;
pub mod prefs;
pub mod profile;
pub mod reader;
pub mod store;
pub mod types;

pub use corpus::{Corpus, VersionCatalog, SEARCH_RESULT_CAP};
pub use error::{AuthError, CorpusError, LecternError, Result, StoreError};
pub use reader::{Generation, Location, NavDirection, ReaderSession};
pub use types::{Annotation, AnnotationKind, BookInfo, Profile, Verse, VerseRef};
