//! Core value types for the Lectern reading model

mod annotation;
mod book;
mod profile;
mod verse;

pub use annotation::{Annotation, AnnotationKind};
pub use book::BookInfo;
pub use profile::Profile;
pub use verse::{Verse, VerseRef};
