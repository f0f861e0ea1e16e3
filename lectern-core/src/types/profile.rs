//! User profile document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's profile, stored at `users/<uid>/profile`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub uid: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(uid: impl Into<String>, email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            full_name: full_name.into(),
            created_at: Utc::now(),
        }
    }
}
