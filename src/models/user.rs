//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account. The password hash never serializes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Unique username
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Argon2id password hash (PHC string format)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User. The ID will be set to 0 and assigned by the
    /// database.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: 0,
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
