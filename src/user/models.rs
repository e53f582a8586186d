//! User data models.

use serde::{Deserialize, Serialize};

/// A user account.
///
/// Deliberately not serializable: the password hash must never reach an
/// output representation. Convert to [`UserInfo`] before responding.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user id, assigned at creation.
    pub id: String,
    /// Globally unique username, minimum length 3.
    pub username: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Opaque bcrypt hash of the password.
    pub password_hash: String,
    /// Ids of blogs this user created, in creation order. A denormalized
    /// back-reference; `Blog::user_id` is authoritative for ownership.
    pub blogs: Vec<String>,
    /// When the account was created (RFC 3339).
    pub created_at: String,
}

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub name: Option<String>,
    pub password: String,
}

/// Outward representation of a user. Carries no password material.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            blogs: user.blogs,
        }
    }
}
