//! Blog data models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::user::User;

/// A blog post.
#[derive(Debug, Clone)]
pub struct Blog {
    /// Unique blog id, assigned at creation.
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    /// Id of the owning user. Set at creation; authoritative for every
    /// ownership decision.
    pub user_id: String,
    /// Free-form comment payloads, in arrival order.
    pub comments: Vec<Value>,
    /// When the blog was created (RFC 3339).
    pub created_at: String,
}

/// Request body for creating a blog.
#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub author: String,
    pub url: String,
    /// Defaults to 0 when absent.
    pub likes: Option<i64>,
}

/// Request body for updating a blog.
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: String,
    pub author: String,
    pub url: String,
    /// Absent likes leave the stored value unchanged.
    pub likes: Option<i64>,
    /// New owner id. Reassigning ownership through an update is the one
    /// sanctioned way a blog changes hands.
    pub user: Option<String>,
}

/// Owner fields embedded in a blog's outward representation.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerInfo {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}

/// Outward representation of a blog with its owner populated.
#[derive(Debug, Clone, Serialize)]
pub struct BlogInfo {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    pub comments: Vec<Value>,
    /// `None` when the owning user row no longer exists; a dangling owner
    /// must not fail a read.
    pub user: Option<OwnerInfo>,
}

impl BlogInfo {
    /// Build the outward representation, tolerating a missing owner.
    pub fn new(blog: Blog, owner: Option<&User>) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            comments: blog.comments,
            user: owner.map(|user| OwnerInfo {
                id: user.id.clone(),
                username: user.username.clone(),
                name: user.name.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog() -> Blog {
        Blog {
            id: "blg_abc123def456".to_string(),
            title: "On Writing".to_string(),
            author: "Annie Dillard".to_string(),
            url: "https://example.com/on-writing".to_string(),
            likes: 3,
            user_id: "usr_abc123def456".to_string(),
            comments: vec![serde_json::json!({"text": "great read"})],
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_blog_info_with_missing_owner() {
        let info = BlogInfo::new(blog(), None);
        let json = serde_json::to_value(info).unwrap();
        assert!(json["user"].is_null());
        assert_eq!(json["likes"], 3);
    }

    #[test]
    fn test_blog_info_populates_owner() {
        let owner = User {
            id: "usr_abc123def456".to_string(),
            username: "alice".to_string(),
            name: Some("Alice Lidell".to_string()),
            password_hash: "$2b$04$hash".to_string(),
            blogs: vec![],
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        };

        let json = serde_json::to_value(BlogInfo::new(blog(), Some(&owner))).unwrap();
        assert_eq!(json["user"]["username"], "alice");
        // Owner embedding must never leak credentials.
        assert!(json["user"].get("password_hash").is_none());
    }
}
