//! Blog service for business logic.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, instrument};

use super::models::{Blog, BlogInfo, CreateBlogRequest, UpdateBlogRequest};
use super::repository::BlogRepository;
use crate::user::{User, UserRepository};

/// Service for blog operations.
///
/// Holds the user repository alongside the blog repository: blog creation
/// maintains the owner's denormalized blog list, and read paths populate
/// owner details.
#[derive(Debug, Clone)]
pub struct BlogService {
    repo: BlogRepository,
    users: UserRepository,
}

impl BlogService {
    /// Create a new blog service.
    pub fn new(repo: BlogRepository, users: UserRepository) -> Self {
        Self { repo, users }
    }

    /// Create a blog owned by `owner`.
    ///
    /// Two writes: the blog row (owner set) and the append to the owner's
    /// blog list. They are not transactional; if the second write fails the
    /// error propagates so the caller sees an internal failure instead of a
    /// silently stale index. Ownership decisions only ever read the blog
    /// row, which the first write completed.
    #[instrument(skip(self, request), fields(owner = %owner.id, title = %request.title))]
    pub async fn create_blog(&self, owner: &User, request: &CreateBlogRequest) -> Result<Blog> {
        let blog = self.repo.create(request, &owner.id).await?;

        self.users
            .append_owned_blog(&owner.id, &blog.id)
            .await
            .context("recording blog in owner's list")?;

        info!(blog_id = %blog.id, owner = %owner.id, "Created blog");
        Ok(blog)
    }

    /// Get a blog by id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Blog>> {
        self.repo.get(id).await
    }

    /// Get a blog by id with its owner populated.
    pub async fn find_with_owner(&self, id: &str) -> Result<Option<BlogInfo>> {
        let Some(blog) = self.repo.get(id).await? else {
            return Ok(None);
        };
        Ok(Some(self.populate(blog).await?))
    }

    /// List all blogs with owners populated.
    pub async fn list_with_owners(&self) -> Result<Vec<BlogInfo>> {
        let blogs = self.repo.list().await?;

        let owners: HashMap<String, User> = self
            .users
            .list()
            .await?
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();

        Ok(blogs
            .into_iter()
            .map(|blog| {
                let owner = owners.get(&blog.user_id);
                BlogInfo::new(blog, owner)
            })
            .collect())
    }

    /// Apply an update, returning the populated result or `None` when the
    /// blog does not exist.
    #[instrument(skip(self, request))]
    pub async fn update_blog(
        &self,
        id: &str,
        request: &UpdateBlogRequest,
    ) -> Result<Option<BlogInfo>> {
        let Some(blog) = self.repo.update(id, request).await? else {
            return Ok(None);
        };
        Ok(Some(self.populate(blog).await?))
    }

    /// Delete a blog. Deleting an id that resolves to nothing is a no-op.
    #[instrument(skip(self))]
    pub async fn delete_blog(&self, id: &str) -> Result<()> {
        let removed = self.repo.delete(id).await?;
        if removed {
            info!(blog_id = %id, "Deleted blog");
        }
        Ok(())
    }

    /// Append a comment to a blog. Returns `None` when the blog is missing.
    #[instrument(skip(self, comment))]
    pub async fn add_comment(&self, id: &str, comment: &Value) -> Result<Option<Blog>> {
        self.repo.append_comment(id, comment).await
    }

    async fn populate(&self, blog: Blog) -> Result<BlogInfo> {
        let owner = self.users.get(&blog.user_id).await?;
        Ok(BlogInfo::new(blog, owner.as_ref()))
    }
}
