//! Blog repository for database operations.

use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::{Blog, CreateBlogRequest, UpdateBlogRequest};

/// Raw database row; comments are stored as a JSON array.
#[derive(sqlx::FromRow)]
struct BlogRow {
    id: String,
    title: String,
    author: String,
    url: String,
    likes: i64,
    user_id: String,
    comments: String,
    created_at: String,
}

impl From<BlogRow> for Blog {
    fn from(row: BlogRow) -> Self {
        let comments = serde_json::from_str(&row.comments).unwrap_or_default();
        Blog {
            id: row.id,
            title: row.title,
            author: row.author,
            url: row.url,
            likes: row.likes,
            user_id: row.user_id,
            comments,
            created_at: row.created_at,
        }
    }
}

const SELECT_BLOG: &str = r#"
    SELECT id, title, author, url, likes, user_id, comments, created_at
    FROM blogs
"#;

/// Repository for blog database operations.
#[derive(Debug, Clone)]
pub struct BlogRepository {
    pool: SqlitePool,
}

impl BlogRepository {
    /// Create a new blog repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a new blog id.
    fn generate_id() -> String {
        format!("blg_{}", nanoid::nanoid!(12))
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new blog owned by `owner_id`.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(&self, request: &CreateBlogRequest, owner_id: &str) -> Result<Blog> {
        let id = Self::generate_id();
        let created_at = chrono::Utc::now().to_rfc3339();

        debug!("Creating blog: {} ({})", request.title, id);

        sqlx::query(
            r#"
            INSERT INTO blogs (id, title, author, url, likes, user_id, comments, created_at)
            VALUES (?, ?, ?, ?, ?, ?, '[]', ?)
            "#,
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.author)
        .bind(&request.url)
        .bind(request.likes.unwrap_or(0))
        .bind(owner_id)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .context("inserting blog")?;

        self.get(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("blog not found after creation"))
    }

    /// Get a blog by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<Blog>> {
        let row = sqlx::query_as::<_, BlogRow>(&format!("{SELECT_BLOG} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("fetching blog")?;

        Ok(row.map(Blog::from))
    }

    /// List all blogs in creation order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Blog>> {
        let rows = sqlx::query_as::<_, BlogRow>(&format!("{SELECT_BLOG} ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await
            .context("listing blogs")?;

        Ok(rows.into_iter().map(Blog::from).collect())
    }

    /// Apply an update to a blog, returning the updated row.
    ///
    /// Absent `likes` keeps the stored count; absent `user` keeps the
    /// current owner.
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: &str, request: &UpdateBlogRequest) -> Result<Option<Blog>> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET title = ?, author = ?, url = ?,
                likes = COALESCE(?, likes),
                user_id = COALESCE(?, user_id)
            WHERE id = ?
            "#,
        )
        .bind(&request.title)
        .bind(&request.author)
        .bind(&request.url)
        .bind(request.likes)
        .bind(request.user.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("updating blog")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Delete a blog by id. Returns whether a row was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("deleting blog")?;

        Ok(result.rows_affected() > 0)
    }

    /// Append a comment payload to a blog's comment list.
    ///
    /// Returns `None` when the blog does not exist.
    #[instrument(skip(self, comment))]
    pub async fn append_comment(&self, id: &str, comment: &Value) -> Result<Option<Blog>> {
        let Some(blog) = self.get(id).await? else {
            return Ok(None);
        };

        let mut comments = blog.comments;
        comments.push(comment.clone());
        let encoded = serde_json::to_string(&comments).context("encoding comment list")?;

        sqlx::query("UPDATE blogs SET comments = ? WHERE id = ?")
            .bind(&encoded)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("appending comment")?;

        self.get(id).await
    }
}
