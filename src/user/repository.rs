//! User repository for database operations.

use anyhow::{Context, Result, bail};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::User;

/// Raw database row; the owned-blog list is stored as a JSON array.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    name: Option<String>,
    password_hash: String,
    blogs: String,
    created_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        // A corrupt blogs column must not take down read paths; the list is
        // only a denormalized index.
        let blogs = serde_json::from_str(&row.blogs).unwrap_or_default();
        User {
            id: row.id,
            username: row.username,
            name: row.name,
            password_hash: row.password_hash,
            blogs,
            created_at: row.created_at,
        }
    }
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a new user id.
    fn generate_id() -> String {
        format!("usr_{}", nanoid::nanoid!(12))
    }

    /// Insert a new user with an already-hashed password.
    ///
    /// The UNIQUE constraint on username may still fire here if a duplicate
    /// slips past the service-level check; the caller is responsible for
    /// classifying that failure.
    #[instrument(skip(self, password_hash), fields(username = %username))]
    pub async fn create(
        &self,
        username: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User> {
        let id = Self::generate_id();
        let created_at = chrono::Utc::now().to_rfc3339();

        debug!("Creating user: {} ({})", username, id);

        sqlx::query(
            r#"
            INSERT INTO users (id, username, name, password_hash, blogs, created_at)
            VALUES (?, ?, ?, ?, '[]', ?)
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(name)
        .bind(password_hash)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .context("inserting user")?;

        self.get(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user not found after creation"))
    }

    /// Get a user by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, name, password_hash, blogs, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("fetching user")?;

        Ok(row.map(User::from))
    }

    /// Get a user by username.
    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, name, password_hash, blogs, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("fetching user by username")?;

        Ok(row.map(User::from))
    }

    /// List all users in creation order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, name, password_hash, blogs, created_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("listing users")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Append a blog id to a user's owned-blog list.
    ///
    /// The list is append-only; ids are never removed even when a blog is
    /// deleted, since `Blog::user_id` is what ownership decisions read.
    #[instrument(skip(self))]
    pub async fn append_owned_blog(&self, user_id: &str, blog_id: &str) -> Result<()> {
        let Some(user) = self.get(user_id).await? else {
            bail!("user not found: {}", user_id);
        };

        let mut blogs = user.blogs;
        blogs.push(blog_id.to_string());
        let encoded = serde_json::to_string(&blogs).context("encoding owned-blog list")?;

        let result = sqlx::query("UPDATE users SET blogs = ? WHERE id = ?")
            .bind(&encoded)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("updating owned-blog list")?;

        if result.rows_affected() == 0 {
            bail!("user disappeared while appending blog: {}", user_id);
        }

        Ok(())
    }
}
