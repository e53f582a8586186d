//! User service for business logic.

use anyhow::Context;
use thiserror::Error;
use tracing::{info, instrument};

use super::models::{CreateUserRequest, User};
use super::repository::UserRepository;

/// Failures from user operations.
///
/// Validation failures carry the message shown to the client verbatim;
/// everything else is internal.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Service for user account operations.
#[derive(Debug, Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Create a new user with validation.
    ///
    /// The plaintext password is validated before it is hashed; the hash is
    /// the only form that is ever persisted.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserError> {
        if request.password.len() < 6 {
            return Err(UserError::Validation(
                "password has to be at least 6 characters".to_string(),
            ));
        }

        if request.username.len() < 3 {
            return Err(UserError::Validation(
                "username must be at least 3 characters".to_string(),
            ));
        }

        if self.repo.get_by_username(&request.username).await?.is_some() {
            return Err(UserError::Validation("username must be unique".to_string()));
        }

        let password_hash = hash_password(&request.password)?;

        let user = match self
            .repo
            .create(&request.username, request.name.as_deref(), &password_hash)
            .await
        {
            Ok(user) => user,
            // Two concurrent registrations can both pass the lookup above;
            // the UNIQUE constraint catches the loser. Still a validation
            // failure from the caller's point of view, not a storage crash.
            Err(err) if is_unique_violation(&err) => {
                return Err(UserError::Validation("username must be unique".to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        info!(user_id = %user.id, username = %user.username, "Created new user");
        Ok(user)
    }

    /// Get a user by id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, UserError> {
        Ok(self.repo.get(id).await?)
    }

    /// Get a user by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        Ok(self.repo.get_by_username(username).await?)
    }

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.repo.list().await?)
    }

    /// Verify login credentials.
    ///
    /// Unknown username and wrong password are indistinguishable to the
    /// caller; both come back as `None`.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, UserError> {
        let Some(user) = self.repo.get_by_username(username).await? else {
            return Ok(None);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| match e {
            sqlx::Error::Database(db) => Some(db.message()),
            _ => None,
        })
        .is_some_and(|msg| msg.contains("UNIQUE constraint failed"))
}

/// Hash a password using bcrypt.
fn hash_password(password: &str) -> Result<String, anyhow::Error> {
    // Use a lower cost factor for development speed
    let cost = if cfg!(debug_assertions) { 4 } else { 10 };
    bcrypt::hash(password, cost).context("hashing password")
}

/// Verify a password against a bcrypt hash.
fn verify_password(password: &str, hash: &str) -> Result<bool, anyhow::Error> {
    bcrypt::verify(password, hash).context("verifying password")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn test_service() -> UserService {
        let db = Database::in_memory().await.unwrap();
        UserService::new(UserRepository::new(db.pool().clone()))
    }

    fn request(username: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            name: None,
            password: password.to_string(),
        }
    }

    #[test]
    fn test_password_hashing_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_user_rejects_short_password() {
        let service = test_service().await;

        let err = service.create_user(request("alice", "abc")).await.unwrap_err();
        match err {
            UserError::Validation(msg) => {
                assert_eq!(msg, "password has to be at least 6 characters")
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        // Nothing was persisted.
        assert!(service.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_rejects_short_username() {
        let service = test_service().await;

        let err = service.create_user(request("al", "secret1")).await.unwrap_err();
        assert!(matches!(err, UserError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_username() {
        let service = test_service().await;
        service.create_user(request("alice", "secret1")).await.unwrap();

        let err = service.create_user(request("alice", "secret2")).await.unwrap_err();
        match err {
            UserError::Validation(msg) => assert_eq!(msg, "username must be unique"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_user_persists_hash_not_password() {
        let service = test_service().await;
        let user = service.create_user(request("alice", "secret1")).await.unwrap();

        assert_ne!(user.password_hash, "secret1");
        assert!(user.blogs.is_empty());

        let found = service.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let service = test_service().await;
        service.create_user(request("alice", "secret1")).await.unwrap();

        let found = service.verify_credentials("alice", "secret1").await.unwrap();
        assert_eq!(found.unwrap().username, "alice");

        // Wrong password and unknown username look the same.
        assert!(service.verify_credentials("alice", "wrong!!").await.unwrap().is_none());
        assert!(service.verify_credentials("nobody", "secret1").await.unwrap().is_none());
    }
}
