//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::blog::BlogService;
use crate::user::UserService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User service for account management and credential checks.
    pub users: Arc<UserService>,
    /// Blog service for owned-document operations.
    pub blogs: Arc<BlogService>,
    /// Session token service; the signing secret is injected at startup.
    pub tokens: TokenService,
}

impl AppState {
    /// Create new application state.
    pub fn new(users: UserService, blogs: BlogService, tokens: TokenService) -> Self {
        Self {
            users: Arc::new(users),
            blogs: Arc::new(blogs),
            tokens,
        }
    }
}
