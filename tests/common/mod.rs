//! Test utilities and common setup.

use axum::Router;
use inkwell::api::{self, AppState};
use inkwell::auth::TokenService;
use inkwell::blog::{BlogRepository, BlogService};
use inkwell::db::Database;
use inkwell::user::{UserRepository, UserService};

/// Signing secret used by every test application.
pub const TEST_SECRET: &str = "test-secret-for-integration-tests-minimum-32-chars";

/// Create a test application over an in-memory database.
pub async fn test_app() -> Router {
    let (app, _state) = test_app_with_state().await;
    app
}

/// Create a test application and return its state alongside, for tests that
/// need to mint tokens or inspect services directly.
pub async fn test_app_with_state() -> (Router, AppState) {
    let db = Database::in_memory().await.unwrap();

    let tokens = TokenService::new(TEST_SECRET);
    let user_repo = UserRepository::new(db.pool().clone());
    let user_service = UserService::new(user_repo.clone());
    let blog_service = BlogService::new(BlogRepository::new(db.pool().clone()), user_repo);

    let state = AppState::new(user_service, blog_service, tokens);
    let app = api::create_router(state.clone(), &[]);
    (app, state)
}
