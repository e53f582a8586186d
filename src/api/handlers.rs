//! HTTP request handlers.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::auth::ActingUser;
use crate::blog::ownership::{self, OwnershipDecision};
use crate::blog::{BlogInfo, CreateBlogRequest, UpdateBlogRequest};
use crate::user::{CreateUserRequest, UserInfo};

/// Length of the random id segment after the type prefix.
const ID_SUFFIX_LEN: usize = 12;

/// Validate that a path id is structurally addressable.
///
/// Ids are `<prefix><12 nanoid chars>`; anything else cannot address a
/// resource and is rejected before the store is consulted.
fn checked_id<'a>(id: &'a str, prefix: &str) -> Result<&'a str, ApiError> {
    let suffix = id.strip_prefix(prefix).ok_or(ApiError::MalformedId)?;
    let well_formed = suffix.len() == ID_SUFFIX_LEN
        && suffix
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !well_formed {
        return Err(ApiError::MalformedId);
    }
    Ok(id)
}

// ============================================================================
// Health
// ============================================================================

/// Liveness endpoint.
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================================
// Authentication
// ============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub name: Option<String>,
    pub token: String,
}

/// Exchange credentials for a session token.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .users
        .verify_credentials(&request.username, &request.password)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let token = state.tokens.issue(&user)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        username: user.username,
        name: user.name,
        token,
    }))
}

// ============================================================================
// Users
// ============================================================================

/// Register a new user.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(UserInfo::from(user))))
}

/// List all users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserInfo>>> {
    let users = state.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserInfo::from).collect()))
}

// ============================================================================
// Blogs
// ============================================================================

/// List all blogs with owners populated.
pub async fn list_blogs(State(state): State<AppState>) -> ApiResult<Json<Vec<BlogInfo>>> {
    Ok(Json(state.blogs.list_with_owners().await?))
}

/// Get a single blog. A well-formed id that resolves to nothing serializes
/// as `null`, matching the document-store view of the world.
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<BlogInfo>>> {
    let id = checked_id(&id, "blg_")?;
    Ok(Json(state.blogs.find_with_owner(id).await?))
}

/// Create a blog owned by the acting user.
#[instrument(skip(state, acting, request), fields(title = %request.title))]
pub async fn create_blog(
    State(state): State<AppState>,
    Extension(ActingUser(acting)): Extension<ActingUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateBlogRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    // A verified token whose subject is gone leaves the request anonymous;
    // anonymous callers cannot own anything.
    let owner = acting.ok_or(ApiError::Unauthorized)?;

    let blog = state.blogs.create_blog(&owner, &request).await?;
    Ok((
        StatusCode::CREATED,
        Json(BlogInfo::new(blog, Some(&owner))),
    ))
}

/// Update a blog. Only the owner may update; a missing blog is reported,
/// not ignored.
#[instrument(skip(state, acting, request))]
pub async fn update_blog(
    State(state): State<AppState>,
    Extension(ActingUser(acting)): Extension<ActingUser>,
    Path(id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateBlogRequest>, ApiError>,
) -> ApiResult<Json<BlogInfo>> {
    let id = checked_id(&id, "blg_")?;

    let target = state.blogs.find_by_id(id).await?;
    match ownership::evaluate(acting.as_ref(), target.as_ref()) {
        OwnershipDecision::MissingBlog => return Err(ApiError::BlogNotFound),
        OwnershipDecision::NoActingUser => return Err(ApiError::Unauthorized),
        OwnershipDecision::NotOwner => return Err(ApiError::NotOwner),
        OwnershipDecision::Allowed => {}
    }

    let updated = state
        .blogs
        .update_blog(id, &request)
        .await?
        // The row can vanish between the guard and the write; same contract.
        .ok_or(ApiError::BlogNotFound)?;

    Ok(Json(updated))
}

/// Delete a blog. Only the owner may delete; deleting an id that resolves
/// to nothing succeeds as a no-op.
#[instrument(skip(state, acting))]
pub async fn delete_blog(
    State(state): State<AppState>,
    Extension(ActingUser(acting)): Extension<ActingUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = checked_id(&id, "blg_")?;

    let target = state.blogs.find_by_id(id).await?;
    match ownership::evaluate(acting.as_ref(), target.as_ref()) {
        OwnershipDecision::MissingBlog => return Ok(StatusCode::NO_CONTENT),
        OwnershipDecision::NoActingUser => return Err(ApiError::Unauthorized),
        OwnershipDecision::NotOwner => return Err(ApiError::NotOwner),
        OwnershipDecision::Allowed => {}
    }

    state.blogs.delete_blog(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append a comment to a blog. Any authenticated caller may comment;
/// ownership is not required.
#[instrument(skip(state, comment))]
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(comment), _): WithRejection<Json<Value>, ApiError>,
) -> ApiResult<Json<Value>> {
    let id = checked_id(&id, "blg_")?;

    state
        .blogs
        .add_comment(id, &comment)
        .await?
        .ok_or(ApiError::BlogNotFound)?;

    Ok(Json(comment))
}

// ============================================================================
// Fallback
// ============================================================================

/// Handler for routes that match nothing.
pub async fn unknown_endpoint() -> ApiError {
    ApiError::UnknownEndpoint
}
