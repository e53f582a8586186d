//! Per-request authentication middleware chain.
//!
//! Two ordered stages: token extraction (never fails; a request without a
//! token is simply anonymous) and user resolution (applied only to routes
//! that require it).

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::error::AuthError;
use crate::api::AppState;
use crate::user::User;

/// The user a request is acting as, resolved from its bearer token.
///
/// `None` means the request is effectively anonymous: either the route never
/// resolved a user, or the token's subject no longer exists. Every consumer
/// has to handle the anonymous case explicitly.
#[derive(Debug, Clone)]
pub struct ActingUser(pub Option<User>);

/// Stage 1: extract the candidate bearer token from the request headers.
///
/// Returns `None` unless an `Authorization` header is present and starts
/// with the literal `"Bearer "` scheme prefix. Absence is not an error.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Stage 2: resolve the acting user for a protected route.
///
/// A missing token fails the request outright; a verified token whose
/// subject has since disappeared leaves the request anonymous rather than
/// failing, so downstream ownership checks see `ActingUser(None)`.
pub async fn resolve_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers())
        .map(str::to_owned)
        .ok_or(AuthError::MissingToken)?;

    let claims = state.tokens.verify(&token)?;

    let user = state
        .users
        .find_by_id(&claims.user_id)
        .await
        .map_err(|e| AuthError::Internal(format!("resolving user: {e}")))?;

    if user.is_none() {
        debug!(user_id = %claims.user_id, "token subject no longer exists, continuing anonymous");
    }

    request.extensions_mut().insert(ActingUser(user));
    Ok(next.run(request).await)
}
