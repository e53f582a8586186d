//! Authentication errors.

use thiserror::Error;

/// Failures produced while resolving the acting user for a request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token accompanied a request to a protected route.
    #[error("missing bearer token")]
    MissingToken,

    /// The token is structurally malformed or its signature does not
    /// validate. Carries the token library's message verbatim.
    #[error("{0}")]
    InvalidToken(String),

    /// Something unrelated to the caller went wrong (signing failure, store
    /// lookup failure).
    #[error("{0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        crate::api::ApiError::from(self).into_response()
    }
}
