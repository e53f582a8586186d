//! Unified API error handling.
//!
//! Every failure a client can observe is classified into exactly one variant
//! here; no other shape reaches the wire. Each classified error is logged
//! before the response body is built.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::user::UserError;

/// API error type with a stable external taxonomy.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A field constraint was violated; the message is shown verbatim.
    #[error("{0}")]
    Validation(String),

    /// An id that cannot address a resource.
    #[error("malformatted id")]
    MalformedId,

    /// A structurally bad token or failed signature; carries the token
    /// library's message.
    #[error("{0}")]
    InvalidToken(String),

    /// The request body could not be parsed. The message is a mislabeling
    /// inherited from the system this one replaces; clients depend on it.
    #[error("invalid token")]
    MalformedBody,

    /// No token on a route that needs one.
    #[error("token invalid")]
    Unauthorized,

    /// Login failed. Unknown username and wrong password produce this same
    /// error so neither case is distinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Authenticated but not the owner of the target resource.
    #[error("you dont own this resource")]
    NotOwner,

    /// Mutation target does not exist (update path only; delete is a no-op).
    #[error("Blog does not exist")]
    BlogNotFound,

    /// No route matched.
    #[error("Unknown endpoint")]
    UnknownEndpoint,

    /// Anything the caller cannot fix. The detail goes to the log, not the
    /// client.
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedId => StatusCode::BAD_REQUEST,
            Self::InvalidToken(_)
            | Self::MalformedBody
            | Self::Unauthorized
            | Self::InvalidCredentials
            | Self::NotOwner => StatusCode::UNAUTHORIZED,
            Self::BlogNotFound | Self::UnknownEndpoint => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match &self {
            ApiError::Internal(detail) => {
                error!(status = %status, detail = %detail, "API error");
            }
            _ => {
                warn!(status = %status, message = %message, "Client error");
            }
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Storage and other unclassified failures surface as internal errors.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(msg) => ApiError::Validation(msg),
            UserError::Internal(err) => err.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::Unauthorized,
            AuthError::InvalidToken(msg) => ApiError::InvalidToken(msg),
            AuthError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

/// Body extraction failures: a syntactically broken body keeps the inherited
/// 401 mislabel, while a well-formed body that misses the schema is an
/// ordinary validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ApiError::Validation(err.body_text()),
            _ => ApiError::MalformedBody,
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
