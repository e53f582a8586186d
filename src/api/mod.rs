//! HTTP API module.
//!
//! Provides the REST endpoints, the route table, and the single error
//! classifier every failure funnels through.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
