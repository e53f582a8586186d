//! API route definitions.

use axum::http::HeaderValue;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::auth::resolve_user;

use super::handlers;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let cors = build_cors_layer(allowed_origins);

    // Request logging with timing.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Mutating blog routes resolve the acting user; everything else stays
    // anonymous-friendly.
    let protected_routes = Router::new()
        .route("/api/blogs", post(handlers::create_blog))
        .route(
            "/api/blogs/{id}",
            put(handlers::update_blog).delete(handlers::delete_blog),
        )
        .route("/api/blogs/{id}/comments", post(handlers::add_comment))
        .layer(middleware::from_fn_with_state(state.clone(), resolve_user))
        .with_state(state.clone());

    // Public routes (no authentication).
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/login", post(handlers::login))
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/api/blogs", get(handlers::list_blogs))
        .route("/api/blogs/{id}", get(handlers::get_blog))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(handlers::unknown_endpoint)
        .layer(cors)
        .layer(trace_layer)
}

/// Build the CORS layer.
///
/// With no configured origins any origin is allowed, mirroring the open
/// policy of the system this one replaces; configured origins narrow it.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("CORS: Invalid origin in config: {}", origin);
                None
            })
        })
        .collect();

    if origins.is_empty() {
        tracing::error!("CORS: All configured origins are invalid!");
        CorsLayer::new().allow_origin(HeaderValue::from_static("null"))
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
