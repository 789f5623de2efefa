//! Route definitions for the Gallery HTTP API.
//!
//! Anonymous auth endpoints live under `/auth`, bearer-protected endpoints
//! under `/api`, and optionally-authenticated public reads under `/public`.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for multipart framing and text fields around the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .route("/health", get(handlers::health::health))
        .merge(auth_routes())
        .nest("/api", api_routes())
        .nest("/public", public_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Registration and login
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
}

/// Everything that needs a bearer token
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(handlers::user::get_profile).put(handlers::user::update_profile),
        )
        .route("/password", put(handlers::user::change_password))
        .route("/token", post(handlers::user::refresh_token))
        .route("/account/deactivate", post(handlers::user::deactivate))
        .route("/images", post(handlers::media::upload))
        .route("/images/my", get(handlers::media::list_mine))
        .route(
            "/images/{id}",
            get(handlers::media::get)
                .put(handlers::media::update)
                .delete(handlers::media::delete),
        )
        .route("/posts", post(handlers::post::create))
        .route("/posts/my", get(handlers::post::list_mine))
        .route(
            "/posts/{id}",
            get(handlers::post::get)
                .put(handlers::post::update)
                .delete(handlers::post::delete),
        )
}

/// Public listings and reads; a valid token only widens visibility
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/images", get(handlers::media::list_public))
        .route("/images/search", get(handlers::media::search_public))
        .route("/images/tags", get(handlers::media::by_tags))
        .route("/images/{id}", get(handlers::media::get_public))
        .route("/images/{id}/transform", get(handlers::media::transform))
        .route("/posts", get(handlers::post::list_public))
        .route("/posts/search", get(handlers::post::search_public))
        .route("/posts/tags", get(handlers::post::by_tags))
        .route("/posts/{id}", get(handlers::post::get_public))
}
