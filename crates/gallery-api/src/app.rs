//! Application builder: wires stores, services, and the router, then serves.

use std::sync::Arc;

use axum::Router;
use tracing::{error, info};

use gallery_core::config::AppConfig;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::traits::{ObjectStore, SystemClock};
use gallery_database::DatabasePool;
use gallery_database::repositories::{MediaRepository, PostRepository, UserRepository};

use crate::router::build_router;
use crate::state::{AppState, Stores};

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Gallery server against PostgreSQL and the given object store.
pub async fn run_server(
    config: AppConfig,
    db_pool: DatabasePool,
    object_store: Arc<dyn ObjectStore>,
) -> Result<(), AppError> {
    info!("Starting Gallery server...");

    let pool = db_pool.pool().clone();
    let stores = Stores {
        users: Arc::new(UserRepository::new(pool.clone())),
        media: Arc::new(MediaRepository::new(pool.clone())),
        posts: Arc::new(PostRepository::new(pool)),
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(Arc::new(config), stores, object_store, Arc::new(SystemClock));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    info!(addr = %addr, "Gallery server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    info!("Shutting down, closing database pool");
    db_pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
