//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let storage_ok = state.object_store.health_check().await.unwrap_or(false);

    Json(ApiResponse::ok(HealthResponse {
        status: if storage_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.object_store.provider_type().to_string(),
    }))
}
