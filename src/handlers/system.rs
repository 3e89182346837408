// handlers/system.rs - GET / and GET /health

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::ApiResult;
use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the listing API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// 200 with a timestamp when the store answers, 503 `{ "error": ... }` otherwise
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    if let Err(e) = state.listings.health_check().await {
        tracing::warn!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("Database unavailable"));
    }

    Ok(Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}
