//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::types::{HealthResponse, ReadyResponse};
use crate::server::AppState;

/// GET /health - Liveness probe, no deep checks.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "attestor",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /ready - Readiness probe with a database round trip.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadyResponse>, (StatusCode, String)> {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => Ok(Json(ReadyResponse {
            status: "ready",
            database: "connected",
        })),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Database unavailable: {}", e),
        )),
    }
}
