//! Attestation ingestion and platform statistics handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::instrument;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::StoreAttestationResponse;
use crate::domain::{Attestation, AttestationStats};
use crate::server::AppState;

/// POST /api/attestations - Verify and store one attestation.
#[instrument(skip(state, attestation), fields(publisher = %attestation.publisher))]
pub async fn store_attestation(
    State(state): State<AppState>,
    ApiJson(attestation): ApiJson<Attestation>,
) -> Result<(StatusCode, Json<StoreAttestationResponse>), ApiError> {
    let id = state.store.verify_and_store_attestation(&attestation).await?;
    Ok((
        StatusCode::CREATED,
        Json(StoreAttestationResponse { success: true, id }),
    ))
}

/// GET /api/stats - Cross-wallet attestation statistics.
pub async fn attestation_stats(
    State(state): State<AppState>,
) -> Result<Json<AttestationStats>, ApiError> {
    let stats = state.store.get_attestation_stats().await?;
    Ok(Json(stats))
}
