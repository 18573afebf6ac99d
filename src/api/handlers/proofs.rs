//! Proof verification handlers.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

use crate::api::error::{ApiError, ErrorCode};
use crate::api::extract::ApiJson;
use crate::api::types::{VerificationKeyResponse, VerifyProofRequest, VerifyProofResponse};
use crate::infra::AttestorError;
use crate::server::AppState;

/// POST /api/verify-proof - Verify a submitted threshold proof.
///
/// A completed verification always returns 200 with `valid` carrying the
/// outcome; error statuses mean the verification could not run.
#[instrument(skip(state, request))]
pub async fn verify_proof(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VerifyProofRequest>,
) -> Result<Json<VerifyProofResponse>, ApiError> {
    let proof = request.proof.ok_or_else(|| {
        ApiError::new(ErrorCode::MissingParameters, "Missing required parameter: proof")
    })?;
    let signals_value = request.public_signals.ok_or_else(|| {
        ApiError::new(
            ErrorCode::MissingParameters,
            "Missing required parameter: publicSignals",
        )
    })?;
    let signals = signals_value
        .as_array()
        .ok_or(AttestorError::InvalidPublicSignalsFormat)?;

    let report = state.verification.verify_proof(&proof, signals)?;
    Ok(Json(VerifyProofResponse::from(report)))
}

/// GET /api/verification-key - Verification key metadata.
///
/// Served with a cache header since the key is immutable for the lifetime
/// of the process.
pub async fn verification_key(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let key = state
        .verification
        .verification_key()
        .ok_or(AttestorError::VerificationUnavailable)?;

    let response = VerificationKeyResponse {
        protocol: key.protocol.clone(),
        curve: key.curve.clone(),
        n_public: key.n_public,
    };
    Ok((
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        Json(response),
    ))
}
