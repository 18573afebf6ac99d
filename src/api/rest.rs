//! Route table for the REST surface.

use axum::routing::{get, post};
use axum::Router;

use crate::api::handlers::{
    attestation_stats, get_profile, health_check, readiness_check, reset_profile,
    store_attestation, verification_key, verify_proof,
};
use crate::server::AppState;

/// Build the service router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/verify-proof", post(verify_proof))
        .route("/api/verification-key", get(verification_key))
        .route("/api/attestations", post(store_attestation))
        .route(
            "/api/profiles/:wallet",
            get(get_profile).delete(reset_profile),
        )
        .route("/api/stats", get(attestation_stats))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
}
