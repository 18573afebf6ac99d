//! User profile handlers.

use axum::extract::{Path, State};
use axum::Json;
use tracing::instrument;

use crate::api::error::ApiError;
use crate::api::types::ResetProfileResponse;
use crate::domain::{CompleteUserProfile, WalletAddress};
use crate::server::AppState;

/// GET /api/profiles/:wallet - Profile, attestations, and derived stats in
/// one read.
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<Json<CompleteUserProfile>, ApiError> {
    let wallet = WalletAddress::parse(&wallet)?;
    let profile = state.store.get_complete_user_profile(&wallet).await?;
    Ok(Json(profile))
}

/// DELETE /api/profiles/:wallet - Atomically remove all attestations and
/// the profile row for a wallet.
#[instrument(skip(state))]
pub async fn reset_profile(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<Json<ResetProfileResponse>, ApiError> {
    let wallet = WalletAddress::parse(&wallet)?;
    let counts = state.store.reset_user_profile(&wallet).await?;
    Ok(Json(ResetProfileResponse {
        success: true,
        attestations_removed: counts.attestations_removed,
        profiles_removed: counts.profiles_removed,
    }))
}
