//! Wire DTOs for the REST surface.
//!
//! Proof endpoints speak camelCase JSON; attestation and profile endpoints
//! reuse the domain wire types directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{DisclosedResults, VerificationReport};

/// Body of `POST /api/verify-proof`. Both fields are optional so that a
/// missing one is reported with a stable code instead of a deserialization
/// failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyProofRequest {
    pub proof: Option<Value>,
    pub public_signals: Option<Value>,
}

/// Successful response of `POST /api/verify-proof`. Returned with status
/// 200 for both outcomes of a completed verification; `valid` carries the
/// result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyProofResponse {
    pub valid: bool,
    pub results: DisclosedResults,
    pub metadata: VerificationMetadata,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMetadata {
    /// Wall-clock milliseconds spent in the pairing check.
    pub verification_time: u64,
    pub public_signals: Vec<String>,
    pub protocol: String,
    pub curve: String,
}

impl From<VerificationReport> for VerifyProofResponse {
    fn from(report: VerificationReport) -> Self {
        Self {
            valid: report.verified,
            results: report.results,
            metadata: VerificationMetadata {
                verification_time: report.verification_time_ms,
                public_signals: report.public_signals,
                protocol: report.protocol,
                curve: report.curve,
            },
            timestamp: report.timestamp,
        }
    }
}

/// Response of `GET /api/verification-key`: key metadata only, never the
/// raw curve points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationKeyResponse {
    pub protocol: String,
    pub curve: String,
    pub n_public: usize,
}

/// Response of `POST /api/attestations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreAttestationResponse {
    pub success: bool,
    pub id: i64,
}

/// Response of `DELETE /api/profiles/:wallet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetProfileResponse {
    pub success: bool,
    pub attestations_removed: u64,
    pub profiles_removed: u64,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Response of `GET /ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub database: &'static str,
}
