//! Proof-layer types: Groth16 proof shape, verification key, decoded results.
//!
//! These are ephemeral request/response types; none of them is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::infra::AttestorError;

/// The contract-fixed public-signal width: match count, threshold,
/// target-category index. Any other length is rejected before any
/// cryptography runs.
pub const PUBLIC_SIGNAL_COUNT: usize = 3;

/// A Groth16 proof as submitted by clients: two group-element pairs, one
/// pair-of-pairs, plus protocol and curve tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16Proof {
    pub pi_a: [String; 2],
    pub pi_b: [[String; 2]; 2],
    pub pi_c: [String; 2],
    pub protocol: String,
    pub curve: String,
}

impl Groth16Proof {
    /// Structural check over untrusted JSON. Rejection names the first
    /// missing or malformed field.
    pub fn from_value(value: &Value) -> Result<Groth16Proof, AttestorError> {
        let obj = value
            .as_object()
            .ok_or(AttestorError::InvalidProofFormat { field: "proof" })?;

        Ok(Groth16Proof {
            pi_a: element_pair(obj.get("pi_a"), "pi_a")?,
            pi_b: element_pair_of_pairs(obj.get("pi_b"), "pi_b")?,
            pi_c: element_pair(obj.get("pi_c"), "pi_c")?,
            protocol: tag_string(obj.get("protocol"), "protocol")?,
            curve: tag_string(obj.get("curve"), "curve")?,
        })
    }
}

fn field_element(value: &Value, field: &'static str) -> Result<String, AttestorError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(AttestorError::InvalidProofFormat { field }),
    }
}

fn element_pair(
    value: Option<&Value>,
    field: &'static str,
) -> Result<[String; 2], AttestorError> {
    let arr = value
        .and_then(Value::as_array)
        .filter(|a| a.len() == 2)
        .ok_or(AttestorError::InvalidProofFormat { field })?;
    Ok([
        field_element(&arr[0], field)?,
        field_element(&arr[1], field)?,
    ])
}

fn element_pair_of_pairs(
    value: Option<&Value>,
    field: &'static str,
) -> Result<[[String; 2]; 2], AttestorError> {
    let arr = value
        .and_then(Value::as_array)
        .filter(|a| a.len() == 2)
        .ok_or(AttestorError::InvalidProofFormat { field })?;
    Ok([
        element_pair(Some(&arr[0]), field)?,
        element_pair(Some(&arr[1]), field)?,
    ])
}

fn tag_string(value: Option<&Value>, field: &'static str) -> Result<String, AttestorError> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(AttestorError::InvalidProofFormat { field })
}

/// Verification key material, loaded once at process start and immutable
/// thereafter. Shape follows the snarkjs export format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationKey {
    pub protocol: String,
    pub curve: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: Vec<String>,
    pub vk_beta_2: Vec<Vec<String>>,
    pub vk_gamma_2: Vec<Vec<String>>,
    pub vk_delta_2: Vec<Vec<String>>,
    #[serde(rename = "IC")]
    pub ic: Vec<Vec<String>>,
}

impl VerificationKey {
    pub fn from_json_slice(bytes: &[u8]) -> Result<VerificationKey, AttestorError> {
        serde_json::from_slice(bytes).map_err(|e| {
            AttestorError::Internal(format!("failed to parse verification key: {e}"))
        })
    }

    pub fn from_json_file(path: &std::path::Path) -> Result<VerificationKey, AttestorError> {
        let bytes = std::fs::read(path).map_err(|e| {
            AttestorError::Internal(format!(
                "failed to read verification key at {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_slice(&bytes)
    }
}

/// Public signals decoded positionally into domain semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosedResults {
    /// Whether the proof disclosed at least one matching attestation.
    pub matched_tag: bool,
    pub tag_match_count: u64,
    pub threshold: u64,
    /// Decoded tag name, or the `unknown` sentinel for an out-of-range index.
    pub target_tag: String,
    /// `verified AND (tag_match_count >= threshold)`.
    pub proof_meets_threshold: bool,
}

/// Outcome of one proof verification call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub verified: bool,
    pub results: DisclosedResults,
    /// Signals as received, echoed back for the response metadata.
    pub public_signals: Vec<String>,
    pub protocol: String,
    pub curve: String,
    pub verification_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// What the external proof backend hands back for submission to the
/// verification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofPackage {
    pub proof: Value,
    pub public_signals: Vec<Value>,
}
