//! Strict Groth16 proof verification.
//!
//! The verification key is loaded once at startup; if it is absent the
//! service runs in unavailable mode and every verification request fails
//! closed. Structural checks on the proof and public signals run before
//! any pairing work, so malformed input never reaches the engine.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    ContentTag, DisclosedResults, Groth16Proof, VerificationKey, VerificationReport,
    PUBLIC_SIGNAL_COUNT,
};
use crate::infra::{AttestorError, Result};

/// Failure inside the pairing computation itself, as opposed to a proof
/// that checked out as invalid.
#[derive(Debug, Error)]
#[error("pairing check failed: {0}")]
pub struct PairingError(pub String);

/// The pairing computation behind [`ProofVerificationService`].
///
/// CPU-bound and synchronous; callers own any off-thread scheduling.
/// `Ok(false)` means the proof verified as invalid, `Err` means the check
/// itself could not run. The two outcomes are surfaced differently.
pub trait PairingEngine: Send + Sync {
    fn verify(
        &self,
        key: &VerificationKey,
        public_signals: &[u64],
        proof: &Groth16Proof,
    ) -> std::result::Result<bool, PairingError>;
}

/// Fail-closed default engine: treats every proof as invalid.
///
/// Used when no real pairing backend is wired in, so a misconfigured
/// deployment can never accept a proof.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectAllEngine;

impl PairingEngine for RejectAllEngine {
    fn verify(
        &self,
        _key: &VerificationKey,
        _public_signals: &[u64],
        _proof: &Groth16Proof,
    ) -> std::result::Result<bool, PairingError> {
        Ok(false)
    }
}

/// Verifies submitted proofs against the fixed public-signal contract.
pub struct ProofVerificationService {
    key: Option<Arc<VerificationKey>>,
    engine: Arc<dyn PairingEngine>,
}

impl ProofVerificationService {
    pub fn new(key: VerificationKey, engine: Arc<dyn PairingEngine>) -> Self {
        info!(
            protocol = %key.protocol,
            curve = %key.curve,
            n_public = key.n_public,
            "verification key loaded"
        );
        Self {
            key: Some(Arc::new(key)),
            engine,
        }
    }

    /// Construct a service with no verification key. Every call to
    /// [`verify_proof`](Self::verify_proof) will fail closed.
    pub fn unavailable(engine: Arc<dyn PairingEngine>) -> Self {
        warn!("no verification key configured, proof verification is unavailable");
        Self { key: None, engine }
    }

    pub fn is_available(&self) -> bool {
        self.key.is_some()
    }

    /// The loaded key, for the key-distribution endpoint.
    pub fn verification_key(&self) -> Option<&VerificationKey> {
        self.key.as_deref()
    }

    /// Run the full verification pipeline over untrusted input.
    ///
    /// Order is fixed: availability, proof structure, signal arity, signal
    /// types, then the pairing check. The first failure wins and no later
    /// stage runs.
    pub fn verify_proof(
        &self,
        proof: &Value,
        public_signals: &[Value],
    ) -> Result<VerificationReport> {
        let key = self
            .key
            .as_ref()
            .ok_or(AttestorError::VerificationUnavailable)?;

        let parsed = Groth16Proof::from_value(proof)?;

        if public_signals.len() != PUBLIC_SIGNAL_COUNT {
            return Err(AttestorError::InvalidPublicSignalsLength {
                expected: PUBLIC_SIGNAL_COUNT,
                received: public_signals.len(),
            });
        }
        let signals = decode_signals(public_signals)?;

        let started = Instant::now();
        let verified = match self.engine.verify(key, &signals, &parsed) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "pairing engine failure");
                return Err(AttestorError::ProofRejected);
            }
        };
        let verification_time_ms = started.elapsed().as_millis() as u64;

        let results = decode_disclosed(&signals, verified);
        info!(
            verified,
            tag_match_count = results.tag_match_count,
            threshold = results.threshold,
            target_tag = %results.target_tag,
            verification_time_ms,
            "proof verification completed"
        );

        Ok(VerificationReport {
            verified,
            results,
            public_signals: signals.iter().map(u64::to_string).collect(),
            protocol: parsed.protocol,
            curve: parsed.curve,
            verification_time_ms,
            timestamp: Utc::now(),
        })
    }
}

/// Decode each signal as a non-negative integer, accepting decimal strings
/// and JSON numbers. Anything else is rejected with its position.
fn decode_signals(values: &[Value]) -> Result<Vec<u64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::String(s) => s.parse::<u64>().map_err(|_| {
                AttestorError::InvalidPublicSignalType {
                    index,
                    found: "string",
                }
            }),
            Value::Number(n) => n
                .as_u64()
                .ok_or(AttestorError::InvalidPublicSignalType {
                    index,
                    found: "number",
                }),
            other => Err(AttestorError::InvalidPublicSignalType {
                index,
                found: json_type_name(other),
            }),
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Map positional signals into domain semantics. Total: an out-of-range
/// tag index decodes to the unknown sentinel rather than an error.
fn decode_disclosed(signals: &[u64], verified: bool) -> DisclosedResults {
    let tag_match_count = signals[0];
    let threshold = signals[1];
    let target_tag = ContentTag::name_for_index(signals[2]).to_string();

    DisclosedResults {
        matched_tag: tag_match_count >= 1,
        tag_match_count,
        threshold,
        target_tag,
        proof_meets_threshold: verified && tag_match_count >= threshold,
    }
}
