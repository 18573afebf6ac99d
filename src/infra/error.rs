//! Error types for the attestation trust pipeline.

use thiserror::Error;

use crate::crypto::SignatureError;
use crate::domain::PUBLIC_SIGNAL_COUNT;

/// Errors that can occur across the signing, storage, and proof layers.
///
/// Validation-class variants identify the offending field and are
/// client-correctable; `Database` is retryable and never partially commits;
/// `VerificationUnavailable` must never be read as "proof invalid".
#[derive(Error, Debug)]
pub enum AttestorError {
    /// Field-identified validation failure
    #[error("validation failed for field '{field}': {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Publisher domain has no registered signing identity
    #[error("unknown publisher: {0}")]
    UnknownPublisher(String),

    /// Signing precondition violated; fails closed
    #[error("cryptography error: {0}")]
    Cryptography(String),

    /// Tamper or wrong identity; always rejects
    #[error(transparent)]
    SignatureVerification(#[from] SignatureError),

    /// Nonce reuse across attestations
    #[error("duplicate nonce: {0}")]
    DuplicateNonce(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Verification key not loaded; distinct from "proof invalid"
    #[error("proof verification unavailable: verification key not loaded")]
    VerificationUnavailable,

    /// Proof object missing or malformed at a named field
    #[error("invalid proof format: missing or malformed field '{field}'")]
    InvalidProofFormat { field: &'static str },

    /// Public signals are not an array of field elements
    #[error("public signals must be an array of {PUBLIC_SIGNAL_COUNT} field elements")]
    InvalidPublicSignalsFormat,

    /// Wrong public-signal count; rejected before any cryptography runs
    #[error("invalid public signals length: expected {expected}, received {received}")]
    InvalidPublicSignalsLength { expected: usize, received: usize },

    /// Public-signal element is not a nonnegative integer
    #[error(
        "invalid public signal at index {index}: expected nonnegative integer, found {found}"
    )]
    InvalidPublicSignalType { index: usize, found: &'static str },

    /// Pairing primitive raised; treated as a client-class rejection
    #[error("proof rejected by pairing verification")]
    ProofRejected,

    /// Proof backend declined to produce a proof
    #[error("insufficient attestations for proof: have {have}, need {need}")]
    InsufficientAttestations { have: usize, need: u64 },

    /// Proof backend failure other than declining
    #[error("proof backend error: {0}")]
    ProofBackend(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, AttestorError>;
