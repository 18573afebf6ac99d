//! Attestor Library
//!
//! Trust pipeline for signed content-engagement attestations and
//! zero-knowledge threshold-proof verification.
//!
//! ## Modules
//!
//! - [`domain`] - Core domain types (tags, attestations, profiles, proofs)
//! - [`crypto`] - Canonical message construction and recoverable signing
//! - [`infra`] - Storage ports and the SQLite attestation store
//! - [`proof`] - Proof verification service and pairing-engine port
//! - [`orchestrator`] - Composition of the interaction and targeting flows
//! - [`api`] - REST API routes and stable error codes
//! - [`server`] - HTTP server bootstrap

pub mod api;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod migrations;
pub mod orchestrator;
pub mod proof;
pub mod server;

// Re-export commonly used types
pub use domain::{
    Attestation, AttestationStats, CompleteUserProfile, ContentTag, Groth16Proof, ProofPackage,
    PublisherRegistry, ResetCounts, StoredAttestation, UserProfile, VerificationKey,
    VerificationReport, WalletAddress, PUBLIC_SIGNAL_COUNT,
};

pub use crypto::{AttestationSigner, AttestationVerifier, PublisherSigningKey};

pub use infra::{
    AttestationStore, AttestorError, ProofBackend, Result, SqliteAttestationStore, WalletProvider,
};

pub use proof::{PairingEngine, ProofVerificationService, RejectAllEngine};
