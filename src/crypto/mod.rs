//! Cryptographic operations for attestation issuance and verification.

pub mod hash;
pub mod signing;

pub use hash::{eip191_digest, format_attestation_message, keccak256, AttestationMessageParams};
pub use signing::{
    AttestationSigner, AttestationVerifier, PublisherSigningKey, SignatureError,
};
