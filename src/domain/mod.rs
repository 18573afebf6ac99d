//! Core domain types for the attestation trust pipeline.

mod attestation;
mod profile;
mod proof;
mod publisher;
mod tag;

pub use attestation::{Attestation, StoredAttestation, WalletAddress};
pub use profile::{AttestationStats, CompleteUserProfile, ProfileStats, ResetCounts, UserProfile};
pub use proof::{
    DisclosedResults, Groth16Proof, ProofPackage, VerificationKey, VerificationReport,
    PUBLIC_SIGNAL_COUNT,
};
pub use publisher::PublisherRegistry;
pub use tag::{ContentTag, TAG_VOCABULARY, UNKNOWN_TAG};
