//! Port definitions for the attestation pipeline.
//!
//! Collaborators are explicit injected interfaces resolved once at startup;
//! nothing probes ambient globals at call time.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{
    Attestation, AttestationStats, CompleteUserProfile, ContentTag, ProofPackage, ResetCounts,
    StoredAttestation, UserProfile, WalletAddress,
};

use super::Result;

/// Validated, transactional persistence of attestations and profiles.
///
/// Invariant: no unverified attestation is ever persisted through
/// `verify_and_store_attestation`, and no multi-row write is partially
/// visible to readers.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AttestationStore: Send + Sync {
    /// Validate and insert one attestation; returns the generated id.
    async fn store_attestation(&self, attestation: &Attestation) -> Result<i64>;

    /// Resolve the publisher's registered identity, verify the signature,
    /// and only then insert. A failed verification never writes a row.
    async fn verify_and_store_attestation(&self, attestation: &Attestation) -> Result<i64>;

    /// Insert all rows within one transaction; any single failure rolls the
    /// entire batch back.
    async fn batch_store_attestations(&self, attestations: &[Attestation]) -> Result<Vec<i64>>;

    /// Atomically delete all attestation rows for a wallet and its profile
    /// row; returns counts of rows removed.
    async fn reset_user_profile(&self, wallet: &WalletAddress) -> Result<ResetCounts>;

    /// One logical read of profile + attestations + derived statistics.
    async fn get_complete_user_profile(
        &self,
        wallet: &WalletAddress,
    ) -> Result<CompleteUserProfile>;

    /// Attestation rows for one wallet, oldest first.
    async fn get_attestations(&self, wallet: &WalletAddress) -> Result<Vec<StoredAttestation>>;

    /// Cross-wallet aggregation by tag.
    async fn get_attestation_stats(&self) -> Result<AttestationStats>;

    /// Create or update a profile row.
    async fn upsert_user_profile(&self, profile: &UserProfile) -> Result<()>;
}

/// External proof backend: turns an attestation set and a threshold into an
/// opaque proof plus public signals. Out of scope beyond this interface.
///
/// Declining because the wallet holds too few attestations surfaces as
/// [`super::AttestorError::InsufficientAttestations`], which callers must be
/// able to distinguish from "proof produced but failed verification".
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProofBackend: Send + Sync {
    async fn prove(
        &self,
        wallet: &WalletAddress,
        tag: ContentTag,
        threshold: u64,
        attestations: &[StoredAttestation],
    ) -> Result<ProofPackage>;
}

/// External wallet provider supplying the active user identity.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn active_wallet(&self) -> Result<WalletAddress>;
}
