//! Composition root for the two end-to-end flows.
//!
//! `record_interaction` turns a content interaction into a verified stored
//! attestation; `request_targeted_content` turns a stored attestation set
//! into a verified threshold decision. The orchestrator owns no policy of
//! its own, every rejection from a collaborator propagates unmodified.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::crypto::AttestationSigner;
use crate::domain::{Attestation, ContentTag, VerificationReport, WalletAddress};
use crate::infra::{AttestationStore, AttestorError, ProofBackend, Result, WalletProvider};
use crate::proof::ProofVerificationService;

/// Outcome of recording one content interaction.
#[derive(Debug, Clone)]
pub struct RecordedInteraction {
    pub id: i64,
    pub attestation: Attestation,
}

/// Outcome of a targeting request: the full verification report plus the
/// single boolean the caller acts on.
#[derive(Debug, Clone)]
pub struct TargetingDecision {
    pub qualifies: bool,
    pub report: VerificationReport,
}

pub struct Orchestrator {
    signers: HashMap<String, AttestationSigner>,
    store: Arc<dyn AttestationStore>,
    proof_backend: Arc<dyn ProofBackend>,
    wallet_provider: Arc<dyn WalletProvider>,
    verification: Arc<ProofVerificationService>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn AttestationStore>,
        proof_backend: Arc<dyn ProofBackend>,
        wallet_provider: Arc<dyn WalletProvider>,
        verification: Arc<ProofVerificationService>,
    ) -> Self {
        Self {
            signers: HashMap::new(),
            store,
            proof_backend,
            wallet_provider,
            verification,
        }
    }

    /// Register the signer for a publisher domain. Later registrations for
    /// the same domain replace earlier ones.
    pub fn with_signer(mut self, signer: AttestationSigner) -> Self {
        self.signers.insert(signer.publisher().to_string(), signer);
        self
    }

    /// Sign an interaction on behalf of `publisher` and persist it through
    /// the verify-then-store path.
    #[instrument(skip(self), fields(tag = %tag, publisher))]
    pub async fn record_interaction(
        &self,
        tag: ContentTag,
        publisher: &str,
        wallet: &WalletAddress,
    ) -> Result<RecordedInteraction> {
        let signer = self
            .signers
            .get(publisher)
            .ok_or_else(|| AttestorError::UnknownPublisher(publisher.to_string()))?;

        let attestation = signer.sign_attestation(tag, wallet)?;
        let id = self.store.verify_and_store_attestation(&attestation).await?;

        info!(id, "interaction recorded");
        Ok(RecordedInteraction { id, attestation })
    }

    /// Prove and verify that the active wallet holds at least `threshold`
    /// attestations for `tag`.
    #[instrument(skip(self), fields(tag = %tag, threshold))]
    pub async fn request_targeted_content(
        &self,
        tag: ContentTag,
        threshold: u64,
    ) -> Result<TargetingDecision> {
        let wallet = self.wallet_provider.active_wallet().await?;
        let attestations = self.store.get_attestations(&wallet).await?;

        let package = self
            .proof_backend
            .prove(&wallet, tag, threshold, &attestations)
            .await?;

        let report = self
            .verification
            .verify_proof(&package.proof, &package.public_signals)?;
        let qualifies = report.results.proof_meets_threshold;

        info!(qualifies, "targeting decision computed");
        Ok(TargetingDecision { qualifies, report })
    }
}
