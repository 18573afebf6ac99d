//! User profiles and derived attestation statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{StoredAttestation, WalletAddress};

/// One profile per wallet; related 1:N to attestations by `user_wallet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub wallet_address: WalletAddress,
    pub signed_profile_claim: Option<String>,
    /// Opaque self-sovereign proof blob; not interpreted by this service.
    pub self_proof: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(wallet_address: WalletAddress) -> Self {
        let now = Utc::now();
        Self {
            wallet_address,
            signed_profile_claim: None,
            self_proof: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Statistics derived from one wallet's attestation set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileStats {
    pub total_attestations: u64,
    /// Attestation count per tag name.
    pub per_tag: BTreeMap<String, u64>,
    /// Distinct publishers that issued attestations for this wallet.
    pub publishers: Vec<String>,
    pub earliest_timestamp: Option<i64>,
    pub latest_timestamp: Option<i64>,
}

impl ProfileStats {
    /// Derive statistics from a committed attestation set.
    pub fn from_attestations(attestations: &[StoredAttestation]) -> Self {
        let mut per_tag: BTreeMap<String, u64> = BTreeMap::new();
        let mut publishers: Vec<String> = Vec::new();
        let mut earliest: Option<i64> = None;
        let mut latest: Option<i64> = None;

        for stored in attestations {
            let a = &stored.attestation;
            *per_tag.entry(a.tag.as_str().to_string()).or_insert(0) += 1;
            if !publishers.contains(&a.publisher) {
                publishers.push(a.publisher.clone());
            }
            earliest = Some(earliest.map_or(a.timestamp, |e: i64| e.min(a.timestamp)));
            latest = Some(latest.map_or(a.timestamp, |l: i64| l.max(a.timestamp)));
        }

        ProfileStats {
            total_attestations: attestations.len() as u64,
            per_tag,
            publishers,
            earliest_timestamp: earliest,
            latest_timestamp: latest,
        }
    }
}

/// A single logical read of profile + attestations + derived statistics.
/// Reflects only fully committed writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteUserProfile {
    pub wallet_address: WalletAddress,
    pub profile: Option<UserProfile>,
    pub attestations: Vec<StoredAttestation>,
    pub stats: ProfileStats,
}

/// Rows removed by a profile reset. Both deletes commit together or not at
/// all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetCounts {
    pub attestations_removed: u64,
    pub profiles_removed: u64,
}

/// Cross-wallet aggregation by tag, for platform-level reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttestationStats {
    pub total_attestations: u64,
    pub distinct_wallets: u64,
    pub per_tag: BTreeMap<String, u64>,
}
