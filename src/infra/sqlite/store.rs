//! SQLite attestation store.
//!
//! Single-row inserts are implicitly atomic; every write touching more than
//! one row (batch insert, profile reset) runs inside one explicit transaction
//! with full rollback on any failure. Signature verification always completes
//! before a transaction opens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::crypto::AttestationVerifier;
use crate::domain::{
    Attestation, AttestationStats, CompleteUserProfile, ContentTag, ProfileStats,
    PublisherRegistry, ResetCounts, StoredAttestation, UserProfile, WalletAddress,
};
use crate::infra::{AttestationStore, AttestorError, Result};

/// SQLite-backed store for attestations and user profiles.
pub struct SqliteAttestationStore {
    pool: SqlitePool,
    registry: Arc<PublisherRegistry>,
}

impl SqliteAttestationStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: SqlitePool, registry: Arc<PublisherRegistry>) -> Self {
        Self { pool, registry }
    }

    /// Create a store from a database path.
    pub async fn from_path(path: &str, registry: Arc<PublisherRegistry>) -> Result<Self> {
        let pool = SqlitePool::connect(path).await?;
        Ok(Self::new(pool, registry))
    }

    /// Apply the embedded schema migrations.
    pub async fn initialize(&self) -> Result<()> {
        crate::migrations::run_sqlite(&self.pool)
            .await
            .map_err(|e| AttestorError::Internal(e.to_string()))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Validate presence and shape of every required field.
    ///
    /// Tag membership and wallet shape are already enforced by the types;
    /// the remaining string fields are checked here so violations identify
    /// the offending field.
    fn validate_attestation(attestation: &Attestation) -> Result<()> {
        match Uuid::parse_str(&attestation.nonce) {
            Ok(nonce) if nonce.get_version_num() == 4 => {}
            _ => {
                return Err(AttestorError::Validation {
                    field: "nonce",
                    message: "nonce must be a version 4 UUID".to_string(),
                })
            }
        }
        if attestation.timestamp <= 0 {
            return Err(AttestorError::Validation {
                field: "timestamp",
                message: "timestamp must be positive unix seconds".to_string(),
            });
        }
        let raw = attestation
            .signature
            .strip_prefix("0x")
            .unwrap_or(&attestation.signature);
        match hex::decode(raw) {
            Ok(bytes) if bytes.len() == 65 => {}
            _ => {
                return Err(AttestorError::Validation {
                    field: "signature",
                    message: "signature must be 0x-hex encoding 65 bytes".to_string(),
                })
            }
        }
        if attestation.publisher.trim().is_empty() {
            return Err(AttestorError::Validation {
                field: "publisher",
                message: "publisher must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Insert one row on an arbitrary executor (pool or open transaction).
    async fn insert_attestation<'e, E>(executor: E, attestation: &Attestation) -> Result<i64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO attestations (
                tag, timestamp, nonce, signature, publisher, user_wallet, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(attestation.tag.as_str())
        .bind(attestation.timestamp)
        .bind(&attestation.nonce)
        .bind(&attestation.signature)
        .bind(&attestation.publisher)
        .bind(attestation.user_wallet.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(executor)
        .await
        .map_err(|e| Self::map_insert_error(e, &attestation.nonce))?;

        Ok(result.last_insert_rowid())
    }

    fn map_insert_error(error: sqlx::Error, nonce: &str) -> AttestorError {
        if let sqlx::Error::Database(ref db) = error {
            if db.is_unique_violation() {
                return AttestorError::DuplicateNonce(nonce.to_string());
            }
        }
        AttestorError::Database(error)
    }

    async fn fetch_attestations<'e, E>(
        executor: E,
        wallet: &WalletAddress,
    ) -> Result<Vec<StoredAttestation>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query_as::<_, AttestationRow>(
            r#"
            SELECT id, tag, timestamp, nonce, signature, publisher, user_wallet, created_at
            FROM attestations
            WHERE user_wallet = ?
            ORDER BY id ASC
            "#,
        )
        .bind(wallet.as_str())
        .fetch_all(executor)
        .await?;

        rows.into_iter().map(StoredAttestation::try_from).collect()
    }

    async fn fetch_profile<'e, E>(executor: E, wallet: &WalletAddress) -> Result<Option<UserProfile>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT wallet_address, signed_profile_claim, self_proof, created_at, updated_at
            FROM user_profiles
            WHERE wallet_address = ?
            "#,
        )
        .bind(wallet.as_str())
        .fetch_optional(executor)
        .await?;

        row.map(UserProfile::try_from).transpose()
    }
}

#[async_trait]
impl AttestationStore for SqliteAttestationStore {
    #[instrument(skip(self, attestation), fields(publisher = %attestation.publisher))]
    async fn store_attestation(&self, attestation: &Attestation) -> Result<i64> {
        Self::validate_attestation(attestation)?;
        let id = Self::insert_attestation(&self.pool, attestation).await?;
        debug!(id, "attestation stored");
        Ok(id)
    }

    #[instrument(skip(self, attestation), fields(publisher = %attestation.publisher))]
    async fn verify_and_store_attestation(&self, attestation: &Attestation) -> Result<i64> {
        Self::validate_attestation(attestation)?;

        // CPU-bound verification runs to completion before any transaction
        // opens; a failed verification never writes a row.
        let expected = self.registry.require(&attestation.publisher)?;
        AttestationVerifier::verify_attestation(attestation, expected.as_str())?;

        let id = Self::insert_attestation(&self.pool, attestation).await?;
        debug!(id, "attestation verified and stored");
        Ok(id)
    }

    #[instrument(skip(self, attestations), fields(count = attestations.len()))]
    async fn batch_store_attestations(&self, attestations: &[Attestation]) -> Result<Vec<i64>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(attestations.len());

        for attestation in attestations {
            // Any validation or insert failure drops the transaction and
            // rolls back every row inserted so far.
            Self::validate_attestation(attestation)?;
            ids.push(Self::insert_attestation(&mut *tx, attestation).await?);
        }

        tx.commit().await?;
        Ok(ids)
    }

    #[instrument(skip(self), fields(wallet = %wallet))]
    async fn reset_user_profile(&self, wallet: &WalletAddress) -> Result<ResetCounts> {
        let mut tx = self.pool.begin().await?;

        let attestations_removed = sqlx::query("DELETE FROM attestations WHERE user_wallet = ?")
            .bind(wallet.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let profiles_removed = sqlx::query("DELETE FROM user_profiles WHERE wallet_address = ?")
            .bind(wallet.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        // Both deletes commit together or not at all.
        tx.commit().await?;

        debug!(attestations_removed, profiles_removed, "profile reset");
        Ok(ResetCounts {
            attestations_removed,
            profiles_removed,
        })
    }

    async fn get_complete_user_profile(
        &self,
        wallet: &WalletAddress,
    ) -> Result<CompleteUserProfile> {
        // Both reads come from one transaction so the profile and its
        // attestation set reflect a single point in time.
        let mut tx = self.pool.begin().await?;
        let profile = Self::fetch_profile(&mut *tx, wallet).await?;
        let attestations = Self::fetch_attestations(&mut *tx, wallet).await?;
        tx.commit().await?;

        let stats = ProfileStats::from_attestations(&attestations);

        Ok(CompleteUserProfile {
            wallet_address: wallet.clone(),
            profile,
            attestations,
            stats,
        })
    }

    async fn get_attestations(&self, wallet: &WalletAddress) -> Result<Vec<StoredAttestation>> {
        Self::fetch_attestations(&self.pool, wallet).await
    }

    async fn get_attestation_stats(&self) -> Result<AttestationStats> {
        let per_tag_rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT tag, COUNT(*) FROM attestations GROUP BY tag")
                .fetch_all(&self.pool)
                .await?;

        let (total, distinct_wallets): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(DISTINCT user_wallet) FROM attestations",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(AttestationStats {
            total_attestations: total as u64,
            distinct_wallets: distinct_wallets as u64,
            per_tag: per_tag_rows
                .into_iter()
                .map(|(tag, count)| (tag, count as u64))
                .collect(),
        })
    }

    async fn upsert_user_profile(&self, profile: &UserProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (
                wallet_address, signed_profile_claim, self_proof, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(wallet_address) DO UPDATE SET
                signed_profile_claim = excluded.signed_profile_claim,
                self_proof = excluded.self_proof,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(profile.wallet_address.as_str())
        .bind(&profile.signed_profile_claim)
        .bind(&profile.self_proof)
        .bind(profile.created_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Raw row from the attestations table
#[derive(Debug, FromRow)]
struct AttestationRow {
    id: i64,
    tag: String,
    timestamp: i64,
    nonce: String,
    signature: String,
    publisher: String,
    user_wallet: String,
    created_at: String,
}

impl TryFrom<AttestationRow> for StoredAttestation {
    type Error = AttestorError;

    fn try_from(row: AttestationRow) -> Result<Self> {
        let tag = ContentTag::parse(&row.tag)
            .map_err(|_| AttestorError::Internal(format!("invalid stored tag: {}", row.tag)))?;
        let user_wallet = WalletAddress::parse(&row.user_wallet)?;
        let created_at = parse_rfc3339(&row.created_at, "created_at")?;

        Ok(StoredAttestation {
            id: row.id,
            attestation: Attestation {
                tag,
                timestamp: row.timestamp,
                nonce: row.nonce,
                signature: row.signature,
                publisher: row.publisher,
                user_wallet,
            },
            created_at,
        })
    }
}

/// Raw row from the user_profiles table
#[derive(Debug, FromRow)]
struct ProfileRow {
    wallet_address: String,
    signed_profile_claim: Option<String>,
    self_proof: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = AttestorError;

    fn try_from(row: ProfileRow) -> Result<Self> {
        Ok(UserProfile {
            wallet_address: WalletAddress::parse(&row.wallet_address)?,
            signed_profile_claim: row.signed_profile_claim,
            self_proof: row.self_proof,
            created_at: parse_rfc3339(&row.created_at, "created_at")?,
            updated_at: parse_rfc3339(&row.updated_at, "updated_at")?,
        })
    }
}

fn parse_rfc3339(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AttestorError::Internal(format!("invalid {column}: {e}")))
}
