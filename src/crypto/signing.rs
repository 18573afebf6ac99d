//! Publisher signing and attestation verification.
//!
//! Attestations carry a 65-byte recoverable secp256k1 signature over the
//! EIP-191 digest of the canonical message. Verification recovers the signer
//! address from the signature and compares it case-insensitively against the
//! identity registered for the publisher.

use chrono::Utc;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use uuid::Uuid;

use crate::crypto::hash::{eip191_digest, format_attestation_message, keccak256, AttestationMessageParams};
use crate::domain::{Attestation, ContentTag, WalletAddress};

/// Length of a recoverable signature: r ‖ s ‖ v.
const SIGNATURE_LEN: usize = 65;

/// Error type for signing and verification operations
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid signature format")]
    InvalidSignatureFormat,

    #[error("invalid secret key format")]
    InvalidSecretKeyFormat,

    #[error("signature recovery failed")]
    RecoveryFailed,

    #[error("signature verification failed: recovered {recovered}, expected {expected}")]
    VerificationFailed { expected: String, recovered: String },

    #[error("signing failed: {0}")]
    SigningFailed(String),
}

// ============================================================================
// Publisher Signing Key
// ============================================================================

/// A publisher's secp256k1 signing keypair.
#[derive(Clone)]
pub struct PublisherSigningKey {
    signing_key: SigningKey,
}

impl PublisherSigningKey {
    /// Generate a new random signing key
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Create from a 32-byte secret scalar
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, SignatureError> {
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|_| SignatureError::InvalidSecretKeyFormat)?;
        Ok(Self { signing_key })
    }

    /// Parse from a hex string (with or without 0x prefix)
    pub fn from_hex(hex_str: &str) -> Result<Self, SignatureError> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes: [u8; 32] = hex::decode(hex_str)
            .map_err(|_| SignatureError::InvalidSecretKeyFormat)?
            .try_into()
            .map_err(|_| SignatureError::InvalidSecretKeyFormat)?;
        Self::from_bytes(&bytes)
    }

    /// Get the secret key bytes
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }

    /// The account address derived from this key's public half.
    pub fn address(&self) -> String {
        address_for_verifying_key(self.signing_key.verifying_key())
    }

    fn sign_digest(&self, digest: &[u8; 32]) -> Result<String, SignatureError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|e| SignatureError::SigningFailed(e.to_string()))?;

        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&signature.to_bytes());
        // Ethereum convention: v = 27 + recovery id
        out[64] = 27 + recovery_id.to_byte();
        Ok(format!("0x{}", hex::encode(out)))
    }
}

impl std::fmt::Debug for PublisherSigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublisherSigningKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Derive the hex account address for a secp256k1 public key.
pub fn address_for_verifying_key(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    // skip the 0x04 uncompressed-point marker
    let digest = keccak256(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

// ============================================================================
// Attestation Signer
// ============================================================================

/// Publisher-side attestation issuance.
///
/// Pure given the randomness of the nonce; no side effects.
#[derive(Debug, Clone)]
pub struct AttestationSigner {
    key: PublisherSigningKey,
    publisher: String,
}

impl AttestationSigner {
    pub fn new(key: PublisherSigningKey, publisher: impl Into<String>) -> Self {
        Self {
            key,
            publisher: publisher.into(),
        }
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    /// The identity attestations from this signer verify against.
    pub fn address(&self) -> String {
        self.key.address()
    }

    /// A fresh single-use UUID v4 nonce.
    pub fn generate_nonce() -> String {
        Uuid::new_v4().to_string()
    }

    /// Sign a canonical message string.
    pub fn sign_message(&self, message: &str) -> Result<String, SignatureError> {
        self.key.sign_digest(&eip191_digest(message))
    }

    /// Issue a complete attestation for one content interaction.
    ///
    /// Tag membership and wallet shape are enforced by the types; callers
    /// holding raw strings validate them at the boundary via
    /// [`ContentTag::parse`] and [`WalletAddress::parse`].
    pub fn sign_attestation(
        &self,
        tag: ContentTag,
        user_wallet: &WalletAddress,
    ) -> Result<Attestation, SignatureError> {
        let nonce = Self::generate_nonce();
        let timestamp = Utc::now().timestamp();

        let message = format_attestation_message(&AttestationMessageParams {
            tag: tag.as_str(),
            wallet: user_wallet.as_str(),
            timestamp,
            nonce: &nonce,
        });
        let signature = self.sign_message(&message)?;

        Ok(Attestation {
            tag,
            timestamp,
            nonce,
            signature,
            publisher: self.publisher.clone(),
            user_wallet: user_wallet.clone(),
        })
    }
}

// ============================================================================
// Attestation Verifier
// ============================================================================

/// Stateless attestation verification.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttestationVerifier;

impl AttestationVerifier {
    /// Recover the signer address for an attestation.
    ///
    /// The canonical message is always reconstructed from the structured
    /// fields; a cached message string on the record is never trusted, since
    /// an attacker could tamper the cache and payload together.
    pub fn recover_signer(attestation: &Attestation) -> Result<String, SignatureError> {
        let message = format_attestation_message(&AttestationMessageParams {
            tag: attestation.tag.as_str(),
            wallet: attestation.user_wallet.as_str(),
            timestamp: attestation.timestamp,
            nonce: &attestation.nonce,
        });
        let digest = eip191_digest(&message);

        let raw = attestation
            .signature
            .strip_prefix("0x")
            .unwrap_or(&attestation.signature);
        let bytes = hex::decode(raw).map_err(|_| SignatureError::InvalidSignatureFormat)?;
        if bytes.len() != SIGNATURE_LEN {
            return Err(SignatureError::InvalidSignatureFormat);
        }

        let signature = Signature::from_slice(&bytes[..64])
            .map_err(|_| SignatureError::InvalidSignatureFormat)?;
        let v = bytes[64];
        let recovery_byte = if v >= 27 { v - 27 } else { v };
        let recovery_id = RecoveryId::from_byte(recovery_byte)
            .ok_or(SignatureError::InvalidSignatureFormat)?;

        let verifying_key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id)
            .map_err(|_| SignatureError::RecoveryFailed)?;
        Ok(address_for_verifying_key(&verifying_key))
    }

    /// Verify an attestation against an expected signer address.
    ///
    /// Mismatch or a malformed signature is a rejection, never a panic.
    /// The same attestation verified against a different publisher's
    /// identity always fails.
    pub fn verify_attestation(
        attestation: &Attestation,
        expected_address: &str,
    ) -> Result<(), SignatureError> {
        let recovered = Self::recover_signer(attestation)?;
        if recovered.eq_ignore_ascii_case(expected_address.trim()) {
            Ok(())
        } else {
            Err(SignatureError::VerificationFailed {
                expected: expected_address.trim().to_ascii_lowercase(),
                recovered,
            })
        }
    }

    /// Verify against an identity derived from a given public key.
    pub fn verify_with_public_key(
        attestation: &Attestation,
        key: &VerifyingKey,
    ) -> Result<(), SignatureError> {
        Self::verify_attestation(attestation, &address_for_verifying_key(key))
    }
}

// ============================================================================
// Tests
// ============================================================================
