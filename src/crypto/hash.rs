//! Canonical attestation message construction and digests.
//!
//! The signer and verifier must compute byte-for-byte the same message from
//! the same structured fields. The message layout below is versioned and has
//! no floating serialization order; change it only together with a version
//! bump.

use sha3::{Digest, Keccak256};

/// 32-byte Keccak-256 digest.
pub type Digest32 = [u8; 32];

/// Fields bound into the canonical attestation message.
///
/// The publisher is deliberately absent: it is bound through the registered
/// signing key, not the message text.
#[derive(Debug, Clone, Copy)]
pub struct AttestationMessageParams<'a> {
    pub tag: &'a str,
    pub wallet: &'a str,
    pub timestamp: i64,
    pub nonce: &'a str,
}

/// Build the canonical message. Byte-identical for identical inputs.
pub fn format_attestation_message(params: &AttestationMessageParams<'_>) -> String {
    format!(
        "attestation/v1|tag={}|wallet={}|ts={}|nonce={}",
        params.tag, params.wallet, params.timestamp, params.nonce
    )
}

/// Keccak-256 over raw bytes.
pub fn keccak256(bytes: &[u8]) -> Digest32 {
    let mut hasher = Keccak256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Keccak-256 over the EIP-191 personal-message envelope, matching what
/// browser wallets sign.
pub fn eip191_digest(message: &str) -> Digest32 {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_empty_input_vector() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn message_is_byte_identical_across_calls() {
        let params = AttestationMessageParams {
            tag: "finance",
            wallet: "0x1111111111111111111111111111111111111111",
            timestamp: 1_700_000_000,
            nonce: "3c2574c8-4c40-49b7-8c4e-87a3cbf4a18f",
        };
        let first = format_attestation_message(&params);
        let second = format_attestation_message(&params);
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(
            first,
            "attestation/v1|tag=finance|wallet=0x1111111111111111111111111111111111111111|ts=1700000000|nonce=3c2574c8-4c40-49b7-8c4e-87a3cbf4a18f"
        );
    }

    #[test]
    fn message_changes_with_every_field() {
        let base = AttestationMessageParams {
            tag: "finance",
            wallet: "0x1111111111111111111111111111111111111111",
            timestamp: 1_700_000_000,
            nonce: "3c2574c8-4c40-49b7-8c4e-87a3cbf4a18f",
        };
        let baseline = format_attestation_message(&base);

        let mut changed = base;
        changed.tag = "travel";
        assert_ne!(format_attestation_message(&changed), baseline);

        let mut changed = base;
        changed.wallet = "0x2222222222222222222222222222222222222222";
        assert_ne!(format_attestation_message(&changed), baseline);

        let mut changed = base;
        changed.timestamp += 1;
        assert_ne!(format_attestation_message(&changed), baseline);

        let mut changed = base;
        changed.nonce = "00000000-0000-4000-8000-000000000000";
        assert_ne!(format_attestation_message(&changed), baseline);
    }

    #[test]
    fn eip191_digest_differs_from_raw_keccak() {
        let message = "attestation/v1|tag=finance|wallet=0x11|ts=1|nonce=n";
        assert_ne!(eip191_digest(message), keccak256(message.as_bytes()));
    }
}
