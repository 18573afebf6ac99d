//! Attestation records and wallet identifiers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ContentTag;
use crate::infra::AttestorError;

/// Expected length of the hex portion of a wallet address.
const WALLET_HEX_LEN: usize = 40;

/// A validated, lowercase-normalized account address (`0x` + 40 hex chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and normalize an address, rejecting anything that is not
    /// `0x` followed by exactly 40 hex characters.
    pub fn parse(s: &str) -> Result<WalletAddress, AttestorError> {
        let trimmed = s.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .ok_or_else(|| AttestorError::Validation {
                field: "user_wallet",
                message: "wallet address must start with 0x".to_string(),
            })?;

        if hex_part.len() != WALLET_HEX_LEN
            || !hex_part.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(AttestorError::Validation {
                field: "user_wallet",
                message: format!(
                    "wallet address must be 0x followed by {WALLET_HEX_LEN} hex characters"
                ),
            });
        }

        Ok(WalletAddress(format!(
            "0x{}",
            hex_part.to_ascii_lowercase()
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive equality against another address string.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = AttestorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        WalletAddress::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

/// A signed claim that `user_wallet` engaged with `tag` content on
/// `publisher`. Immutable once stored; destroyed only by profile reset.
///
/// Wire format: `{tag, timestamp, nonce, signature, publisher, user_wallet}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub tag: ContentTag,
    /// Unix seconds, assigned by the signer.
    pub timestamp: i64,
    /// Single-use UUID v4.
    pub nonce: String,
    /// 0x-hex, 65-byte recoverable secp256k1 signature over the canonical
    /// message digest.
    pub signature: String,
    /// Publisher domain mapped to a registered signer address.
    pub publisher: String,
    pub user_wallet: WalletAddress,
}

/// An attestation as persisted, with the store-assigned id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAttestation {
    pub id: i64,
    #[serde(flatten)]
    pub attestation: Attestation,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_parse_normalizes_case() {
        let wallet =
            WalletAddress::parse("0xABCDEFabcdef0123456789ABCDEFabcdef012345").unwrap();
        assert_eq!(
            wallet.as_str(),
            "0xabcdefabcdef0123456789abcdefabcdef012345"
        );
        assert!(wallet.matches("0xABCDEFABCDEF0123456789ABCDEFABCDEF012345"));
    }

    #[test]
    fn wallet_parse_rejects_bad_shapes() {
        // missing prefix
        assert!(WalletAddress::parse("abcdefabcdef0123456789abcdefabcdef012345").is_err());
        // too short
        assert!(WalletAddress::parse("0xabc").is_err());
        // too long
        assert!(
            WalletAddress::parse("0xabcdefabcdef0123456789abcdefabcdef0123456").is_err()
        );
        // non-hex characters
        assert!(
            WalletAddress::parse("0xzzcdefabcdef0123456789abcdefabcdef012345").is_err()
        );
    }

    #[test]
    fn wallet_serde_round_trip() {
        let wallet =
            WalletAddress::parse("0x1111111111111111111111111111111111111111").unwrap();
        let json = serde_json::to_string(&wallet).unwrap();
        assert_eq!(json, "\"0x1111111111111111111111111111111111111111\"");
        let back: WalletAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wallet);
    }

    #[test]
    fn wallet_deserialization_rejects_invalid() {
        let result: Result<WalletAddress, _> = serde_json::from_str("\"0xnot-a-wallet\"");
        assert!(result.is_err());
    }
}
