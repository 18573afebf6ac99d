//! Canonical content-tag vocabulary.
//!
//! One ordered enumeration is shared by the signer, the verifier, the store,
//! and the proof decoder. The position of each tag doubles as the
//! target-category index disclosed in proof public signals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::infra::AttestorError;

/// Sentinel returned when a disclosed target-category index is out of range.
pub const UNKNOWN_TAG: &str = "unknown";

/// Content categories a publisher may attest engagement with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentTag {
    Finance,
    Privacy,
    Travel,
    Gaming,
    Defi,
    Technology,
}

/// The fixed, ordered tag dictionary. Index positions are part of the
/// public-signal contract and must never be reordered.
pub const TAG_VOCABULARY: [ContentTag; 6] = [
    ContentTag::Finance,
    ContentTag::Privacy,
    ContentTag::Travel,
    ContentTag::Gaming,
    ContentTag::Defi,
    ContentTag::Technology,
];

impl ContentTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTag::Finance => "finance",
            ContentTag::Privacy => "privacy",
            ContentTag::Travel => "travel",
            ContentTag::Gaming => "gaming",
            ContentTag::Defi => "defi",
            ContentTag::Technology => "technology",
        }
    }

    /// Position of this tag in the dictionary.
    pub fn index(&self) -> u64 {
        match self {
            ContentTag::Finance => 0,
            ContentTag::Privacy => 1,
            ContentTag::Travel => 2,
            ContentTag::Gaming => 3,
            ContentTag::Defi => 4,
            ContentTag::Technology => 5,
        }
    }

    /// Decode a dictionary index disclosed in public signals.
    ///
    /// Out-of-range indices yield `None`; callers map that to [`UNKNOWN_TAG`].
    pub fn from_index(index: u64) -> Option<ContentTag> {
        usize::try_from(index)
            .ok()
            .and_then(|i| TAG_VOCABULARY.get(i).copied())
    }

    /// Name for a disclosed index, falling back to the `unknown` sentinel.
    /// This path never fails.
    pub fn name_for_index(index: u64) -> &'static str {
        Self::from_index(index)
            .map(|t| t.as_str())
            .unwrap_or(UNKNOWN_TAG)
    }

    /// Parse a tag string, rejecting anything outside the vocabulary with a
    /// field-identified validation error.
    pub fn parse(s: &str) -> Result<ContentTag, AttestorError> {
        TAG_VOCABULARY
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| AttestorError::Validation {
                field: "tag",
                message: format!("'{s}' is not in the allowed tag vocabulary"),
            })
    }
}

impl fmt::Display for ContentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentTag {
    type Err = AttestorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentTag::parse(s)
    }
}
