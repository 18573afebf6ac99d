//! Infrastructure: error taxonomy, port traits, SQLite persistence.

mod error;
pub mod sqlite;
mod traits;

pub use error::{AttestorError, Result};
pub use sqlite::SqliteAttestationStore;
pub use traits::{AttestationStore, ProofBackend, WalletProvider};

#[cfg(test)]
pub use traits::{MockAttestationStore, MockProofBackend, MockWalletProvider};
