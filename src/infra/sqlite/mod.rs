//! SQLite implementation of the attestation store.

mod store;

pub use store::SqliteAttestationStore;
