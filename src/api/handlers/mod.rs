//! REST API handlers organized by domain.

pub mod attestations;
pub mod health;
pub mod profiles;
pub mod proofs;

pub use attestations::*;
pub use health::*;
pub use profiles::*;
pub use proofs::*;
