//! REST API layer.
//!
//! Stable error codes in `error`, wire DTOs in `types`, handlers organized
//! by domain, and the router in `rest`.

pub mod error;
pub mod extract;
pub mod handlers;
mod rest;
pub mod types;

pub use error::{ApiError, ErrorCode};
pub use extract::ApiJson;
pub use rest::router;
