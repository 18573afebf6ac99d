//! Structured API error responses with stable error codes.
//!
//! Clients branch on the string code (and the field/position details), never
//! on message text. Internal exception text stays on the server side; only
//! codes and field identifiers cross the boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::infra::AttestorError;

// ============================================================================
// Error Codes
// ============================================================================

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Request validation errors (3xxx)
    /// Required request parameter is missing
    MissingParameters,
    /// Request body is malformed
    InvalidRequestBody,
    /// Field value is invalid
    InvalidFieldValue,
    /// Publisher domain has no registered signing identity
    UnknownPublisher,

    // Proof errors (4xxx)
    /// Proof object missing or malformed at a named field
    InvalidProofFormat,
    /// Public signals are not an array
    InvalidPublicSignalsFormat,
    /// Wrong public-signal count
    InvalidPublicSignalsLength,
    /// Public-signal element is not a nonnegative integer
    InvalidPublicSignalType,
    /// Proof rejected by pairing verification
    VerificationFailed,
    /// Verification key not loaded
    VerificationKeyUnavailable,
    /// Proof verification is not available
    VerificationUnavailable,
    /// Unexpected fault inside the verification service
    VerificationServiceError,

    // Attestation errors (5xxx)
    /// Attestation signature did not verify
    SignatureVerificationFailed,
    /// Nonce has already been used
    DuplicateNonce,
    /// Too few attestations to produce a proof
    InsufficientAttestations,

    // Infrastructure errors (8xxx)
    /// Database operation failed
    DatabaseError,
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn numeric_code(&self) -> u32 {
        match self {
            // Request validation (3xxx)
            ErrorCode::MissingParameters => 3001,
            ErrorCode::InvalidRequestBody => 3002,
            ErrorCode::InvalidFieldValue => 3003,
            ErrorCode::UnknownPublisher => 3004,

            // Proof (4xxx)
            ErrorCode::InvalidProofFormat => 4001,
            ErrorCode::InvalidPublicSignalsFormat => 4002,
            ErrorCode::InvalidPublicSignalsLength => 4003,
            ErrorCode::InvalidPublicSignalType => 4004,
            ErrorCode::VerificationFailed => 4005,
            ErrorCode::VerificationKeyUnavailable => 4006,
            ErrorCode::VerificationUnavailable => 4007,
            ErrorCode::VerificationServiceError => 4008,

            // Attestation (5xxx)
            ErrorCode::SignatureVerificationFailed => 5001,
            ErrorCode::DuplicateNonce => 5002,
            ErrorCode::InsufficientAttestations => 5003,

            // Infrastructure (8xxx)
            ErrorCode::DatabaseError => 8001,
            ErrorCode::InternalError => 8999,
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Request validation -> 400
            ErrorCode::MissingParameters => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidRequestBody => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidFieldValue => StatusCode::BAD_REQUEST,
            ErrorCode::UnknownPublisher => StatusCode::BAD_REQUEST,

            // Proof -> 400 except availability and internal faults
            ErrorCode::InvalidProofFormat => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidPublicSignalsFormat => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidPublicSignalsLength => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidPublicSignalType => StatusCode::BAD_REQUEST,
            ErrorCode::VerificationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::VerificationKeyUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::VerificationUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::VerificationServiceError => StatusCode::INTERNAL_SERVER_ERROR,

            // Attestation -> 400/409
            ErrorCode::SignatureVerificationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::DuplicateNonce => StatusCode::CONFLICT,
            ErrorCode::InsufficientAttestations => StatusCode::BAD_REQUEST,

            // Infrastructure -> 500
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code_str = match self {
            ErrorCode::MissingParameters => "MISSING_PARAMETERS",
            ErrorCode::InvalidRequestBody => "INVALID_REQUEST_BODY",
            ErrorCode::InvalidFieldValue => "INVALID_FIELD_VALUE",
            ErrorCode::UnknownPublisher => "UNKNOWN_PUBLISHER",
            ErrorCode::InvalidProofFormat => "INVALID_PROOF_FORMAT",
            ErrorCode::InvalidPublicSignalsFormat => "INVALID_PUBLIC_SIGNALS_FORMAT",
            ErrorCode::InvalidPublicSignalsLength => "INVALID_PUBLIC_SIGNALS_LENGTH",
            ErrorCode::InvalidPublicSignalType => "INVALID_PUBLIC_SIGNAL_TYPE",
            ErrorCode::VerificationFailed => "VERIFICATION_FAILED",
            ErrorCode::VerificationKeyUnavailable => "VERIFICATION_KEY_UNAVAILABLE",
            ErrorCode::VerificationUnavailable => "VERIFICATION_UNAVAILABLE",
            ErrorCode::VerificationServiceError => "VERIFICATION_SERVICE_ERROR",
            ErrorCode::SignatureVerificationFailed => "SIGNATURE_VERIFICATION_FAILED",
            ErrorCode::DuplicateNonce => "DUPLICATE_NONCE",
            ErrorCode::InsufficientAttestations => "INSUFFICIENT_ATTESTATIONS",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", code_str)
    }
}

// ============================================================================
// Structured Error Response
// ============================================================================

/// Structured error response for API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error details
    pub error: ErrorDetails,
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Numeric error code for easy categorization
    pub numeric_code: u32,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (offending field, expected/received counts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetails {
                code,
                numeric_code: code.numeric_code(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Set additional details
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }

    /// Get the HTTP status code
    pub fn status(&self) -> StatusCode {
        self.error.code.http_status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code_str = self.error.code.to_string();
        let mut response = (status, Json(self)).into_response();

        // Add error code header for easier debugging
        if let Ok(code_value) = axum::http::HeaderValue::from_str(&code_str) {
            response.headers_mut().insert(
                axum::http::header::HeaderName::from_static("x-error-code"),
                code_value,
            );
        }

        response
    }
}

// ============================================================================
// Conversion from AttestorError
// ============================================================================

impl From<AttestorError> for ApiError {
    fn from(err: AttestorError) -> Self {
        match err {
            AttestorError::Validation { field, message } => {
                ApiError::new(ErrorCode::InvalidFieldValue, message)
                    .with_details(serde_json::json!({ "field": field }))
            }
            AttestorError::UnknownPublisher(publisher) => ApiError::new(
                ErrorCode::UnknownPublisher,
                format!("Unknown publisher: {}", publisher),
            )
            .with_details(serde_json::json!({ "publisher": publisher })),
            AttestorError::SignatureVerification(_) => ApiError::new(
                ErrorCode::SignatureVerificationFailed,
                "Attestation signature verification failed",
            ),
            AttestorError::Cryptography(_) => ApiError::new(
                ErrorCode::InternalError,
                "Cryptographic operation failed",
            ),
            AttestorError::DuplicateNonce(nonce) => {
                ApiError::new(ErrorCode::DuplicateNonce, "Nonce has already been used")
                    .with_details(serde_json::json!({ "nonce": nonce }))
            }
            AttestorError::Database(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            AttestorError::VerificationUnavailable => ApiError::new(
                ErrorCode::VerificationKeyUnavailable,
                "Proof verification is unavailable: verification key not loaded",
            ),
            AttestorError::InvalidProofFormat { field } => ApiError::new(
                ErrorCode::InvalidProofFormat,
                format!("Invalid proof format: missing or malformed field '{}'", field),
            )
            .with_details(serde_json::json!({ "field": field })),
            AttestorError::InvalidPublicSignalsFormat => ApiError::new(
                ErrorCode::InvalidPublicSignalsFormat,
                "Public signals must be an array",
            ),
            AttestorError::InvalidPublicSignalsLength { expected, received } => ApiError::new(
                ErrorCode::InvalidPublicSignalsLength,
                format!(
                    "Invalid public signals length: expected {}, received {}",
                    expected, received
                ),
            )
            .with_details(serde_json::json!({
                "expected": expected,
                "received": received
            })),
            AttestorError::InvalidPublicSignalType { index, found } => ApiError::new(
                ErrorCode::InvalidPublicSignalType,
                format!(
                    "Invalid public signal at index {}: expected nonnegative integer, found {}",
                    index, found
                ),
            )
            .with_details(serde_json::json!({
                "index": index,
                "found": found
            })),
            AttestorError::ProofRejected => {
                ApiError::new(ErrorCode::VerificationFailed, "Proof verification failed")
            }
            AttestorError::InsufficientAttestations { have, need } => ApiError::new(
                ErrorCode::InsufficientAttestations,
                format!("Insufficient attestations: have {}, need {}", have, need),
            )
            .with_details(serde_json::json!({
                "have": have,
                "need": need
            })),
            AttestorError::ProofBackend(_) => ApiError::new(
                ErrorCode::VerificationServiceError,
                "Proof backend failure",
            ),
            AttestorError::Internal(_) => {
                ApiError::new(ErrorCode::InternalError, "Internal server error")
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_numeric() {
        assert_eq!(ErrorCode::MissingParameters.numeric_code(), 3001);
        assert_eq!(ErrorCode::InvalidProofFormat.numeric_code(), 4001);
        assert_eq!(ErrorCode::VerificationFailed.numeric_code(), 4005);
        assert_eq!(ErrorCode::SignatureVerificationFailed.numeric_code(), 5001);
        assert_eq!(ErrorCode::DatabaseError.numeric_code(), 8001);
        assert_eq!(ErrorCode::InternalError.numeric_code(), 8999);
    }

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(
            ErrorCode::MissingParameters.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::VerificationKeyUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ErrorCode::DuplicateNonce.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::VerificationServiceError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ErrorCode::InvalidPublicSignalsLength.to_string(),
            "INVALID_PUBLIC_SIGNALS_LENGTH"
        );
        assert_eq!(
            ErrorCode::VerificationFailed.to_string(),
            "VERIFICATION_FAILED"
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = ApiError::new(ErrorCode::VerificationFailed, "Proof verification failed");
        let json = serde_json::to_string(&error).unwrap();

        assert!(json.contains("VERIFICATION_FAILED"));
        assert!(json.contains("4005"));
    }

    #[test]
    fn test_length_error_carries_counts() {
        let api: ApiError = AttestorError::InvalidPublicSignalsLength {
            expected: 3,
            received: 2,
        }
        .into();
        assert_eq!(api.error.code, ErrorCode::InvalidPublicSignalsLength);
        let details = api.error.details.unwrap();
        assert_eq!(details["expected"], 3);
        assert_eq!(details["received"], 2);
    }

    #[test]
    fn test_database_error_hides_internal_text() {
        let api: ApiError = AttestorError::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(api.error.code, ErrorCode::DatabaseError);
        assert!(!api.error.message.to_lowercase().contains("pool"));
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let api: ApiError = AttestorError::VerificationUnavailable.into();
        assert_eq!(api.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
