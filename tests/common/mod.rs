//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePool;
use tower::ServiceExt;

use attestor::crypto::{AttestationSigner, PublisherSigningKey};
use attestor::domain::{
    Groth16Proof, PublisherRegistry, VerificationKey, WalletAddress, PUBLIC_SIGNAL_COUNT,
};
use attestor::proof::{PairingEngine, PairingError, ProofVerificationService, RejectAllEngine};
use attestor::server::AppState;
use attestor::SqliteAttestationStore;

/// Test user wallet
pub fn test_wallet() -> WalletAddress {
    WalletAddress::parse("0x742d35cc6634c0532925a3b844bc9e7595f0beef").unwrap()
}

pub fn other_wallet() -> WalletAddress {
    WalletAddress::parse("0x00000000000000000000000000000000000000aa").unwrap()
}

/// Create a signer with a fresh key for a publisher domain
pub fn test_signer(publisher: &str) -> AttestationSigner {
    AttestationSigner::new(PublisherSigningKey::generate(), publisher)
}

/// Build a registry that trusts the given signers
pub fn registry_for(signers: &[&AttestationSigner]) -> PublisherRegistry {
    let mut registry = PublisherRegistry::new();
    for signer in signers {
        registry.register(
            signer.publisher(),
            WalletAddress::parse(&signer.address()).unwrap(),
        );
    }
    registry
}

/// Pairing engine that accepts every structurally valid proof
pub struct AcceptAllEngine;

impl PairingEngine for AcceptAllEngine {
    fn verify(
        &self,
        _key: &VerificationKey,
        _public_signals: &[u64],
        _proof: &Groth16Proof,
    ) -> Result<bool, PairingError> {
        Ok(true)
    }
}

/// Verification key fixture in the snarkjs export shape
pub fn test_verification_key() -> VerificationKey {
    serde_json::from_value(json!({
        "protocol": "groth16",
        "curve": "bn128",
        "nPublic": PUBLIC_SIGNAL_COUNT,
        "vk_alpha_1": ["1", "2", "1"],
        "vk_beta_2": [["1", "0"], ["0", "1"]],
        "vk_gamma_2": [["1", "0"], ["0", "1"]],
        "vk_delta_2": [["1", "0"], ["0", "1"]],
        "IC": [["1", "2", "1"], ["3", "4", "1"], ["5", "6", "1"], ["7", "8", "1"]]
    }))
    .unwrap()
}

/// Structurally valid Groth16 proof fixture
pub fn sample_proof() -> Value {
    json!({
        "pi_a": ["11", "12"],
        "pi_b": [["21", "22"], ["23", "24"]],
        "pi_c": ["31", "32"],
        "protocol": "groth16",
        "curve": "bn128"
    })
}

/// Build application state over in-memory SQLite
pub async fn test_state(
    registry: PublisherRegistry,
    verification: ProofVerificationService,
) -> AppState {
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    let store = SqliteAttestationStore::new(pool.clone(), Arc::new(registry));
    store.initialize().await.unwrap();

    AppState {
        pool,
        store: Arc::new(store),
        verification: Arc::new(verification),
    }
}

/// State with an accepting pairing engine
pub async fn accepting_state(registry: PublisherRegistry) -> AppState {
    test_state(
        registry,
        ProofVerificationService::new(test_verification_key(), Arc::new(AcceptAllEngine)),
    )
    .await
}

/// State whose engine rejects every proof
pub async fn rejecting_state(registry: PublisherRegistry) -> AppState {
    test_state(
        registry,
        ProofVerificationService::new(test_verification_key(), Arc::new(RejectAllEngine)),
    )
    .await
}

/// State with no verification key loaded
pub async fn unavailable_state(registry: PublisherRegistry) -> AppState {
    test_state(
        registry,
        ProofVerificationService::unavailable(Arc::new(RejectAllEngine)),
    )
    .await
}

pub fn app(state: AppState) -> Router {
    attestor::api::router().with_state(state)
}

/// Send a raw body with a JSON content type, returning the full response
/// for header and body assertions
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: &str,
) -> axum::http::Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Send a JSON request through the router and decode the JSON response
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(value.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
