//! Proof verification endpoint tests.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use common::*;

fn empty_registry() -> attestor::domain::PublisherRegistry {
    registry_for(&[])
}

#[tokio::test]
async fn valid_proof_above_threshold_qualifies() {
    let app = app(accepting_state(empty_registry()).await);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/verify-proof",
        Some(json!({
            "proof": sample_proof(),
            "publicSignals": ["25", "20", "0"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["valid"], json!(true));
    assert_eq!(body["results"]["tagMatchCount"], json!(25));
    assert_eq!(body["results"]["threshold"], json!(20));
    assert_eq!(body["results"]["targetTag"], json!("finance"));
    assert_eq!(body["results"]["matchedTag"], json!(true));
    assert_eq!(body["results"]["proofMeetsThreshold"], json!(true));
    assert_eq!(body["metadata"]["publicSignals"], json!(["25", "20", "0"]));
    assert_eq!(body["metadata"]["protocol"], json!("groth16"));
    assert!(body["metadata"]["verificationTime"].is_u64());
}

#[tokio::test]
async fn invalid_proof_is_a_200_with_valid_false() {
    let app = app(rejecting_state(empty_registry()).await);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/verify-proof",
        Some(json!({
            "proof": sample_proof(),
            "publicSignals": ["25", "20", "0"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(false));
    assert_eq!(body["results"]["proofMeetsThreshold"], json!(false));
}

#[tokio::test]
async fn missing_proof_parameter() {
    let app = app(accepting_state(empty_registry()).await);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/verify-proof",
        Some(json!({ "publicSignals": ["25", "20", "0"] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("MISSING_PARAMETERS"));
}

#[tokio::test]
async fn missing_signals_parameter() {
    let app = app(accepting_state(empty_registry()).await);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/verify-proof",
        Some(json!({ "proof": sample_proof() })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("MISSING_PARAMETERS"));
}

#[tokio::test]
async fn non_array_signals_are_a_format_error() {
    let app = app(accepting_state(empty_registry()).await);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/verify-proof",
        Some(json!({
            "proof": sample_proof(),
            "publicSignals": "25,20,0"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID_PUBLIC_SIGNALS_FORMAT"));
}

#[tokio::test]
async fn wrong_signal_count_reports_expected_and_received() {
    let app = app(accepting_state(empty_registry()).await);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/verify-proof",
        Some(json!({
            "proof": sample_proof(),
            "publicSignals": ["25", "20"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID_PUBLIC_SIGNALS_LENGTH"));
    assert_eq!(body["error"]["details"]["expected"], json!(3));
    assert_eq!(body["error"]["details"]["received"], json!(2));
}

#[tokio::test]
async fn bad_signal_type_reports_position() {
    let app = app(accepting_state(empty_registry()).await);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/verify-proof",
        Some(json!({
            "proof": sample_proof(),
            "publicSignals": ["25", true, "0"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID_PUBLIC_SIGNAL_TYPE"));
    assert_eq!(body["error"]["details"]["index"], json!(1));
    assert_eq!(body["error"]["details"]["found"], json!("boolean"));
}

#[tokio::test]
async fn malformed_proof_names_the_field() {
    let app = app(accepting_state(empty_registry()).await);

    let mut proof = sample_proof();
    proof.as_object_mut().unwrap().remove("pi_c");
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/verify-proof",
        Some(json!({
            "proof": proof,
            "publicSignals": ["25", "20", "0"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID_PROOF_FORMAT"));
    assert_eq!(body["error"]["details"]["field"], json!("pi_c"));
}

#[tokio::test]
async fn unavailable_service_returns_503_with_error_header() {
    let app = app(unavailable_state(empty_registry()).await);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/verify-proof")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "proof": sample_proof(),
                "publicSignals": ["25", "20", "0"]
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.headers().get("x-error-code").unwrap(),
        "VERIFICATION_KEY_UNAVAILABLE"
    );
}

#[tokio::test]
async fn syntactically_broken_body_gets_a_stable_code() {
    let app = app(accepting_state(empty_registry()).await);

    let response = send_raw(&app, Method::POST, "/api/verify-proof", "{not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("x-error-code").unwrap(),
        "INVALID_REQUEST_BODY"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], json!("INVALID_REQUEST_BODY"));
    assert_eq!(body["error"]["numeric_code"], json!(3002));
    // the serde parse internals stay on the server side
    let message = body["error"]["message"].as_str().unwrap();
    assert!(!message.contains("line"), "leaked parse detail: {message}");
}

#[tokio::test]
async fn verification_key_endpoint_is_cacheable() {
    let app = app(accepting_state(empty_registry()).await);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/verification-key")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );

    let (_, body) = send_json(&app, Method::GET, "/api/verification-key", None).await;
    assert_eq!(body["protocol"], json!("groth16"));
    assert_eq!(body["curve"], json!("bn128"));
    assert_eq!(body["nPublic"], json!(3));
}

#[tokio::test]
async fn verification_key_endpoint_unavailable_without_key() {
    let app = app(unavailable_state(empty_registry()).await);

    let (status, body) = send_json(&app, Method::GET, "/api/verification-key", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], json!("VERIFICATION_KEY_UNAVAILABLE"));
}

#[tokio::test]
async fn out_of_range_tag_index_is_reported_as_unknown() {
    let app = app(accepting_state(empty_registry()).await);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/verify-proof",
        Some(json!({
            "proof": sample_proof(),
            "publicSignals": ["7", "5", "42"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["targetTag"], json!("unknown"));
    assert_eq!(body["results"]["proofMeetsThreshold"], json!(true));
}
