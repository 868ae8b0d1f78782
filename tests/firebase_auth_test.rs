// ABOUTME: Tests for Firebase ID token verification against a mock certificate endpoint
// ABOUTME: Signs real RS256 tokens with a fixture key and serves its certificate through wiremock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{Duration, Utc};
use consistent_core::errors::ErrorCode;
use git_consistent_server::auth::{FirebaseAuth, IdentityVerifier};
use git_consistent_server::config::FirebaseConfig;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT_ID: &str = "demo-project";
const SIGNING_KID: &str = "test-kid";
const SIGNING_KEY_PEM: &str = include_str!("fixtures/firebase_signing_key.pem");
const SIGNING_CERT_PEM: &str = include_str!("fixtures/firebase_signing_cert.pem");

/// `{"alg":"RS256","kid":"test-kid","typ":"JWT"}` . `{"sub":"user-1"}` . fake signature
const TOKEN_WITH_KID: &str =
    "eyJhbGciOiJSUzI1NiIsImtpZCI6InRlc3Qta2lkIiwidHlwIjoiSldUIn0.eyJzdWIiOiJ1c2VyLTEifQ.c2ln";

/// `{"alg":"RS256","typ":"JWT"}` . `{"sub":"user-1"}` . fake signature
const TOKEN_WITHOUT_KID: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiJ1c2VyLTEifQ.c2ln";

#[derive(Debug, Clone, Serialize)]
struct IdTokenClaims {
    sub: String,
    aud: String,
    iss: String,
    iat: i64,
    exp: i64,
    email: Option<String>,
    name: Option<String>,
}

fn claims_for(uid: &str) -> IdTokenClaims {
    let now = Utc::now();
    IdTokenClaims {
        sub: uid.to_owned(),
        aud: PROJECT_ID.to_owned(),
        iss: format!("https://securetoken.google.com/{PROJECT_ID}"),
        iat: now.timestamp(),
        exp: (now + Duration::hours(1)).timestamp(),
        email: Some(format!("{uid}@example.com")),
        name: Some("Test User".to_owned()),
    }
}

fn sign(claims: &IdTokenClaims) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(SIGNING_KID.to_owned());
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY_PEM.as_bytes()).unwrap();
    encode(&header, claims, &key).unwrap()
}

fn cert_response(cache_control: Option<&str>) -> ResponseTemplate {
    let response =
        ResponseTemplate::new(200).set_body_json(json!({ SIGNING_KID: SIGNING_CERT_PEM }));
    match cache_control {
        Some(value) => response.insert_header("cache-control", value),
        None => response,
    }
}

async fn verifier_with_certs(response: ResponseTemplate) -> (FirebaseAuth, MockServer) {
    verifier_with_config(FirebaseConfig::for_project(PROJECT_ID), response).await
}

async fn verifier_with_config(
    config: FirebaseConfig,
    response: ResponseTemplate,
) -> (FirebaseAuth, MockServer) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/certs"))
        .respond_with(response)
        .mount(&server)
        .await;

    let auth = FirebaseAuth::new(config).with_certs_url(format!("{}/certs", server.uri()));
    (auth, server)
}

async fn cert_fetches(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

// ============================================================================
// Signed tokens
// ============================================================================

#[tokio::test]
async fn test_valid_token_yields_identity() {
    let (auth, _server) = verifier_with_certs(cert_response(Some("public, max-age=3600"))).await;

    let user = auth.verify(&sign(&claims_for("user-1"))).await.unwrap();
    assert_eq!(user.uid, "user-1");
    assert_eq!(user.email.as_deref(), Some("user-1@example.com"));
    assert_eq!(user.name.as_deref(), Some("Test User"));
    assert!(user.picture.is_none());
}

#[tokio::test]
async fn test_wrong_audience_is_invalid() {
    let (auth, _server) = verifier_with_certs(cert_response(None)).await;
    let mut claims = claims_for("user-1");
    claims.aud = "someone-elses-project".to_owned();

    let error = auth.verify(&sign(&claims)).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn test_wrong_issuer_is_invalid() {
    let (auth, _server) = verifier_with_certs(cert_response(None)).await;
    let mut claims = claims_for("user-1");
    claims.iss = "https://accounts.example.com".to_owned();

    let error = auth.verify(&sign(&claims)).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn test_expired_token_is_auth_expired() {
    let (auth, _server) = verifier_with_certs(cert_response(None)).await;
    let mut claims = claims_for("user-1");
    let issued = Utc::now() - Duration::hours(3);
    claims.iat = issued.timestamp();
    claims.exp = (issued + Duration::hours(1)).timestamp();

    let error = auth.verify(&sign(&claims)).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthExpired);
    assert_eq!(error.http_status(), 401);
}

#[tokio::test]
async fn test_empty_subject_is_invalid() {
    let (auth, _server) = verifier_with_certs(cert_response(None)).await;

    let error = auth.verify(&sign(&claims_for(""))).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn test_tampered_payload_fails_signature_check() {
    let (auth, _server) = verifier_with_certs(cert_response(None)).await;
    let genuine = sign(&claims_for("user-1"));
    let forged = sign(&claims_for("admin"));

    let mut genuine_parts = genuine.split('.');
    let mut forged_parts = forged.split('.');
    let spliced = format!(
        "{}.{}.{}",
        genuine_parts.next().unwrap(),
        forged_parts.nth(1).unwrap(),
        genuine_parts.nth(1).unwrap()
    );

    let error = auth.verify(&spliced).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);
}

// ============================================================================
// Key cache
// ============================================================================

#[tokio::test]
async fn test_keys_are_cached_for_max_age() {
    let (auth, server) = verifier_with_certs(cert_response(Some("public, max-age=3600"))).await;

    auth.verify(&sign(&claims_for("user-1"))).await.unwrap();
    auth.verify(&sign(&claims_for("user-2"))).await.unwrap();
    assert_eq!(cert_fetches(&server).await, 1);
}

#[tokio::test]
async fn test_huge_cache_lifetimes_are_clamped() {
    let mut config = FirebaseConfig::for_project(PROJECT_ID);
    config.key_cache_ttl_secs = u64::MAX;
    let (auth, server) = verifier_with_config(config, cert_response(None)).await;

    let user = auth.verify(&sign(&claims_for("user-1"))).await.unwrap();
    assert_eq!(user.uid, "user-1");
    assert_eq!(cert_fetches(&server).await, 1);

    let (auth, _server) = verifier_with_certs(cert_response(Some(
        "public, max-age=99999999999999999",
    )))
    .await;
    assert!(auth.verify(&sign(&claims_for("user-2"))).await.is_ok());
}

#[tokio::test]
async fn test_unknown_kid_is_invalid() {
    let (auth, _server) = verifier_with_certs(
        ResponseTemplate::new(200).set_body_json(json!({ "other-kid": SIGNING_CERT_PEM })),
    )
    .await;

    let error = auth.verify(&sign(&claims_for("user-1"))).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);
}

// ============================================================================
// Header and endpoint failures
// ============================================================================

#[tokio::test]
async fn test_token_without_kid_is_invalid() {
    let (auth, server) = verifier_with_certs(ResponseTemplate::new(200)).await;

    let error = auth.verify(TOKEN_WITHOUT_KID).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_certificate_endpoint_failure_is_external_auth_error() {
    let (auth, _server) = verifier_with_certs(ResponseTemplate::new(500)).await;

    let error = auth.verify(TOKEN_WITH_KID).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    assert_eq!(error.http_status(), 502);
}

#[tokio::test]
async fn test_unusable_certificates_are_rejected() {
    let (auth, _server) = verifier_with_certs(
        ResponseTemplate::new(200)
            .insert_header("cache-control", "public, max-age=3600")
            .set_body_json(json!({ "test-kid": "-----BEGIN CERTIFICATE-----\nnope\n-----END CERTIFICATE-----\n" })),
    )
    .await;

    let error = auth.verify(TOKEN_WITH_KID).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
}

#[tokio::test]
async fn test_disabled_verification_is_config_missing() {
    let mut config = FirebaseConfig::for_project(PROJECT_ID);
    config.enabled = false;
    let auth = FirebaseAuth::new(config);

    assert!(!auth.is_enabled());
    let error = auth.verify(TOKEN_WITH_KID).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigMissing);
}
