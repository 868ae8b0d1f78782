// ABOUTME: Firebase Authentication ID token verification with cached Google signing keys
// ABOUTME: Fetches x509 certificates, honors Cache-Control max-age and validates RS256 tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! Firebase ID token verification
//!
//! - Public keys come from Google's x509 certificate endpoint
//! - Keys are cached for the `Cache-Control: max-age` lifetime, kept between
//!   5 minutes and one day
//! - Tokens are checked for RS256 signature, issuer, audience, expiry and subject

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use consistent_core::constants::service_names;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::{FromDer, X509Certificate};

use super::{AuthenticatedUser, IdentityVerifier};
use crate::config::firebase::{MAX_KEY_CACHE_TTL_SECS, MIN_KEY_CACHE_TTL_SECS};
use crate::config::FirebaseConfig;
use crate::errors::{AppError, AppResult, ErrorCode};

/// Google's Firebase signing certificate endpoint
pub const FIREBASE_CERTS_URL: &str =
    "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";

/// Firebase issuer prefix (followed by the project ID)
const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Cached decoding keys
struct CachedKeys {
    keys: HashMap<String, DecodingKey>,
    expires_at: DateTime<Utc>,
}

/// Claims read from a Firebase ID token
#[derive(Debug, Clone, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Firebase ID token verifier
///
/// Thread-safe via `Arc<RwLock<_>>` so one instance serves all requests.
pub struct FirebaseAuth {
    config: FirebaseConfig,
    http_client: Client,
    certs_url: String,
    cached_keys: Arc<RwLock<Option<CachedKeys>>>,
}

impl FirebaseAuth {
    /// Create a verifier for the configured project
    #[must_use]
    pub fn new(config: FirebaseConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
            certs_url: FIREBASE_CERTS_URL.to_owned(),
            cached_keys: Arc::new(RwLock::new(None)),
        }
    }

    /// Fetch certificates from a different endpoint
    #[must_use]
    pub fn with_certs_url(mut self, url: impl Into<String>) -> Self {
        self.certs_url = url.into();
        self
    }

    /// Check if verification is enabled and configured
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    /// Validate a Firebase ID token and return its identity
    ///
    /// # Errors
    ///
    /// - `CONFIG_MISSING` when no project is configured or verification is disabled
    /// - `AUTH_EXPIRED` for an expired token
    /// - `AUTH_INVALID` for any other token problem
    /// - `EXTERNAL_AUTH_FAILED` when Google's certificates cannot be fetched
    pub async fn validate_token(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let project_id = match (&self.config.project_id, self.config.enabled) {
            (Some(project_id), true) => project_id,
            _ => {
                return Err(AppError::config_missing(
                    "Firebase authentication is not configured",
                ))
            }
        };

        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "Failed to decode Firebase token header");
            AppError::auth_invalid("Invalid token format")
        })?;

        let kid = header.kid.ok_or_else(|| {
            debug!("Firebase token missing key ID (kid) in header");
            AppError::auth_invalid("Token missing key ID")
        })?;

        let decoding_key = self.get_public_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[format!("{FIREBASE_ISSUER_PREFIX}{project_id}")]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let token_data =
            decode::<FirebaseClaims>(token, &decoding_key, &validation).map_err(|e| {
                debug!(error = %e, "Firebase token validation failed");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AppError::auth_expired(),
                    ErrorKind::InvalidAudience => AppError::auth_invalid("Invalid token audience"),
                    ErrorKind::InvalidIssuer => AppError::auth_invalid("Invalid token issuer"),
                    _ => AppError::auth_invalid("Invalid token"),
                }
            })?;

        let claims = token_data.claims;
        if claims.sub.trim().is_empty() {
            return Err(AppError::auth_invalid("Token subject is empty"));
        }

        debug!(user_id = %claims.sub, "Firebase token validated");

        Ok(AuthenticatedUser {
            uid: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
        })
    }

    /// Get the decoding key for a key ID, refreshing the cache when needed
    async fn get_public_key(&self, kid: &str) -> AppResult<DecodingKey> {
        if let Some(key) = self.try_get_cached_key(kid).await {
            return Ok(key);
        }

        self.refresh_keys().await?;

        let cache = self.cached_keys.read().await;
        cache
            .as_ref()
            .and_then(|cached| cached.keys.get(kid).cloned())
            .ok_or_else(|| {
                debug!(kid = %kid, "Firebase public key not found for kid");
                AppError::auth_invalid("Unknown token signing key")
            })
    }

    async fn try_get_cached_key(&self, kid: &str) -> Option<DecodingKey> {
        let cache = self.cached_keys.read().await;
        cache.as_ref().and_then(|cached| {
            if cached.expires_at > Utc::now() {
                cached.keys.get(kid).cloned()
            } else {
                None
            }
        })
    }

    /// Refresh the key cache from Google's endpoint
    async fn refresh_keys(&self) -> AppResult<()> {
        info!("Fetching Firebase public keys from Google");

        let (certs, cache_ttl) = self.fetch_certificates().await?;
        let keys = convert_certs_to_keys(certs)?;
        let expires_at = cache_expiry(Utc::now(), cache_ttl);

        info!(
            num_keys = keys.len(),
            cache_ttl_secs = cache_ttl,
            expires_at = %expires_at,
            "Firebase public keys cached"
        );

        *self.cached_keys.write().await = Some(CachedKeys { keys, expires_at });
        Ok(())
    }

    /// Fetch the kid -> certificate map and its cache lifetime
    async fn fetch_certificates(&self) -> AppResult<(HashMap<String, String>, u64)> {
        let fetch_failed = |message: String| {
            warn!(error = %message, "Failed to fetch Firebase public keys");
            AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("{}: {message}", service_names::FIREBASE_AUTH),
            )
        };

        let response = self
            .http_client
            .get(&self.certs_url)
            .send()
            .await
            .map_err(|e| fetch_failed(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(fetch_failed(format!(
                "certificate endpoint returned {}",
                response.status()
            )));
        }

        let cache_ttl = cache_ttl_secs(
            response
                .headers()
                .get(CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            self.config.key_cache_ttl_secs,
        );

        let certs: HashMap<String, String> = response
            .json()
            .await
            .map_err(|e| fetch_failed(format!("invalid certificate response: {e}")))?;

        Ok((certs, cache_ttl))
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseAuth {
    async fn verify(&self, id_token: &str) -> AppResult<AuthenticatedUser> {
        self.validate_token(id_token).await
    }
}

/// Convert x509 certificates to RSA decoding keys, skipping unreadable ones
fn convert_certs_to_keys(certs: HashMap<String, String>) -> AppResult<HashMap<String, DecodingKey>> {
    let mut keys = HashMap::with_capacity(certs.len());
    for (kid, cert_pem) in certs {
        match decoding_key_from_cert(&cert_pem) {
            Ok(key) => {
                keys.insert(kid, key);
            }
            Err(e) => {
                warn!(kid = %kid, error = %e, "Failed to extract public key from certificate");
            }
        }
    }

    if keys.is_empty() {
        return Err(AppError::new(
            ErrorCode::ExternalAuthFailed,
            format!("{}: no valid public keys found", service_names::FIREBASE_AUTH),
        ));
    }
    Ok(keys)
}

/// Parse max-age value from a Cache-Control header
///
/// Example: "public, max-age=3600, must-revalidate" -> 3600
pub(crate) fn parse_max_age(cache_control: &str) -> Option<u64> {
    cache_control
        .split(',')
        .map(str::trim)
        .find_map(|directive| directive.strip_prefix("max-age="))
        .and_then(|value| value.parse().ok())
}

/// Cache lifetime from the header's max-age, else the configured fallback,
/// clamped to the allowed range
fn cache_ttl_secs(cache_control: Option<&str>, fallback_secs: u64) -> u64 {
    cache_control
        .and_then(parse_max_age)
        .unwrap_or(fallback_secs)
        .clamp(MIN_KEY_CACHE_TTL_SECS, MAX_KEY_CACHE_TTL_SECS)
}

/// Instant at which keys cached at `now` go stale
fn cache_expiry(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    let after = |secs: u64| {
        i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
    };
    after(ttl_secs)
        .or_else(|| after(MIN_KEY_CACHE_TTL_SECS))
        .unwrap_or(now)
}

/// Extract the RSA public key from a PEM-encoded x509 certificate
fn decoding_key_from_cert(cert_pem: &str) -> AppResult<DecodingKey> {
    let (_, pem) = parse_x509_pem(cert_pem.as_bytes())
        .map_err(|e| AppError::internal(format!("Failed to parse X.509 PEM: {e}")))?;

    let (_, cert) = X509Certificate::from_der(&pem.contents)
        .map_err(|e| AppError::internal(format!("Failed to parse X.509 certificate: {e}")))?;

    // The subject public key bit string of an RSA SPKI is the PKCS#1 RSAPublicKey DER
    Ok(DecodingKey::from_rsa_der(
        &cert.public_key().subject_public_key.data,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_max_age() {
        assert_eq!(
            parse_max_age("public, max-age=19204, must-revalidate, no-transform"),
            Some(19204)
        );
        assert_eq!(parse_max_age("no-cache"), None);
        assert_eq!(parse_max_age("max-age=abc"), None);
        assert_eq!(parse_max_age("max-age=-5"), None);
    }

    #[test]
    fn test_cache_ttl_is_clamped() {
        assert_eq!(cache_ttl_secs(Some("public, max-age=19204"), 3600), 19204);
        assert_eq!(cache_ttl_secs(Some("max-age=10"), 3600), MIN_KEY_CACHE_TTL_SECS);
        assert_eq!(
            cache_ttl_secs(Some("max-age=99999999999999999"), 3600),
            MAX_KEY_CACHE_TTL_SECS
        );
        assert_eq!(cache_ttl_secs(None, 3600), 3600);
        assert_eq!(cache_ttl_secs(Some("no-store"), u64::MAX), MAX_KEY_CACHE_TTL_SECS);
    }

    #[test]
    fn test_cache_expiry_never_overflows() {
        let now = Utc::now();
        assert_eq!(cache_expiry(now, 600), now + Duration::seconds(600));
        assert_eq!(
            cache_expiry(now, u64::MAX),
            now + Duration::seconds(300)
        );
        assert_eq!(cache_expiry(DateTime::<Utc>::MAX_UTC, 600), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_invalid_certificates_are_rejected() {
        let certs = HashMap::from([("kid".to_owned(), "not a certificate".to_owned())]);
        let error = convert_certs_to_keys(certs).err().unwrap();
        assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    }

    #[tokio::test]
    async fn test_unconfigured_verifier_rejects() {
        let auth = FirebaseAuth::new(FirebaseConfig::default());
        assert!(!auth.is_enabled());
        let error = auth.validate_token("a.b.c").await.unwrap_err();
        assert_eq!(error.code, ErrorCode::ConfigMissing);
    }

    #[tokio::test]
    async fn test_garbage_token_is_invalid() {
        let auth = FirebaseAuth::new(FirebaseConfig::for_project("demo-project"));
        let error = auth.validate_token("not-a-jwt").await.unwrap_err();
        assert_eq!(error.code, ErrorCode::AuthInvalid);
    }
}
