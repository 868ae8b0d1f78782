// ABOUTME: Request authentication against the hosted identity provider
// ABOUTME: Defines the verified user, the IdentityVerifier seam and bearer token extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! # Authentication
//!
//! Every protected handler calls [`authenticate`], which extracts the bearer
//! token and hands it to the configured [`IdentityVerifier`]. Production uses
//! [`FirebaseAuth`]; tests plug in a stub verifier.

mod firebase;

pub use firebase::{FirebaseAuth, FIREBASE_CERTS_URL};

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{warn, Span};

use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// Identity established from a verified ID token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Identity-provider uid
    pub uid: String,
    /// Email claim
    pub email: Option<String>,
    /// Display name claim
    pub name: Option<String>,
    /// Profile picture claim
    pub picture: Option<String>,
}

/// Verifies an identity-provider ID token
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify the token and return the identity it carries
    async fn verify(&self, id_token: &str) -> AppResult<AuthenticatedUser>;
}

/// Extract the bearer token from the `Authorization` header
///
/// # Errors
///
/// `AUTH_REQUIRED` when the header is absent, `AUTH_INVALID` when it is not a
/// non-empty `Bearer` credential
pub fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(AppError::auth_required)?
        .to_str()
        .map_err(|_| AppError::auth_invalid("Authorization header is not valid text"))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            AppError::auth_invalid("Invalid authorization header format - must be 'Bearer <token>'")
        })?
        .trim();

    if token.is_empty() {
        return Err(AppError::auth_invalid("Bearer token is empty"));
    }
    Ok(token)
}

/// Authenticate a request and record the user on the current span
///
/// # Errors
///
/// Propagates [`bearer_token`] and verifier errors
pub async fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<AuthenticatedUser> {
    let token = bearer_token(headers)?;
    match resources.verifier.verify(token).await {
        Ok(user) => {
            Span::current().record("user_id", user.uid.as_str());
            Ok(user)
        }
        Err(error) => {
            warn!(code = ?error.code, "Request authentication failed");
            AppLogger::log_auth_event("-", "verify_token", false, Some(&error.message));
            Err(error)
        }
    }
}
