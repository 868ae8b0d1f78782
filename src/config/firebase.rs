// ABOUTME: Firebase Authentication configuration for ID token verification
// ABOUTME: Reads project ID, enable flag and signing-key cache TTL from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use consistent_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{non_empty_env, parse_env_or};

/// Default signing-key cache TTL (Google rotates keys roughly daily)
pub const DEFAULT_KEY_CACHE_TTL_SECS: u64 = 3600;

/// Shortest signing-key cache lifetime
pub const MIN_KEY_CACHE_TTL_SECS: u64 = 300;

/// Longest signing-key cache lifetime
pub const MAX_KEY_CACHE_TTL_SECS: u64 = 86_400;

/// Firebase Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Firebase project ID (audience of the ID tokens)
    pub project_id: Option<String>,
    /// Whether ID token verification is enabled
    pub enabled: bool,
    /// Fallback cache TTL for Google's signing certificates
    pub key_cache_ttl_secs: u64,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            enabled: false,
            key_cache_ttl_secs: DEFAULT_KEY_CACHE_TTL_SECS,
        }
    }
}

impl FirebaseConfig {
    /// Configuration for a known project, enabled
    #[must_use]
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            enabled: true,
            key_cache_ttl_secs: DEFAULT_KEY_CACHE_TTL_SECS,
        }
    }

    /// Returns `true` when enabled and a project ID is set
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.enabled && self.project_id.is_some()
    }

    /// Load Firebase configuration from environment
    ///
    /// Environment variables:
    /// - `FIREBASE_PROJECT_ID` - Firebase project ID
    /// - `FIREBASE_AUTH_ENABLED` - set to `false` to disable verification (default: true when a project is set)
    /// - `FIREBASE_KEY_CACHE_TTL_SECS` - certificate cache TTL (default: 3600)
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID` when a value does not parse or the cache TTL
    /// exceeds [`MAX_KEY_CACHE_TTL_SECS`]
    pub fn from_env() -> AppResult<Self> {
        let project_id = non_empty_env("FIREBASE_PROJECT_ID");
        let enabled = project_id.is_some() && parse_env_or("FIREBASE_AUTH_ENABLED", true)?;

        let key_cache_ttl_secs =
            parse_env_or("FIREBASE_KEY_CACHE_TTL_SECS", DEFAULT_KEY_CACHE_TTL_SECS)?;
        if key_cache_ttl_secs > MAX_KEY_CACHE_TTL_SECS {
            return Err(AppError::config_invalid(format!(
                "FIREBASE_KEY_CACHE_TTL_SECS must be at most {MAX_KEY_CACHE_TTL_SECS}, got {key_cache_ttl_secs}"
            )));
        }

        if enabled {
            info!(
                project_id = project_id.as_deref().unwrap_or("(not set)"),
                "Firebase authentication enabled"
            );
        } else {
            warn!("Firebase authentication not configured; protected routes will reject requests");
        }

        Ok(Self {
            project_id,
            enabled,
            key_cache_ttl_secs,
        })
    }
}
