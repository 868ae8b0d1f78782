// ABOUTME: Environment-driven configuration for the HTTP server, identity provider and LLM
// ABOUTME: Re-exports the typed configuration sections loaded at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! Configuration loaded from environment variables (optionally seeded by a `.env` file)

/// Firebase Authentication settings
pub mod firebase;
/// LLM provider selection and generation parameters
pub mod llm;
/// HTTP server settings and the top-level [`ServerConfig`]
pub mod server;

use std::env;
use std::str::FromStr;

use consistent_core::errors::{AppError, AppResult};

pub use firebase::FirebaseConfig;
pub use llm::{LlmConfig, LlmProviderType};
pub use server::{Environment, ServerConfig};

/// Read an environment variable, falling back to `default` when unset
pub(crate) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Read and parse an environment variable, falling back to `default` when unset or blank
///
/// # Errors
///
/// Returns `CONFIG_INVALID` naming the variable when the value does not parse
pub(crate) fn parse_env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config_invalid(format!("Invalid {key} value: {raw}"))),
        _ => Ok(default),
    }
}

/// Read an environment variable, treating blank values as unset
pub(crate) fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
