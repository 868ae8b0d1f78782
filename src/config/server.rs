// ABOUTME: Top-level server configuration loaded from environment variables
// ABOUTME: Covers bind address, database URL, CORS origins, timeouts and nested sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use consistent_core::constants::ports::DEFAULT_HTTP_PORT;
use consistent_core::errors::AppResult;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{env_var_or, parse_env_or, FirebaseConfig, LlmConfig};

/// Default SQLite database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/git_consistent.db";

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default request body limit (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (default)
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// `sqlx` connection URL
    pub database_url: String,
    /// Allowed CORS origins; `["*"]` or empty allows any origin
    pub cors_allowed_origins: Vec<String>,
    /// Deployment environment
    pub environment: Environment,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
    /// Identity provider settings
    pub firebase: FirebaseConfig,
    /// LLM provider settings
    pub llm: LlmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            http_port: DEFAULT_HTTP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            cors_allowed_origins: vec!["*".to_owned()],
            environment: Environment::Development,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            firebase: FirebaseConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID` when a numeric variable does not parse
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        Ok(Self {
            host: env_var_or("HOST", DEFAULT_HOST),
            http_port: parse_env_or("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            cors_allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            request_timeout_secs: parse_env_or(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            max_body_bytes: parse_env_or("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            firebase: FirebaseConfig::from_env()?,
            llm: LlmConfig::from_env()?,
        })
    }

    /// Whether any origin may call the API
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.is_empty() || self.cors_allowed_origins.iter().any(|o| o == "*")
    }

    /// Log the effective configuration without secrets
    pub fn summary_log(&self) {
        info!(
            host = %self.host,
            http_port = self.http_port,
            database = %redact_database_url(&self.database_url),
            environment = %self.environment,
            cors_origins = %self.cors_allowed_origins.join(","),
            request_timeout_secs = self.request_timeout_secs,
            max_body_bytes = self.max_body_bytes,
            "Server configuration"
        );
        info!(
            firebase_enabled = self.firebase.is_configured(),
            project_id = self.firebase.project_id.as_deref().unwrap_or("(not set)"),
            key_cache_ttl_secs = self.firebase.key_cache_ttl_secs,
            "Identity configuration"
        );
        info!(
            provider = %self.llm.provider,
            model = self.llm.model.as_deref().unwrap_or("(provider default)"),
            api_key = if self.llm.api_key.is_some() { "[REDACTED]" } else { "(not set)" },
            base_url = self.llm.base_url.as_deref().unwrap_or("(provider default)"),
            temperature = self.llm.temperature,
            max_tokens = self.llm.max_tokens,
            "LLM configuration"
        );
    }
}

/// Parse comma-separated CORS origins
#[must_use]
pub fn parse_origins(origins: &str) -> Vec<String> {
    if origins.trim() == "*" {
        return vec!["*".to_owned()];
    }
    origins
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Hide credentials embedded in a connection URL
fn redact_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://[REDACTED]{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com,"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("staging"), Environment::Development);
    }

    #[test]
    fn test_allows_any_origin() {
        let mut config = ServerConfig::default();
        assert!(config.allows_any_origin());
        config.cors_allowed_origins = vec!["https://app.example.com".to_owned()];
        assert!(!config.allows_any_origin());
        config.cors_allowed_origins.clear();
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_redact_database_url() {
        assert_eq!(
            redact_database_url("postgres://user:pw@db:5432/app"),
            "postgres://[REDACTED]@db:5432/app"
        );
        assert_eq!(redact_database_url("sqlite::memory:"), "sqlite::memory:");
    }
}
