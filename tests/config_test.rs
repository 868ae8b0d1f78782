// ABOUTME: Tests for environment-driven server, identity and LLM configuration
// ABOUTME: Serialized because they mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::env;

use consistent_core::errors::ErrorCode;
use git_consistent_server::config::{Environment, LlmProviderType, ServerConfig};
use git_consistent_server::llm::ChatProvider;
use serial_test::serial;

const VARS: &[&str] = &[
    "HOST",
    "HTTP_PORT",
    "DATABASE_URL",
    "CORS_ALLOWED_ORIGINS",
    "ENVIRONMENT",
    "REQUEST_TIMEOUT_SECS",
    "MAX_BODY_BYTES",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_AUTH_ENABLED",
    "FIREBASE_KEY_CACHE_TTL_SECS",
    "GIT_CONSISTENT_LLM_PROVIDER",
    "GEMINI_API_KEY",
    "OPENAI_API_KEY",
    "GROQ_API_KEY",
    "LLM_MODEL",
    "LLM_BASE_URL",
    "LLM_TEMPERATURE",
    "LLM_MAX_TOKENS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.http_port, 8081);
    assert_eq!(config.database_url, "sqlite:./data/git_consistent.db");
    assert!(config.allows_any_origin());
    assert_eq!(config.environment, Environment::Development);
    assert!(!config.firebase.is_configured());
    assert_eq!(config.llm.provider, LlmProviderType::Gemini);
    assert!(config.llm.api_key.is_none());
}

#[test]
#[serial]
fn test_values_from_environment() {
    clear_env();
    env::set_var("HOST", "0.0.0.0");
    env::set_var("HTTP_PORT", "9000");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("FIREBASE_PROJECT_ID", "habits-prod");
    env::set_var("GIT_CONSISTENT_LLM_PROVIDER", "groq");
    env::set_var("GROQ_API_KEY", "gsk-test");
    env::set_var("LLM_TEMPERATURE", "0.2");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.http_port, 9000);
    assert_eq!(
        config.cors_allowed_origins,
        vec!["https://a.example", "https://b.example"]
    );
    assert!(!config.allows_any_origin());
    assert!(config.environment.is_production());
    assert!(config.firebase.is_configured());
    assert_eq!(config.firebase.project_id.as_deref(), Some("habits-prod"));
    assert_eq!(config.llm.provider, LlmProviderType::Groq);
    assert_eq!(config.llm.api_key.as_deref(), Some("gsk-test"));
    assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
}

#[test]
#[serial]
fn test_firebase_can_be_disabled() {
    clear_env();
    env::set_var("FIREBASE_PROJECT_ID", "habits-dev");
    env::set_var("FIREBASE_AUTH_ENABLED", "false");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert!(!config.firebase.is_configured());
}

#[test]
#[serial]
fn test_invalid_numbers_are_config_errors() {
    clear_env();
    env::set_var("HTTP_PORT", "eighty");
    let error = ServerConfig::from_env().unwrap_err();
    clear_env();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);
    assert!(error.message.contains("HTTP_PORT"));

    env::set_var("LLM_MAX_TOKENS", "-5");
    let error = ServerConfig::from_env().unwrap_err();
    clear_env();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_provider_requires_api_key() {
    clear_env();
    env::set_var("GIT_CONSISTENT_LLM_PROVIDER", "openai");
    let config = ServerConfig::from_env().unwrap();
    clear_env();

    let error = ChatProvider::from_config(&config.llm).err().unwrap();
    assert_eq!(error.code, ErrorCode::ConfigMissing);
    assert!(error.message.contains("OPENAI_API_KEY"));
}

#[test]
#[serial]
fn test_key_cache_ttl_upper_bound() {
    clear_env();
    env::set_var("FIREBASE_PROJECT_ID", "habits-dev");
    env::set_var("FIREBASE_KEY_CACHE_TTL_SECS", "86400");
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.firebase.key_cache_ttl_secs, 86_400);

    env::set_var("FIREBASE_KEY_CACHE_TTL_SECS", "100000000000000000");
    let error = ServerConfig::from_env().unwrap_err();
    clear_env();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);
    assert!(error.message.contains("FIREBASE_KEY_CACHE_TTL_SECS"));
}
