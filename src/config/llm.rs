// ABOUTME: LLM provider selection and generation parameters from the environment
// ABOUTME: Chooses Gemini or an OpenAI-compatible endpoint and resolves the matching API key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

use consistent_core::errors::AppResult;
use serde::{Deserialize, Serialize};

use super::{non_empty_env, parse_env_or};

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Supported LLM backends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Google Gemini (default)
    #[default]
    Gemini,
    /// `OpenAI` chat completions
    OpenAi,
    /// Groq, `OpenAI`-compatible
    Groq,
    /// Self-hosted `OpenAI`-compatible server (Ollama, vLLM, `LocalAI`)
    Local,
}

impl LlmProviderType {
    /// Environment variable for provider selection
    pub const ENV_VAR: &'static str = "GIT_CONSISTENT_LLM_PROVIDER";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "openai" => Self::OpenAi,
            "groq" => Self::Groq,
            "local" | "ollama" | "vllm" | "localai" => Self::Local,
            _ => Self::Gemini,
        }
    }

    /// Environment variable carrying this provider's API key, if it needs one
    #[must_use]
    pub const fn api_key_env(self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Groq => Some("GROQ_API_KEY"),
            Self::Local => None,
        }
    }

    /// Default base URL for the provider's API
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::Local => "http://localhost:11434/v1",
        }
    }

    /// Default model for the provider
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-flash",
            Self::OpenAi => "gpt-4o-mini",
            Self::Groq => "llama-3.3-70b-versatile",
            Self::Local => "qwen2.5:14b-instruct",
        }
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAi => write!(f, "openai"),
            Self::Groq => write!(f, "groq"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// LLM configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Selected backend
    pub provider: LlmProviderType,
    /// Model override (`LLM_MODEL`)
    pub model: Option<String>,
    /// API key for the selected backend
    pub api_key: Option<String>,
    /// Base URL override (`LLM_BASE_URL`)
    pub base_url: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum completion tokens
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::Gemini,
            model: None,
            api_key: None,
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl LlmConfig {
    /// Load LLM configuration from environment
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID` when temperature or max tokens do not parse
    pub fn from_env() -> AppResult<Self> {
        let provider = non_empty_env(LlmProviderType::ENV_VAR)
            .map(|raw| LlmProviderType::from_str_or_default(&raw))
            .unwrap_or_default();

        Ok(Self {
            provider,
            model: non_empty_env("LLM_MODEL"),
            api_key: provider.api_key_env().and_then(non_empty_env),
            base_url: non_empty_env("LLM_BASE_URL"),
            temperature: parse_env_or("LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            max_tokens: parse_env_or("LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
        })
    }

    /// Effective model name
    #[must_use]
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Effective API base URL
    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

impl Debug for LlmConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
