// ABOUTME: Unified LLM provider selector built from the LLM configuration section
// ABOUTME: Wraps Gemini or an OpenAI-compatible endpoint behind a single LlmProvider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! # LLM Provider Selector
//!
//! `GIT_CONSISTENT_LLM_PROVIDER` picks the backend:
//! - `gemini` (default): requires `GEMINI_API_KEY`
//! - `openai`: requires `OPENAI_API_KEY`
//! - `groq`: requires `GROQ_API_KEY`
//! - `local`/`ollama`/`vllm`/`localai`: no key required, `LLM_BASE_URL` points at the server

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{
    ChatRequest, ChatResponse, GeminiProvider, LlmCapabilities, LlmProvider,
    OpenAiCompatibleConfig, OpenAiCompatibleProvider,
};
use crate::config::{LlmConfig, LlmProviderType};
use crate::errors::AppError;

/// Unified chat provider that wraps Gemini or an `OpenAI`-compatible endpoint
#[derive(Debug)]
pub enum ChatProvider {
    /// Google Gemini provider
    Gemini(GeminiProvider),
    /// `OpenAI`, Groq or a local server
    OpenAiCompatible(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Build the configured provider and share it
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_MISSING` when the selected hosted provider has no API key,
    /// or an internal error if the HTTP client cannot be created.
    pub fn from_config(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, AppError> {
        let provider = Self::create(config)?;
        info!(
            provider = provider.name(),
            model = provider.default_model(),
            "Initialized LLM provider (set {} to change)",
            LlmProviderType::ENV_VAR
        );
        Ok(Arc::new(provider))
    }

    /// Create the provider for the configured type
    ///
    /// # Errors
    ///
    /// See [`Self::from_config`]
    pub fn create(config: &LlmConfig) -> Result<Self, AppError> {
        match config.provider {
            LlmProviderType::Gemini => {
                let api_key = Self::required_key(config)?;
                let provider = GeminiProvider::new(api_key)?
                    .with_base_url(config.effective_base_url())
                    .with_default_model(config.effective_model());
                Ok(Self::Gemini(provider))
            }
            LlmProviderType::OpenAi | LlmProviderType::Groq => {
                let api_key = Self::required_key(config)?;
                Self::openai_compatible(config, Some(api_key))
            }
            LlmProviderType::Local => Self::openai_compatible(config, config.api_key.clone()),
        }
    }

    fn openai_compatible(config: &LlmConfig, api_key: Option<String>) -> Result<Self, AppError> {
        let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig {
            base_url: config.effective_base_url().to_owned(),
            api_key,
            default_model: config.effective_model().to_owned(),
            flavor: config.provider,
        })?;
        Ok(Self::OpenAiCompatible(provider))
    }

    fn required_key(config: &LlmConfig) -> Result<String, AppError> {
        config.api_key.clone().ok_or_else(|| {
            AppError::config_missing(format!(
                "{} environment variable not set for LLM provider '{}'",
                config.provider.api_key_env().unwrap_or("API key"),
                config.provider
            ))
        })
    }

    /// Whether this wraps the Gemini backend
    #[must_use]
    pub const fn is_gemini(&self) -> bool {
        matches!(self, Self::Gemini(_))
    }

    fn inner(&self) -> &dyn LlmProvider {
        match self {
            Self::Gemini(provider) => provider,
            Self::OpenAiCompatible(provider) => provider,
        }
    }
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn display_name(&self) -> &'static str {
        self.inner().display_name()
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.inner().capabilities()
    }

    fn default_model(&self) -> &str {
        self.inner().default_model()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.inner().complete(request).await
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        self.inner().health_check().await
    }
}
