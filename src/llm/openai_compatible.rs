// ABOUTME: Generic OpenAI-compatible LLM provider for OpenAI, Groq and self-hosted servers
// ABOUTME: Speaks the chat completions protocol and requests JSON objects for prompt flows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! # `OpenAI`-Compatible Provider
//!
//! Works with any endpoint implementing `POST {base}/chat/completions`:
//! `OpenAI`, Groq, Ollama, vLLM and `LocalAI`. Local servers usually need no
//! API key; hosted ones receive it as a bearer token.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use consistent_core::constants::service_names;
use reqwest::{RequestBuilder, StatusCode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};

use super::{
    rate_limit_message, truncate_body, ChatMessage, ChatRequest, ChatResponse, LlmCapabilities,
    LlmProvider, TokenUsage,
};
use crate::config::LlmProviderType;
use crate::errors::{AppError, ErrorCode};

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (local models can be slow)
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// `OpenAI`-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

/// Message structure for `OpenAI`-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// `OpenAI`-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

/// Configuration for the `OpenAI`-compatible provider
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Which flavor of endpoint this is
    pub flavor: LlmProviderType,
}

impl OpenAiCompatibleConfig {
    /// Configuration for a flavor using its default endpoint and model
    #[must_use]
    pub fn for_flavor(flavor: LlmProviderType, api_key: Option<String>) -> Self {
        Self {
            base_url: flavor.default_base_url().to_owned(),
            api_key,
            default_model: flavor.default_model().to_owned(),
            flavor,
        }
    }

    /// Create configuration for a local Ollama instance
    #[must_use]
    pub fn ollama(model: &str) -> Self {
        Self {
            default_model: model.to_owned(),
            ..Self::for_flavor(LlmProviderType::Local, None)
        }
    }
}

impl Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("flavor", &self.flavor)
            .finish()
    }
}

/// Generic `OpenAI`-compatible LLM provider
#[derive(Debug)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            provider = %config.flavor,
            base_url = %config.base_url,
            model = %config.default_model,
            "Initializing OpenAI-compatible provider"
        );

        Ok(Self { client, config })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.bearer_auth(api_key)
        } else {
            request
        }
    }

    fn build_request(request: &ChatRequest, model: &str) -> OpenAiRequest {
        OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format: request
                .response_schema
                .as_ref()
                .map(|_| json!({ "type": "json_object" })),
        }
    }

    /// Parse error response from API
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let service = service_names::OPENAI_COMPATIBLE;
        let (message, error_type) = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| (truncate_body(body), None),
            |parsed| (parsed.error.message, parsed.error.error_type),
        );

        match status.as_u16() {
            429 => AppError::new(ErrorCode::ExternalRateLimited, rate_limit_message(&message)),
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("{service}: API authentication failed: {message}"),
            ),
            502..=504 => AppError::external_service(
                service,
                format!("Upstream not responding ({status}): {message}"),
            ),
            code => AppError::external_service(
                service,
                format!(
                    "API error ({code}, {}): {message}",
                    error_type.as_deref().unwrap_or("unknown")
                ),
            ),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        match self.config.flavor {
            LlmProviderType::OpenAi => "openai",
            LlmProviderType::Groq => "groq",
            LlmProviderType::Local | LlmProviderType::Gemini => "local",
        }
    }

    fn display_name(&self) -> &'static str {
        match self.config.flavor {
            LlmProviderType::OpenAi => "OpenAI",
            LlmProviderType::Groq => "Groq",
            LlmProviderType::Local | LlmProviderType::Gemini => "Local LLM",
        }
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);
        let openai_request = Self::build_request(request, model);

        debug!(
            provider = self.name(),
            messages = openai_request.messages.len(),
            json = openai_request.response_format.is_some(),
            "Sending chat completion request"
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.name(), error = %e, "Failed to send request");
                if e.is_connect() {
                    AppError::external_unavailable(
                        service_names::OPENAI_COMPATIBLE,
                        format!(
                            "Cannot connect to {} at {}",
                            self.display_name(),
                            self.config.base_url
                        ),
                    )
                } else {
                    AppError::external_unavailable(
                        service_names::OPENAI_COMPATIBLE,
                        format!("Request failed: {e}"),
                    )
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service(
                service_names::OPENAI_COMPATIBLE,
                format!("Failed to read response: {e}"),
            )
        })?;

        if !status.is_success() {
            error!(provider = self.name(), status = %status, "API error");
            return Err(Self::parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(provider = self.name(), error = %e, "Failed to parse response");
            AppError::external_service(
                service_names::OPENAI_COMPATIBLE,
                format!("Failed to parse response: {e}"),
            )
        })?;

        let choice = openai_response.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service(
                service_names::OPENAI_COMPATIBLE,
                "Response contained no choices",
            )
        })?;
        let content = choice.message.content.unwrap_or_default();

        debug!(
            provider = self.name(),
            content_len = content.len(),
            finish_reason = ?choice.finish_reason,
            "Received chat completion"
        );

        Ok(ChatResponse {
            content,
            model: openai_response.model.unwrap_or_else(|| model.to_owned()),
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        let request = self.add_auth_header(self.client.get(self.api_url("models")));
        let response = request.send().await.map_err(|e| {
            AppError::external_unavailable(
                service_names::OPENAI_COMPATIBLE,
                format!("Health check failed: {e}"),
            )
        })?;
        Ok(response.status().is_success())
    }
}
