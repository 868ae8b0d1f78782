// ABOUTME: Schema-validated prompt flows wrapping a single LLM call each
// ABOUTME: Validates input, renders the template, requests JSON and parses typed output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! # Prompt Flows
//!
//! A flow is a typed prompt template with an input check before the network
//! call and an output check after it:
//!
//! 1. the input is validated (`INVALID_INPUT` on failure, no LLM call made)
//! 2. the Markdown template is rendered with the input
//! 3. the request carries the output JSON schema
//! 4. the reply is parsed into the output type, tolerating a Markdown code fence
//!
//! Provider errors propagate unchanged. Output that cannot be parsed maps to
//! `EXTERNAL_SERVICE_ERROR` with the flow's user-facing message.

mod coach_tips;
mod habit_insights;
mod journal_analysis;

pub use coach_tips::{CoachTipsInput, CoachTipsOutput, COACH_TIPS_FAILURE};
pub use habit_insights::{HabitInsightsInput, HabitInsightsOutput, HABIT_INSIGHTS_FAILURE};
pub use journal_analysis::{JournalAnalysisInput, JournalAnalysisOutput, JOURNAL_ANALYSIS_FAILURE};

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::config::LlmConfig;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::prompts::json_output_instruction;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::logging::AppLogger;

/// Generation parameters applied to every flow request
#[derive(Debug, Clone, Copy)]
pub struct FlowSettings {
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum completion tokens
    pub max_tokens: u32,
}

impl From<&LlmConfig> for FlowSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

/// Typed flow output whose string fields must all be non-empty
pub trait FlowOutput: DeserializeOwned {
    /// Whether every required field carries text
    fn is_complete(&self) -> bool;
}

/// Runs prompt flows against the configured provider
#[derive(Clone)]
pub struct FlowRunner {
    provider: Arc<dyn LlmProvider>,
    settings: FlowSettings,
}

impl FlowRunner {
    /// Create a runner around a provider
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, settings: FlowSettings) -> Self {
        Self { provider, settings }
    }

    /// The underlying provider
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Send one rendered prompt and parse the JSON reply into `T`
    ///
    /// `failure_message` is used when the reply is missing or unparseable.
    async fn run<T: FlowOutput>(
        &self,
        flow: &str,
        prompt: String,
        schema: Value,
        failure_message: &str,
    ) -> AppResult<T> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(json_output_instruction(&schema)),
            ChatMessage::user(prompt),
        ])
        .with_temperature(self.settings.temperature)
        .with_max_tokens(self.settings.max_tokens)
        .with_response_schema(schema);

        let started = Instant::now();
        let result = self.provider.complete(&request).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                AppLogger::log_ai_flow(flow, self.provider.name(), false, elapsed_ms, None);
                return Err(error);
            }
        };

        let parsed = parse_output::<T>(&response.content);
        AppLogger::log_ai_flow(
            flow,
            self.provider.name(),
            parsed.is_some(),
            elapsed_ms,
            response.usage.map(|usage| usage.total_tokens),
        );

        parsed.ok_or_else(|| {
            warn!(
                ai.flow = flow,
                content_len = response.content.len(),
                "AI flow returned no usable output"
            );
            AppError::new(ErrorCode::ExternalServiceError, failure_message)
        })
    }
}

/// Parse model output, tolerating a Markdown code fence or stray prose around the object
pub(crate) fn parse_output<T: DeserializeOwned>(content: &str) -> Option<T> {
    let trimmed = strip_code_fence(content.trim());
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (start < end)
        .then(|| serde_json::from_str(&trimmed[start..=end]).ok())
        .flatten()
}

/// Remove a surrounding triple-backtick fence (with optional language tag)
fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    let body = rest.find('\n').map_or("", |newline| &rest[newline + 1..]);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Trimmed-text check shared by output types
pub(crate) fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}
