// ABOUTME: Journal reflection flow producing a day summary and a mood analysis
// ABOUTME: Validates entry length before asking the model for both fields as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use consistent_core::constants::limits::JOURNAL_TEXT_MAX_CHARS;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{has_text, FlowOutput, FlowRunner};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{render, JOURNAL_ANALYSIS_PROMPT};

/// Message used when the model returns nothing usable
pub const JOURNAL_ANALYSIS_FAILURE: &str = "AI could not analyze the journal entry at this time.";

/// Input to the journal flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalAnalysisInput {
    /// Free-form entry text
    pub journal_text: String,
}

impl JournalAnalysisInput {
    /// Check the entry before any network call
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for an empty or oversized entry
    pub fn validate(&self) -> AppResult<()> {
        if self.journal_text.trim().is_empty() {
            return Err(AppError::invalid_input("Journal entry cannot be empty."));
        }
        if self.journal_text.chars().count() > JOURNAL_TEXT_MAX_CHARS {
            return Err(AppError::invalid_input(format!(
                "Journal entry must be at most {JOURNAL_TEXT_MAX_CHARS} characters."
            )));
        }
        Ok(())
    }

    /// Render the prompt
    #[must_use]
    pub fn render_prompt(&self) -> String {
        render(
            JOURNAL_ANALYSIS_PROMPT,
            &[("journal_text", &self.journal_text)],
        )
    }

    /// JSON schema of [`JournalAnalysisOutput`]
    #[must_use]
    pub fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "daySummary": {
                    "type": "string",
                    "description": "Two to four sentences summarizing the activities, events and thoughts in the entry, addressed to the writer."
                },
                "moodAnalysis": {
                    "type": "string",
                    "description": "One to three empathetic sentences on the writer's perceived mood, addressed to the writer."
                }
            },
            "required": ["daySummary", "moodAnalysis"]
        })
    }
}

/// Output of the journal flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalAnalysisOutput {
    /// Summary of the day
    pub day_summary: String,
    /// Reflection on mood
    pub mood_analysis: String,
}

impl FlowOutput for JournalAnalysisOutput {
    fn is_complete(&self) -> bool {
        has_text(&self.day_summary) && has_text(&self.mood_analysis)
    }
}

impl FlowRunner {
    /// Summarize a journal entry and reflect on its mood
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for bad input, the provider's error when the call
    /// fails, or `EXTERNAL_SERVICE_ERROR` when the reply is unusable
    pub async fn journal_analysis(
        &self,
        input: &JournalAnalysisInput,
    ) -> AppResult<JournalAnalysisOutput> {
        input.validate()?;
        self.run(
            "journal_analysis",
            input.render_prompt(),
            JournalAnalysisInput::output_schema(),
            JOURNAL_ANALYSIS_FAILURE,
        )
        .await
    }
}
