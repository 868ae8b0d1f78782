// ABOUTME: Conversational habit-coaching flow with client-supplied conversation history
// ABOUTME: Renders prior turns as "role: content" lines ahead of the user's latest input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use consistent_core::constants::limits::{COACH_HISTORY_MAX_TURNS, COACH_INPUT_MAX_CHARS};
use consistent_core::models::ChatTurn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{has_text, FlowOutput, FlowRunner};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{render, COACH_TIPS_PROMPT};

/// Message used when the model returns nothing usable
pub const COACH_TIPS_FAILURE: &str = "AI coach could not generate a response at this time.";

/// Input to the coaching flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachTipsInput {
    /// The user's latest message
    pub current_input: String,
    /// Earlier turns, oldest first
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

impl CoachTipsInput {
    /// Check limits before any network call
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for an empty or oversized message or too many turns
    pub fn validate(&self) -> AppResult<()> {
        if self.current_input.trim().is_empty() {
            return Err(AppError::invalid_input("Message cannot be empty"));
        }
        if self.current_input.chars().count() > COACH_INPUT_MAX_CHARS {
            return Err(AppError::invalid_input(format!(
                "Message must be at most {COACH_INPUT_MAX_CHARS} characters"
            )));
        }
        if self.history.len() > COACH_HISTORY_MAX_TURNS {
            return Err(AppError::invalid_input(format!(
                "Conversation history is limited to {COACH_HISTORY_MAX_TURNS} messages"
            )));
        }
        Ok(())
    }

    /// Render the prompt
    #[must_use]
    pub fn render_prompt(&self) -> String {
        let history = if self.history.is_empty() {
            String::new()
        } else {
            let mut block = String::from("Conversation History (oldest to newest):\n");
            for turn in &self.history {
                block.push_str(&format!("{}: {}\n", turn.role.as_str(), turn.content));
            }
            block.push_str("---\n\n");
            block
        };

        render(
            COACH_TIPS_PROMPT,
            &[
                ("history", &history),
                ("current_input", &self.current_input),
            ],
        )
    }

    /// JSON schema of [`CoachTipsOutput`]
    #[must_use]
    pub fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tips": {
                    "type": "string",
                    "description": "Personal, empathetic and detailed guidance on habit consistency, setbacks and dropping unwanted habits, written like a supportive therapist."
                }
            },
            "required": ["tips"]
        })
    }
}

/// Output of the coaching flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachTipsOutput {
    /// Guidance text
    pub tips: String,
}

impl FlowOutput for CoachTipsOutput {
    fn is_complete(&self) -> bool {
        has_text(&self.tips)
    }
}

impl FlowRunner {
    /// Generate coaching guidance for the latest message
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for bad input, the provider's error when the call
    /// fails, or `EXTERNAL_SERVICE_ERROR` when the reply is unusable
    pub async fn coach_tips(&self, input: &CoachTipsInput) -> AppResult<CoachTipsOutput> {
        input.validate()?;
        self.run(
            "coach_tips",
            input.render_prompt(),
            CoachTipsInput::output_schema(),
            COACH_TIPS_FAILURE,
        )
        .await
    }
}
