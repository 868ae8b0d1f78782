// ABOUTME: Weekly or monthly habit review flow grounded in the user's habits and period logs
// ABOUTME: Renders habits and logs as plain-text lists and asks for a Markdown analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use consistent_core::dates::format_date;
use consistent_core::models::{Habit, HabitLog, ReviewPeriod};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{has_text, FlowOutput, FlowRunner};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{render, HABIT_INSIGHTS_PROMPT};

/// Message used when the model returns nothing usable
pub const HABIT_INSIGHTS_FAILURE: &str = "AI coach could not generate habit insights at this time.";

/// Input to the review flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitInsightsInput {
    /// Owner of the data
    pub user_id: String,
    /// Review window
    pub time_period: ReviewPeriod,
    /// Active habits
    pub habits: Vec<Habit>,
    /// Logs inside the window, oldest first
    pub period_logs: Vec<HabitLog>,
}

impl HabitInsightsInput {
    /// Check the input before any network call
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` when the user id is blank
    pub fn validate(&self) -> AppResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(AppError::invalid_input("User ID is required for a review"));
        }
        Ok(())
    }

    fn render_habits(&self) -> String {
        if self.habits.is_empty() {
            return "  The user has no active habits defined.\n".to_owned();
        }
        let mut block = String::new();
        for habit in &self.habits {
            let description = if habit.description.trim().is_empty() {
                "Not provided"
            } else {
                habit.description.as_str()
            };
            block.push_str(&format!("  - Habit: {} (ID: {})\n", habit.name, habit.id));
            block.push_str(&format!("    Description: {description}\n"));
            block.push_str(&format!("    Frequency: {}\n", habit.frequency));
            if !habit.target_days.is_empty() {
                let days: Vec<String> = habit.target_days.iter().map(u8::to_string).collect();
                block.push_str(&format!(
                    "    Target Days (0=Sun, 1=Mon, ..., 6=Sat): {}\n",
                    days.join(", ")
                ));
            }
            block.push_str("  ---\n");
        }
        block
    }

    fn render_logs(&self) -> String {
        if self.period_logs.is_empty() {
            return "  No habit activity was logged during this period.\n".to_owned();
        }
        let mut block = String::new();
        for log in &self.period_logs {
            let status = if log.completed {
                "COMPLETED"
            } else {
                "NOT COMPLETED"
            };
            block.push_str(&format!(
                "  - Log for Habit ID {} on {}: {status}\n",
                log.habit_id,
                format_date(log.date)
            ));
            block.push_str("  ---\n");
        }
        block
    }

    /// Render the prompt
    #[must_use]
    pub fn render_prompt(&self) -> String {
        render(
            HABIT_INSIGHTS_PROMPT,
            &[
                ("time_period", self.time_period.label()),
                ("habits", &self.render_habits()),
                ("period_logs", &self.render_logs()),
            ],
        )
    }

    /// JSON schema of [`HabitInsightsOutput`]
    #[must_use]
    pub fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "analysis": {
                    "type": "string",
                    "description": "Empathetic, actionable Markdown review of habit performance over the period: achievements, patterns, challenges and practical advice."
                }
            },
            "required": ["analysis"]
        })
    }
}

/// Output of the review flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitInsightsOutput {
    /// Markdown review
    pub analysis: String,
}

impl FlowOutput for HabitInsightsOutput {
    fn is_complete(&self) -> bool {
        has_text(&self.analysis)
    }
}

impl FlowRunner {
    /// Generate a review of the user's habits over the period
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for bad input, the provider's error when the call
    /// fails, or `EXTERNAL_SERVICE_ERROR` when the reply is unusable
    pub async fn habit_insights(&self, input: &HabitInsightsInput) -> AppResult<HabitInsightsOutput> {
        input.validate()?;
        self.run(
            "habit_insights",
            input.render_prompt(),
            HabitInsightsInput::output_schema(),
            HABIT_INSIGHTS_FAILURE,
        )
        .await
    }
}
