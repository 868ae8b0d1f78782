// ABOUTME: AI coaching actions: conversational tips and weekly or monthly habit reviews
// ABOUTME: Short-circuits reviews with friendly messages when there is nothing to analyze
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use chrono::{Days, NaiveDate};
use consistent_core::models::{HabitFilter, ReviewPeriod};
use tracing::{info, warn};

use crate::database::Database;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::flows::{
    CoachTipsInput, CoachTipsOutput, FlowOutput, FlowRunner, HabitInsightsInput,
    HabitInsightsOutput, COACH_TIPS_FAILURE,
};

/// Returned when the user has no active habits
pub const NO_ACTIVE_HABITS_MESSAGE: &str =
    "You don't have any active habits to review. Add some habits first!";

/// Raised when the review flow returns an empty analysis
pub const EMPTY_REVIEW_MESSAGE: &str =
    "AI could not generate a review at this time. The response was empty.";

/// Ask the coach for guidance on the latest message
///
/// # Errors
///
/// Returns `INVALID_INPUT` for bad input, the provider's error, or
/// `EXTERNAL_SERVICE_ERROR` when the tips come back empty
pub async fn get_ai_coach_tips(
    flows: &FlowRunner,
    input: &CoachTipsInput,
) -> AppResult<CoachTipsOutput> {
    let output = flows.coach_tips(input).await?;
    if !output.is_complete() {
        warn!(history_turns = input.history.len(), "AI coach returned no tips");
        return Err(AppError::new(
            ErrorCode::ExternalServiceError,
            format!("{COACH_TIPS_FAILURE} The response was empty."),
        ));
    }
    Ok(output)
}

/// First day of the review window ending at `today`
#[must_use]
pub fn review_window_start(period: ReviewPeriod, today: NaiveDate) -> NaiveDate {
    let back = u64::try_from(period.lookback_days() - 1).unwrap_or(0);
    today.checked_sub_days(Days::new(back)).unwrap_or(today)
}

/// Review the user's active habits over the last week or month
///
/// Without active habits, or without any log in the window, a friendly
/// message is returned as the analysis and no LLM call is made.
///
/// # Errors
///
/// Returns a database error, the provider's error, or
/// `EXTERNAL_SERVICE_ERROR` when the analysis comes back empty
pub async fn get_ai_habit_review(
    db: &Database,
    flows: &FlowRunner,
    user_id: &str,
    period: ReviewPeriod,
    today: NaiveDate,
) -> AppResult<HabitInsightsOutput> {
    let habits = db.habits().list(user_id, HabitFilter::Active).await?;
    if habits.is_empty() {
        return Ok(HabitInsightsOutput {
            analysis: NO_ACTIVE_HABITS_MESSAGE.to_owned(),
        });
    }

    let from = review_window_start(period, today);
    let period_logs = db.logs().list_range(user_id, from, today).await?;
    if period_logs.is_empty() {
        return Ok(HabitInsightsOutput {
            analysis: format!(
                "No activity logged in the last {}. Start tracking your habits to get a review!",
                period.label()
            ),
        });
    }

    info!(
        user.id = %user_id,
        period = period.as_str(),
        habits = habits.len(),
        logs = period_logs.len(),
        "Generating AI habit review"
    );

    let input = HabitInsightsInput {
        user_id: user_id.to_owned(),
        time_period: period,
        habits,
        period_logs,
    };
    let output = flows.habit_insights(&input).await?;
    if !output.is_complete() {
        warn!(user.id = %user_id, "AI habit review returned an empty analysis");
        return Err(AppError::new(
            ErrorCode::ExternalServiceError,
            EMPTY_REVIEW_MESSAGE,
        ));
    }
    Ok(output)
}
