// ABOUTME: Journal actions: analyze an entry with the LLM, then store it with its analysis
// ABOUTME: The analysis must succeed before anything is written
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use chrono::NaiveDate;
use consistent_core::constants::limits::{DEFAULT_JOURNAL_LIST_LIMIT, MAX_JOURNAL_LIST_LIMIT};
use consistent_core::models::JournalEntry;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::database::Database;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::flows::{FlowOutput, FlowRunner, JournalAnalysisInput, JOURNAL_ANALYSIS_FAILURE};

/// Prefix of the error raised when the analysis succeeded but saving failed
pub const SAVE_FAILURE_PREFIX: &str = "AI analysis complete, but failed to save journal entry: ";

/// Analysis of an entry together with the stored record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedEntry {
    /// Summary of the day
    pub day_summary: String,
    /// Reflection on mood
    pub mood_analysis: String,
    /// Stored entry
    pub entry: JournalEntry,
}

/// Analyze a journal entry and save it as the next entry of `today`
///
/// # Errors
///
/// - `INVALID_INPUT` for an empty or oversized entry
/// - the provider's error when the LLM call fails
/// - `EXTERNAL_SERVICE_ERROR` when the analysis is incomplete
/// - the database error, prefixed with [`SAVE_FAILURE_PREFIX`], when saving fails
pub async fn analyze_journal_entry(
    db: &Database,
    flows: &FlowRunner,
    user_id: &str,
    journal_text: &str,
    today: NaiveDate,
) -> AppResult<AnalyzedEntry> {
    let input = JournalAnalysisInput {
        journal_text: journal_text.to_owned(),
    };
    let analysis = flows.journal_analysis(&input).await?;
    if !analysis.is_complete() {
        warn!(user.id = %user_id, "AI journal analysis returned an incomplete result");
        return Err(AppError::new(
            ErrorCode::ExternalServiceError,
            format!("{JOURNAL_ANALYSIS_FAILURE} The response was incomplete."),
        ));
    }

    let entry = db
        .journal()
        .create(
            user_id,
            today,
            journal_text,
            &analysis.day_summary,
            &analysis.mood_analysis,
        )
        .await
        .map_err(|e| {
            error!(user.id = %user_id, error = %e, "Failed to save journal entry");
            e.prefixed(SAVE_FAILURE_PREFIX)
        })?;

    info!(
        user.id = %user_id,
        entry.id = %entry.id,
        entry.suffix = entry.entry_suffix,
        "Journal entry saved"
    );

    Ok(AnalyzedEntry {
        day_summary: analysis.day_summary,
        mood_analysis: analysis.mood_analysis,
        entry,
    })
}

/// List the user's journal entries
///
/// A missing limit uses the default; larger limits are capped.
///
/// # Errors
///
/// Returns `INVALID_INPUT` for a non-positive limit or a database error
pub async fn list_entries(
    db: &Database,
    user_id: &str,
    limit: Option<i64>,
) -> AppResult<Vec<JournalEntry>> {
    let limit = limit.unwrap_or(DEFAULT_JOURNAL_LIST_LIMIT);
    if limit < 1 {
        return Err(AppError::invalid_input("limit must be at least 1"));
    }
    db.journal()
        .list(user_id, limit.min(MAX_JOURNAL_LIST_LIMIT))
        .await
}
