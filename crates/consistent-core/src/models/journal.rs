// ABOUTME: Journal entry model with AI-generated day summary and mood analysis
// ABOUTME: Entries on the same day are numbered through entry_suffix starting at 1
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A free-text journal entry and its reflection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Entry ID (UUID v4)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Day the entry was written
    pub date: NaiveDate,
    /// The user's text
    pub entry_text: String,
    /// Summary of the day produced by the analysis flow
    pub ai_day_summary: String,
    /// Mood reflection produced by the analysis flow
    pub ai_mood_analysis: String,
    /// Position of this entry among the user's entries on `date` (1-based)
    pub entry_suffix: i64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}
