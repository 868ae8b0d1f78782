// ABOUTME: Validation limits and date-window sizes for habits, journals, and reviews
// ABOUTME: Single source of truth shared by validation, queries, and graph layout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

/// Minimum habit name length in characters (after trimming)
pub const HABIT_NAME_MIN_CHARS: usize = 2;

/// Maximum habit name length in characters
pub const HABIT_NAME_MAX_CHARS: usize = 50;

/// Maximum habit description length in characters
pub const HABIT_DESCRIPTION_MAX_CHARS: usize = 200;

/// Highest valid weekday number (0 = Sunday .. 6 = Saturday)
pub const MAX_WEEKDAY: u8 = 6;

/// Days in a week
pub const DAYS_PER_WEEK: i64 = 7;

/// Maximum journal entry length in characters
pub const JOURNAL_TEXT_MAX_CHARS: usize = 10_000;

/// Maximum coach message length in characters
pub const COACH_INPUT_MAX_CHARS: usize = 4_000;

/// Maximum number of prior turns sent to the coach
pub const COACH_HISTORY_MAX_TURNS: usize = 50;

/// Contribution graph width in weeks
pub const CONTRIBUTION_GRAPH_WEEKS: i64 = 53;

/// Minimum column gap between two month labels on the contribution graph
pub const MONTH_LABEL_MIN_COLUMN_GAP: usize = 3;

/// Completion count at which a contribution cell reaches the top intensity level
pub const CONTRIBUTION_MAX_LEVEL: u8 = 4;

/// Weekly review lookback (today and the 6 days before it)
pub const WEEKLY_REVIEW_DAYS: i64 = 7;

/// Monthly review lookback (today and the 29 days before it)
pub const MONTHLY_REVIEW_DAYS: i64 = 30;

/// Log window loaded for sidebar streaks
pub const SIDEBAR_LOG_WINDOW_DAYS: i64 = 60;

/// Days shown on the weekly progress chart
pub const WEEKLY_PROGRESS_DAYS: i64 = 7;

/// Default number of journal entries returned by a listing
pub const DEFAULT_JOURNAL_LIST_LIMIT: i64 = 100;

/// Largest page of journal entries a caller may request
pub const MAX_JOURNAL_LIST_LIMIT: i64 = 500;
