// ABOUTME: Habit intelligence engine: streaks, contribution graph, progress, quotes
// ABOUTME: Pure functions over habits and logs, evaluated against an explicit "today"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

#![deny(unsafe_code)]

//! # git-consistent Intelligence
//!
//! Every computation here takes the reference day as a parameter instead of reading
//! the clock, so results are reproducible and tests can pin the calendar.

/// GitHub-style calendar heatmap
pub mod contribution;
/// Frequency labels for habit cards
pub mod labels;
/// Daily and weekly completion progress
pub mod progress;
/// Daily quote rotation
pub mod quotes;
/// Streak counting
pub mod streaks;

#[cfg(test)]
mod test_support;

pub use contribution::{
    build_graph, level_for_count, ContributionDay, ContributionGraph, MonthLabel,
};
pub use labels::frequency_label;
pub use progress::{is_due, today_progress, weekly_progress, DayProgress, TodayProgress};
pub use quotes::daily_quote;
pub use streaks::StreakCalculator;
