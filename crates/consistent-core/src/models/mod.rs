// ABOUTME: Core data models for the git-consistent habit tracker
// ABOUTME: Re-exports Habit, HabitLog, JournalEntry, UserSettings and review types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! # Data Models
//!
//! Every entity is scoped to an owning user id issued by the identity provider.
//! JSON field names are camelCase on the wire.

mod habit;
mod journal;
mod review;
mod user;

pub use habit::{
    decode_target_days, encode_target_days, Habit, HabitDraft, HabitFilter, HabitFrequency,
    HabitLog, ValidatedHabit, WEEKDAY_NARROW_NAMES, WEEKDAY_SHORT_NAMES,
};
pub use journal::JournalEntry;
pub use review::{ChatRole, ChatTurn, ReviewPeriod};
pub use user::{UserProfile, UserSettings};
