// ABOUTME: Habit actions: add, update, delete, archive, unarchive and completion toggling
// ABOUTME: Validates drafts and checks the caller owns the habit before every mutation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use chrono::NaiveDate;
use consistent_core::dates::format_date;
use consistent_core::models::{Habit, HabitDraft};

use crate::database::{Database, ToggleOutcome};
use crate::errors::AppResult;
use crate::logging::AppLogger;

/// Create a habit from a draft
///
/// # Errors
///
/// Returns `INVALID_INPUT` for an invalid draft or a database error
pub async fn add_habit(db: &Database, user_id: &str, draft: HabitDraft) -> AppResult<Habit> {
    let habit = db.habits().create(user_id, draft.validate()?).await?;
    AppLogger::log_habit_event(user_id, &habit.id, "created");
    Ok(habit)
}

/// Replace a habit's name, description, frequency and target days
///
/// # Errors
///
/// Returns `INVALID_INPUT` for an invalid draft or `RESOURCE_NOT_FOUND` when
/// the caller does not own the habit
pub async fn update_habit(
    db: &Database,
    user_id: &str,
    habit_id: &str,
    draft: HabitDraft,
) -> AppResult<Habit> {
    let habit = db.habits().update(user_id, habit_id, draft.validate()?).await?;
    AppLogger::log_habit_event(user_id, habit_id, "updated");
    Ok(habit)
}

/// Delete a habit and its logs
///
/// # Errors
///
/// Returns `RESOURCE_NOT_FOUND` when the caller does not own the habit
pub async fn delete_habit(db: &Database, user_id: &str, habit_id: &str) -> AppResult<()> {
    db.habits().delete(user_id, habit_id).await?;
    AppLogger::log_habit_event(user_id, habit_id, "deleted");
    Ok(())
}

/// Hide a habit from the active views
///
/// # Errors
///
/// Returns `RESOURCE_NOT_FOUND` when the caller does not own the habit
pub async fn archive_habit(db: &Database, user_id: &str, habit_id: &str) -> AppResult<Habit> {
    let habit = db.habits().set_archived(user_id, habit_id, true).await?;
    AppLogger::log_habit_event(user_id, habit_id, "archived");
    Ok(habit)
}

/// Return an archived habit to the active views
///
/// # Errors
///
/// Returns `RESOURCE_NOT_FOUND` when the caller does not own the habit
pub async fn unarchive_habit(db: &Database, user_id: &str, habit_id: &str) -> AppResult<Habit> {
    let habit = db.habits().set_archived(user_id, habit_id, false).await?;
    AppLogger::log_habit_event(user_id, habit_id, "unarchived");
    Ok(habit)
}

/// Mark a habit completed or not completed on a day
///
/// # Errors
///
/// Returns `RESOURCE_NOT_FOUND` when the caller does not own the habit
pub async fn toggle_completion(
    db: &Database,
    user_id: &str,
    habit_id: &str,
    date: NaiveDate,
    completed: bool,
) -> AppResult<ToggleOutcome> {
    db.habits().get(user_id, habit_id).await?;
    let outcome = db.logs().toggle(user_id, habit_id, date, completed).await?;

    let event = match &outcome {
        ToggleOutcome::Created(_) => "log_created",
        ToggleOutcome::Updated(_) => "log_updated",
        ToggleOutcome::Unchanged => "log_unchanged",
    };
    AppLogger::log_habit_event(user_id, habit_id, &format!("{event} {}", format_date(date)));
    Ok(outcome)
}
