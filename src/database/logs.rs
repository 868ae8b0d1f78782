// ABOUTME: Habit log persistence with one log per habit and calendar day
// ABOUTME: Toggling inserts, updates or leaves a log untouched inside a single transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use chrono::NaiveDate;
use consistent_core::dates::format_date;
use consistent_core::models::HabitLog;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, now_utc, parse_stored_date, parse_timestamp, Database};
use crate::errors::{AppError, AppResult};

impl Database {
    pub(super) async fn migrate_habit_logs(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS habit_logs (
                id TEXT PRIMARY KEY,
                habit_id TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                completed INTEGER NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create habit_logs table: {e}")))?;

        for statement in [
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_habit_logs_habit_date ON habit_logs(habit_id, date)",
            "CREATE INDEX IF NOT EXISTS idx_habit_logs_user_date ON habit_logs(user_id, date)",
        ] {
            sqlx::query(statement)
                .execute(self.pool())
                .await
                .map_err(|e| AppError::database(format!("Failed to create habit_logs index: {e}")))?;
        }

        Ok(())
    }
}

/// Result of toggling a habit's completion for a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "log", rename_all = "lowercase")]
pub enum ToggleOutcome {
    /// A completed log was inserted
    Created(HabitLog),
    /// The existing log's completion changed
    Updated(HabitLog),
    /// Unchecking a day without a log
    Unchanged,
}

impl ToggleOutcome {
    /// The log after the toggle, if one exists
    #[must_use]
    pub const fn log(&self) -> Option<&HabitLog> {
        match self {
            Self::Created(log) | Self::Updated(log) => Some(log),
            Self::Unchanged => None,
        }
    }
}

/// Habit log database operations manager
pub struct HabitLogManager {
    pool: SqlitePool,
}

impl HabitLogManager {
    /// Create a new log manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the log of a habit on a day
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find(
        &self,
        user_id: &str,
        habit_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<HabitLog>> {
        let row = sqlx::query(
            r"
            SELECT id, habit_id, user_id, date, completed, notes, created_at
            FROM habit_logs
            WHERE user_id = $1 AND habit_id = $2 AND date = $3
            ",
        )
        .bind(user_id)
        .bind(habit_id)
        .bind(format_date(date))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find habit log: {e}")))?;

        row.as_ref().map(log_from_row).transpose()
    }

    /// Set a habit's completion for a day
    ///
    /// The caller is responsible for checking the habit belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn toggle(
        &self,
        user_id: &str,
        habit_id: &str,
        date: NaiveDate,
        completed: bool,
    ) -> AppResult<ToggleOutcome> {
        let day = format_date(date);
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let existing = sqlx::query(
            r"
            SELECT id, habit_id, user_id, date, completed, notes, created_at
            FROM habit_logs
            WHERE user_id = $1 AND habit_id = $2 AND date = $3
            ",
        )
        .bind(user_id)
        .bind(habit_id)
        .bind(&day)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to find habit log: {e}")))?;

        let outcome = match existing.as_ref().map(log_from_row).transpose()? {
            Some(mut log) => {
                sqlx::query("UPDATE habit_logs SET completed = $1 WHERE id = $2")
                    .bind(completed)
                    .bind(&log.id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| AppError::database(format!("Failed to update habit log: {e}")))?;
                log.completed = completed;
                ToggleOutcome::Updated(log)
            }
            None if completed => {
                let log = HabitLog {
                    id: Uuid::new_v4().to_string(),
                    habit_id: habit_id.to_owned(),
                    user_id: user_id.to_owned(),
                    date,
                    completed: true,
                    notes: None,
                    created_at: now_utc(),
                };
                sqlx::query(
                    r"
                    INSERT INTO habit_logs (id, habit_id, user_id, date, completed, notes, created_at)
                    VALUES ($1, $2, $3, $4, 1, NULL, $5)
                    ",
                )
                .bind(&log.id)
                .bind(habit_id)
                .bind(user_id)
                .bind(&day)
                .bind(format_timestamp(log.created_at))
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::from(e).prefixed("Failed to create habit log: "))?;
                ToggleOutcome::Created(log)
            }
            None => ToggleOutcome::Unchanged,
        };

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit habit log: {e}")))?;
        Ok(outcome)
    }

    /// List logs between two days inclusive, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt
    pub async fn list_range(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<HabitLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, habit_id, user_id, date, completed, notes, created_at
            FROM habit_logs
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC, created_at ASC
            ",
        )
        .bind(user_id)
        .bind(format_date(from))
        .bind(format_date(to))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list habit logs: {e}")))?;

        rows.iter().map(log_from_row).collect()
    }

    /// List logs on or after a day, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt
    pub async fn list_since(&self, user_id: &str, from: NaiveDate) -> AppResult<Vec<HabitLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, habit_id, user_id, date, completed, notes, created_at
            FROM habit_logs
            WHERE user_id = $1 AND date >= $2
            ORDER BY date ASC, created_at ASC
            ",
        )
        .bind(user_id)
        .bind(format_date(from))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list habit logs: {e}")))?;

        rows.iter().map(log_from_row).collect()
    }
}

fn log_from_row(row: &SqliteRow) -> AppResult<HabitLog> {
    let date: String = row.get("date");
    let created_at: String = row.get("created_at");

    Ok(HabitLog {
        id: row.get("id"),
        habit_id: row.get("habit_id"),
        user_id: row.get("user_id"),
        date: parse_stored_date(&date)?,
        completed: row.get("completed"),
        notes: row.get("notes"),
        created_at: parse_timestamp(&created_at)?,
    })
}
