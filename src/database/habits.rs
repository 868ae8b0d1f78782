// ABOUTME: Habit persistence: create, read, list by archive state, update, archive and delete
// ABOUTME: Every statement is scoped by user id so other users' habits read as not found
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use consistent_core::models::{
    decode_target_days, encode_target_days, Habit, HabitFilter, HabitFrequency, ValidatedHabit,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, now_utc, parse_timestamp, Database};
use crate::errors::{AppError, AppResult};

impl Database {
    pub(super) async fn migrate_habits(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS habits (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                frequency TEXT NOT NULL CHECK (frequency IN ('daily', 'weekly')),
                target_days TEXT NOT NULL DEFAULT '',
                archived INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create habits table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_habits_user_archived ON habits(user_id, archived)",
        )
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create habits index: {e}")))?;

        Ok(())
    }
}

/// Habit database operations manager
pub struct HabitManager {
    pool: SqlitePool,
}

impl HabitManager {
    /// Create a new habit manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new, unarchived habit
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create(&self, user_id: &str, habit: ValidatedHabit) -> AppResult<Habit> {
        let id = Uuid::new_v4().to_string();
        let created_at = now_utc();

        sqlx::query(
            r"
            INSERT INTO habits (id, user_id, name, description, frequency, target_days, archived, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
            ",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&habit.name)
        .bind(&habit.description)
        .bind(habit.frequency.as_str())
        .bind(encode_target_days(&habit.target_days))
        .bind(format_timestamp(created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create habit: {e}")))?;

        Ok(Habit {
            id,
            user_id: user_id.to_owned(),
            name: habit.name,
            description: habit.description,
            frequency: habit.frequency,
            target_days: habit.target_days,
            archived: false,
            created_at,
        })
    }

    /// Get a habit owned by the user
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` when the habit is absent or owned by someone else
    pub async fn get(&self, user_id: &str, habit_id: &str) -> AppResult<Habit> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, name, description, frequency, target_days, archived, created_at
            FROM habits
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(habit_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get habit: {e}")))?;

        row.map_or_else(
            || Err(AppError::not_found("Habit").with_resource_id(habit_id)),
            |row| habit_from_row(&row),
        )
    }

    /// List the user's habits
    ///
    /// Active habits come newest first, archived habits alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt
    pub async fn list(&self, user_id: &str, filter: HabitFilter) -> AppResult<Vec<Habit>> {
        let sql = match filter {
            HabitFilter::Active => {
                r"
                SELECT id, user_id, name, description, frequency, target_days, archived, created_at
                FROM habits
                WHERE user_id = $1 AND archived = 0
                ORDER BY created_at DESC
                "
            }
            HabitFilter::Archived => {
                r"
                SELECT id, user_id, name, description, frequency, target_days, archived, created_at
                FROM habits
                WHERE user_id = $1 AND archived = 1
                ORDER BY name COLLATE NOCASE ASC
                "
            }
            HabitFilter::All => {
                r"
                SELECT id, user_id, name, description, frequency, target_days, archived, created_at
                FROM habits
                WHERE user_id = $1
                ORDER BY archived ASC, created_at DESC
                "
            }
        };

        let rows = sqlx::query(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list habits: {e}")))?;

        rows.iter().map(habit_from_row).collect()
    }

    /// Replace the editable fields of a habit
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` when the user does not own the habit
    pub async fn update(
        &self,
        user_id: &str,
        habit_id: &str,
        habit: ValidatedHabit,
    ) -> AppResult<Habit> {
        let result = sqlx::query(
            r"
            UPDATE habits
            SET name = $1, description = $2, frequency = $3, target_days = $4
            WHERE id = $5 AND user_id = $6
            ",
        )
        .bind(&habit.name)
        .bind(&habit.description)
        .bind(habit.frequency.as_str())
        .bind(encode_target_days(&habit.target_days))
        .bind(habit_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update habit: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Habit").with_resource_id(habit_id));
        }
        self.get(user_id, habit_id).await
    }

    /// Archive or restore a habit
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` when the user does not own the habit
    pub async fn set_archived(&self, user_id: &str, habit_id: &str, archived: bool) -> AppResult<Habit> {
        let result = sqlx::query("UPDATE habits SET archived = $1 WHERE id = $2 AND user_id = $3")
            .bind(archived)
            .bind(habit_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update habit archive state: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Habit").with_resource_id(habit_id));
        }
        self.get(user_id, habit_id).await
    }

    /// Delete a habit together with all of its logs
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` when the user does not own the habit
    pub async fn delete(&self, user_id: &str, habit_id: &str) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let deleted = sqlx::query("DELETE FROM habits WHERE id = $1 AND user_id = $2")
            .bind(habit_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete habit: {e}")))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found("Habit").with_resource_id(habit_id));
        }

        sqlx::query("DELETE FROM habit_logs WHERE habit_id = $1 AND user_id = $2")
            .bind(habit_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete habit logs: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit habit deletion: {e}")))?;
        Ok(())
    }
}

fn habit_from_row(row: &SqliteRow) -> AppResult<Habit> {
    let frequency: String = row.get("frequency");
    let target_days: String = row.get("target_days");
    let created_at: String = row.get("created_at");

    Ok(Habit {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        frequency: frequency
            .parse::<HabitFrequency>()
            .map_err(|e| AppError::database(format!("Corrupt habit frequency: {}", e.message)))?,
        target_days: decode_target_days(&target_days)?,
        archived: row.get("archived"),
        created_at: parse_timestamp(&created_at)?,
    })
}
