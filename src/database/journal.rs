// ABOUTME: Journal entry persistence with per-day entry numbering
// ABOUTME: The entry suffix is computed and inserted in the same transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use chrono::NaiveDate;
use consistent_core::dates::format_date;
use consistent_core::models::JournalEntry;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, now_utc, parse_stored_date, parse_timestamp, Database};
use crate::errors::{AppError, AppResult};

impl Database {
    pub(super) async fn migrate_journal(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS journal_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                entry_text TEXT NOT NULL,
                ai_day_summary TEXT NOT NULL,
                ai_mood_analysis TEXT NOT NULL,
                entry_suffix INTEGER NOT NULL CHECK (entry_suffix >= 1),
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create journal_entries table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_journal_entries_user_date ON journal_entries(user_id, date)",
        )
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create journal_entries index: {e}")))?;

        Ok(())
    }
}

/// Journal database operations manager
pub struct JournalManager {
    pool: SqlitePool,
}

impl JournalManager {
    /// Create a new journal manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save an analyzed entry as the next entry of the day
    ///
    /// # Errors
    ///
    /// Returns an error if the count or insert fails
    pub async fn create(
        &self,
        user_id: &str,
        date: NaiveDate,
        entry_text: &str,
        day_summary: &str,
        mood_analysis: &str,
    ) -> AppResult<JournalEntry> {
        let day = format_date(date);
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let existing: i64 = sqlx::query(
            "SELECT COUNT(*) AS entry_count FROM journal_entries WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id)
        .bind(&day)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to count journal entries: {e}")))?
        .get("entry_count");

        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_owned(),
            date,
            entry_text: entry_text.to_owned(),
            ai_day_summary: day_summary.to_owned(),
            ai_mood_analysis: mood_analysis.to_owned(),
            entry_suffix: existing + 1,
            created_at: now_utc(),
        };

        sqlx::query(
            r"
            INSERT INTO journal_entries (id, user_id, date, entry_text, ai_day_summary, ai_mood_analysis, entry_suffix, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&entry.id)
        .bind(user_id)
        .bind(&day)
        .bind(&entry.entry_text)
        .bind(&entry.ai_day_summary)
        .bind(&entry.ai_mood_analysis)
        .bind(entry.entry_suffix)
        .bind(format_timestamp(entry.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert journal entry: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit journal entry: {e}")))?;
        Ok(entry)
    }

    /// List the user's entries, newest day first and in writing order within a day
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt
    pub async fn list(&self, user_id: &str, limit: i64) -> AppResult<Vec<JournalEntry>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, date, entry_text, ai_day_summary, ai_mood_analysis, entry_suffix, created_at
            FROM journal_entries
            WHERE user_id = $1
            ORDER BY date DESC, created_at ASC
            LIMIT $2
            ",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list journal entries: {e}")))?;

        rows.iter().map(entry_from_row).collect()
    }

    /// List the user's entries for one day in writing order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt
    pub async fn list_for_date(&self, user_id: &str, date: NaiveDate) -> AppResult<Vec<JournalEntry>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, date, entry_text, ai_day_summary, ai_mood_analysis, entry_suffix, created_at
            FROM journal_entries
            WHERE user_id = $1 AND date = $2
            ORDER BY entry_suffix ASC
            ",
        )
        .bind(user_id)
        .bind(format_date(date))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list journal entries: {e}")))?;

        rows.iter().map(entry_from_row).collect()
    }
}

fn entry_from_row(row: &SqliteRow) -> AppResult<JournalEntry> {
    let date: String = row.get("date");
    let created_at: String = row.get("created_at");

    Ok(JournalEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        date: parse_stored_date(&date)?,
        entry_text: row.get("entry_text"),
        ai_day_summary: row.get("ai_day_summary"),
        ai_mood_analysis: row.get("ai_mood_analysis"),
        entry_suffix: row.get("entry_suffix"),
        created_at: parse_timestamp(&created_at)?,
    })
}
