// ABOUTME: Per-user settings storage
// ABOUTME: Reads fall back to defaults and writes merge into the single row per user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use consistent_core::models::UserSettings;
use sqlx::{Row, SqlitePool};

use super::{format_timestamp, now_utc, parse_timestamp, Database};
use crate::errors::{AppError, AppResult};

impl Database {
    pub(super) async fn migrate_settings(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_settings (
                user_id TEXT PRIMARY KEY,
                proactive_nudges_enabled INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT
            )
            ",
        )
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create user_settings table: {e}")))?;
        Ok(())
    }
}

/// Settings database operations manager
pub struct SettingsManager {
    pool: SqlitePool,
}

impl SettingsManager {
    /// Create a new settings manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the user's settings, or defaults when none were saved
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, user_id: &str) -> AppResult<UserSettings> {
        let row = sqlx::query(
            "SELECT proactive_nudges_enabled, updated_at FROM user_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user settings: {e}")))?;

        let Some(row) = row else {
            return Ok(UserSettings::defaults_for(user_id));
        };

        let updated_at: Option<String> = row.get("updated_at");
        Ok(UserSettings {
            user_id: user_id.to_owned(),
            proactive_nudges_enabled: row.get("proactive_nudges_enabled"),
            updated_at: updated_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    /// Store the proactive nudge preference
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails
    pub async fn set_nudges(&self, user_id: &str, enabled: bool) -> AppResult<UserSettings> {
        let updated_at = now_utc();

        sqlx::query(
            r"
            INSERT INTO user_settings (user_id, proactive_nudges_enabled, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT(user_id) DO UPDATE SET
                proactive_nudges_enabled = excluded.proactive_nudges_enabled,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id)
        .bind(enabled)
        .bind(format_timestamp(updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save user settings: {e}")))?;

        Ok(UserSettings {
            user_id: user_id.to_owned(),
            proactive_nudges_enabled: enabled,
            updated_at: Some(updated_at),
        })
    }
}
