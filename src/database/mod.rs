// ABOUTME: SQLite persistence for habits, logs, journal entries, settings and profiles
// ABOUTME: Owns the connection pool, idempotent migrations and the per-entity managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! # Database Management
//!
//! [`Database`] wraps a `SqlitePool`. Each entity has a manager constructed
//! from a clone of the pool; every query is scoped by the owning user id.
//!
//! Timestamps are stored as fixed-width RFC3339 text (microsecond precision,
//! `Z` suffix) so that lexical order matches chronological order. Calendar
//! days are stored as `YYYY-MM-DD`.

mod habits;
mod journal;
mod logs;
mod settings;
mod users;

pub use habits::HabitManager;
pub use journal::JournalManager;
pub use logs::{HabitLogManager, ToggleOutcome};
pub use settings::SettingsManager;
pub use users::UserManager;

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use consistent_core::dates::DATE_FORMAT;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::fs;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};

/// Pool size for file-backed databases
const FILE_POOL_SIZE: u32 = 5;

/// Database handle shared by every request
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations
    ///
    /// File databases are created on first use together with their parent
    /// directory. `sqlite::memory:` databases use a single long-lived
    /// connection so every query sees the same tables.
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_INVALID` for a malformed URL and `DATABASE_ERROR` when
    /// the connection or a migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");

        if let Some(path) = sqlite_file_path(database_url) {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }

        // Ensure SQLite creates the database file if it doesn't exist
        let connection_url = if in_memory || database_url.contains("mode=") {
            database_url.to_owned()
        } else if database_url.contains('?') {
            format!("{database_url}&mode=rwc")
        } else {
            format!("{database_url}?mode=rwc")
        };

        let options = SqliteConnectOptions::from_str(&connection_url)
            .map_err(|e| AppError::config_invalid(format!("Invalid DATABASE_URL: {e}")))?
            .foreign_keys(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(FILE_POOL_SIZE)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(in_memory, "Database connected and migrated");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns `DATABASE_ERROR` if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_habits().await?;
        self.migrate_habit_logs().await?;
        self.migrate_journal().await?;
        self.migrate_settings().await?;
        self.migrate_users().await?;
        debug!("Database schema is up to date");
        Ok(())
    }

    /// Check the database answers a trivial query
    ///
    /// # Errors
    ///
    /// Returns `DATABASE_ERROR` when the query fails
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Habit operations
    #[must_use]
    pub fn habits(&self) -> HabitManager {
        HabitManager::new(self.pool.clone())
    }

    /// Habit log operations
    #[must_use]
    pub fn logs(&self) -> HabitLogManager {
        HabitLogManager::new(self.pool.clone())
    }

    /// Journal operations
    #[must_use]
    pub fn journal(&self) -> JournalManager {
        JournalManager::new(self.pool.clone())
    }

    /// Settings operations
    #[must_use]
    pub fn settings(&self) -> SettingsManager {
        SettingsManager::new(self.pool.clone())
    }

    /// Profile operations
    #[must_use]
    pub fn users(&self) -> UserManager {
        UserManager::new(self.pool.clone())
    }
}

/// Filesystem path of a file-backed SQLite URL, `None` for memory databases
pub(crate) fn sqlite_file_path(database_url: &str) -> Option<&str> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(path)
    }
}

/// Current time truncated to the stored precision
pub(crate) fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Corrupt timestamp '{raw}': {e}")))
}

pub(crate) fn parse_stored_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| AppError::database(format!("Corrupt date '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite:./data/git_consistent.db"),
            Some("./data/git_consistent.db")
        );
        assert_eq!(sqlite_file_path("sqlite:///tmp/x.db?mode=rwc"), Some("/tmp/x.db"));
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
    }

    #[test]
    fn test_timestamp_format_is_fixed_width() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 12, 8, 0, 0).unwrap();
        let formatted = format_timestamp(ts);
        assert_eq!(formatted, "2024-06-12T08:00:00.000000Z");
        assert_eq!(parse_timestamp(&formatted).unwrap(), ts);
        assert!(parse_timestamp("yesterday").is_err());
    }
}
