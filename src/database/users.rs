// ABOUTME: User profile storage mirrored from verified identity claims
// ABOUTME: Profiles are upserted on every session, keeping the original creation time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use consistent_core::models::UserProfile;
use sqlx::{Row, SqlitePool};

use super::{format_timestamp, now_utc, parse_timestamp, Database};
use crate::auth::AuthenticatedUser;
use crate::errors::{AppError, AppResult};

impl Database {
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_profiles (
                user_id TEXT PRIMARY KEY,
                email TEXT,
                display_name TEXT,
                photo_url TEXT,
                created_at TEXT NOT NULL,
                last_seen_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create user_profiles table: {e}")))?;
        Ok(())
    }
}

/// Profile database operations manager
pub struct UserManager {
    pool: SqlitePool,
}

impl UserManager {
    /// Create a new user manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or refresh the profile for a verified identity
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert or the read-back fails
    pub async fn upsert_from_identity(&self, user: &AuthenticatedUser) -> AppResult<UserProfile> {
        let now = format_timestamp(now_utc());

        sqlx::query(
            r"
            INSERT INTO user_profiles (user_id, email, display_name, photo_url, created_at, last_seen_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT(user_id) DO UPDATE SET
                email = excluded.email,
                display_name = excluded.display_name,
                photo_url = excluded.photo_url,
                last_seen_at = excluded.last_seen_at
            ",
        )
        .bind(&user.uid)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.picture)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert user profile: {e}")))?;

        self.get(&user.uid).await
    }

    /// Get a stored profile
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` when the user never established a session
    pub async fn get(&self, user_id: &str) -> AppResult<UserProfile> {
        let row = sqlx::query(
            r"
            SELECT user_id, email, display_name, photo_url, created_at, last_seen_at
            FROM user_profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user profile: {e}")))?
        .ok_or_else(|| AppError::not_found("User profile").with_user_id(user_id))?;

        let created_at: String = row.get("created_at");
        let last_seen_at: String = row.get("last_seen_at");

        Ok(UserProfile {
            user_id: row.get("user_id"),
            email: row.get("email"),
            display_name: row.get("display_name"),
            photo_url: row.get("photo_url"),
            created_at: parse_timestamp(&created_at)?,
            last_seen_at: parse_timestamp(&last_seen_at)?,
        })
    }
}
