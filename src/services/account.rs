// ABOUTME: Session, profile and settings actions for the authenticated user
// ABOUTME: Mirrors verified identity claims into the profile store on every session call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use consistent_core::models::{UserProfile, UserSettings};
use serde::Serialize;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::database::Database;
use crate::errors::AppResult;
use crate::logging::AppLogger;

/// Profile and settings returned when a session is established
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Stored profile
    pub profile: UserProfile,
    /// Current settings
    pub settings: UserSettings,
}

/// Record the verified identity and load the user's settings
///
/// # Errors
///
/// Returns a database error if the profile cannot be stored
pub async fn establish_session(db: &Database, user: &AuthenticatedUser) -> AppResult<SessionSummary> {
    let profile = db.users().upsert_from_identity(user).await?;
    let settings = db.settings().get(&user.uid).await?;
    AppLogger::log_auth_event(&user.uid, "session", true, None);
    Ok(SessionSummary { profile, settings })
}

/// Save the proactive nudge preference
///
/// # Errors
///
/// Returns a database error if the upsert fails
pub async fn update_nudge_preference(
    db: &Database,
    user_id: &str,
    enabled: bool,
) -> AppResult<UserSettings> {
    let settings = db.settings().set_nudges(user_id, enabled).await?;
    info!(user.id = %user_id, nudges_enabled = enabled, "Nudge preference updated");
    Ok(settings)
}
