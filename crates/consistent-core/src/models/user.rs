// ABOUTME: Per-user settings and profile models
// ABOUTME: Profiles mirror verified identity claims; settings hold the nudge preference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-level preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Owning user
    pub user_id: String,
    /// Whether the user wants proactive nudges
    pub proactive_nudges_enabled: bool,
    /// Last write, absent until the first update
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserSettings {
    /// Settings for a user who never saved any
    #[must_use]
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_owned(),
            proactive_nudges_enabled: false,
            updated_at: None,
        }
    }
}

/// Profile populated from identity-provider claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity-provider uid
    pub user_id: String,
    /// Email claim
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    /// Name claim
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub display_name: Option<String>,
    /// Picture claim
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub photo_url: Option<String>,
    /// First session
    pub created_at: DateTime<Utc>,
    /// Most recent session
    pub last_seen_at: DateTime<Utc>,
}
