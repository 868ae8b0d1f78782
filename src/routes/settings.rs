// ABOUTME: Route handlers for per-user settings
// ABOUTME: Reads return defaults until the user saves a preference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::json_body;
use crate::auth::authenticate;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::account;

/// Body of a nudge preference update
#[derive(Debug, Deserialize)]
pub struct NudgeBody {
    /// Whether proactive nudges are enabled
    pub enabled: bool,
}

/// Settings routes implementation
pub struct SettingsRoutes;

impl SettingsRoutes {
    /// Create settings routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/settings", get(Self::handle_get))
            .route("/api/settings/nudges", put(Self::handle_set_nudges))
            .with_state(resources)
    }

    /// Handle GET /api/settings
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let settings = resources.database.settings().get(&user.uid).await?;
        Ok((StatusCode::OK, Json(settings)).into_response())
    }

    /// Handle PUT /api/settings/nudges
    async fn handle_set_nudges(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<NudgeBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let body = json_body(body)?;

        let settings =
            account::update_nudge_preference(&resources.database, &user.uid, body.enabled).await?;
        Ok((StatusCode::OK, Json(settings)).into_response())
    }
}
