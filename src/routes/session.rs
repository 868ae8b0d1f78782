// ABOUTME: Session and profile route handlers
// ABOUTME: Verifies the ID token, mirrors its claims into the profile store and returns settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth::authenticate;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::account;

/// Session routes implementation
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create session and profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/session", post(Self::handle_session))
            .route("/api/me", get(Self::handle_me))
            .with_state(resources)
    }

    /// Handle POST /api/auth/session
    async fn handle_session(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let summary = account::establish_session(&resources.database, &user).await?;
        Ok((StatusCode::OK, Json(summary)).into_response())
    }

    /// Handle GET /api/me
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let profile = resources.database.users().get(&user.uid).await?;
        Ok((StatusCode::OK, Json(profile)).into_response())
    }
}
