// ABOUTME: Route handlers for the dashboard, sidebar and contribution graph views
// ABOUTME: Accepts an optional today override so clients and tests can pin the calendar
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use consistent_core::dates::resolve_today;
use serde::Deserialize;

use super::{query_params, TodayQuery};
use crate::auth::authenticate;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::dashboard;

/// Query parameters for the contribution graph
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsQuery {
    /// Restrict the graph to one habit
    #[serde(default)]
    pub habit_id: Option<String>,
    /// Reference day override
    #[serde(default)]
    pub today: Option<String>,
}

/// Dashboard routes implementation
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create dashboard routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/dashboard", get(Self::handle_dashboard))
            .route("/api/sidebar", get(Self::handle_sidebar))
            .route("/api/contributions", get(Self::handle_contributions))
            .with_state(resources)
    }

    /// Handle GET /api/dashboard
    async fn handle_dashboard(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<TodayQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let today = query_params(query)?.resolve()?;

        let view = dashboard::dashboard(&resources.database, &user.uid, today).await?;
        Ok((StatusCode::OK, Json(view)).into_response())
    }

    /// Handle GET /api/sidebar
    async fn handle_sidebar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<TodayQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let today = query_params(query)?.resolve()?;

        let view = dashboard::sidebar(&resources.database, &user.uid, today).await?;
        Ok((StatusCode::OK, Json(view)).into_response())
    }

    /// Handle GET /api/contributions
    async fn handle_contributions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<ContributionsQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let query = query_params(query)?;
        let today = resolve_today(query.today.as_deref())?;

        let graph = dashboard::contributions(
            &resources.database,
            &user.uid,
            query.habit_id.as_deref(),
            today,
        )
        .await?;
        Ok((StatusCode::OK, Json(graph)).into_response())
    }
}
