// ABOUTME: Route handlers for habit CRUD, archiving and completion logs
// ABOUTME: Every endpoint authenticates and scopes its work to the caller's habits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! Habit routes
//!
//! All endpoints require a Firebase ID token. A habit owned by someone else
//! reads as not found.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use consistent_core::dates::parse_date;
use consistent_core::models::{Habit, HabitDraft, HabitFilter, HabitLog};
use serde::{Deserialize, Serialize};

use super::{json_body, query_params};
use crate::auth::authenticate;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::habits as habit_service;

/// Query parameters for listing habits
#[derive(Debug, Default, Deserialize)]
pub struct ListHabitsQuery {
    /// `active` (default), `archived` or `all`
    #[serde(default)]
    pub status: HabitFilter,
}

/// Response listing habits
#[derive(Debug, Serialize)]
pub struct HabitListResponse {
    /// Matching habits
    pub habits: Vec<Habit>,
    /// Number of habits returned
    pub total: usize,
}

/// Body of a completion toggle
#[derive(Debug, Deserialize)]
pub struct ToggleBody {
    /// New completion state for the day
    pub completed: bool,
}

/// Query parameters for listing logs
#[derive(Debug, Deserialize)]
pub struct LogRangeQuery {
    /// First day, `YYYY-MM-DD`
    pub from: String,
    /// Last day, `YYYY-MM-DD`
    pub to: String,
}

/// Response listing logs
#[derive(Debug, Serialize)]
pub struct LogListResponse {
    /// Logs in the range, oldest first
    pub logs: Vec<HabitLog>,
}

/// Habit routes implementation
pub struct HabitRoutes;

impl HabitRoutes {
    /// Create all habit routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/habits",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/habits/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/habits/:id/archive", post(Self::handle_archive))
            .route("/api/habits/:id/unarchive", post(Self::handle_unarchive))
            .route("/api/habits/:id/logs/:date", put(Self::handle_toggle))
            .route("/api/logs", get(Self::handle_list_logs))
            .with_state(resources)
    }

    /// Handle GET /api/habits
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<ListHabitsQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let query = query_params(query)?;

        let habits = resources.database.habits().list(&user.uid, query.status).await?;
        let response = HabitListResponse {
            total: habits.len(),
            habits,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/habits
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<HabitDraft>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let draft = json_body(body)?;

        let habit = habit_service::add_habit(&resources.database, &user.uid, draft).await?;
        Ok((StatusCode::CREATED, Json(habit)).into_response())
    }

    /// Handle GET /api/habits/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let habit = resources.database.habits().get(&user.uid, &id).await?;
        Ok((StatusCode::OK, Json(habit)).into_response())
    }

    /// Handle PUT /api/habits/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        body: Result<Json<HabitDraft>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let draft = json_body(body)?;

        let habit = habit_service::update_habit(&resources.database, &user.uid, &id, draft).await?;
        Ok((StatusCode::OK, Json(habit)).into_response())
    }

    /// Handle DELETE /api/habits/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        habit_service::delete_habit(&resources.database, &user.uid, &id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/habits/:id/archive
    async fn handle_archive(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let habit = habit_service::archive_habit(&resources.database, &user.uid, &id).await?;
        Ok((StatusCode::OK, Json(habit)).into_response())
    }

    /// Handle POST /api/habits/:id/unarchive
    async fn handle_unarchive(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let habit = habit_service::unarchive_habit(&resources.database, &user.uid, &id).await?;
        Ok((StatusCode::OK, Json(habit)).into_response())
    }

    /// Handle PUT /api/habits/:id/logs/:date
    async fn handle_toggle(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((id, date)): Path<(String, String)>,
        body: Result<Json<ToggleBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let date = parse_date(&date)?;
        let body = json_body(body)?;

        let outcome = habit_service::toggle_completion(
            &resources.database,
            &user.uid,
            &id,
            date,
            body.completed,
        )
        .await?;
        Ok((StatusCode::OK, Json(outcome)).into_response())
    }

    /// Handle GET /api/logs
    async fn handle_list_logs(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<LogRangeQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let query = query_params(query)?;
        let from = parse_date(&query.from)?;
        let to = parse_date(&query.to)?;
        if from > to {
            return Err(AppError::invalid_input(
                "'from' must not be after 'to'",
            ));
        }

        let logs = resources.database.logs().list_range(&user.uid, from, to).await?;
        Ok((StatusCode::OK, Json(LogListResponse { logs })).into_response())
    }
}
