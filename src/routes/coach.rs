// ABOUTME: Route handlers for AI coaching tips and periodic habit reviews
// ABOUTME: Coach history is supplied by the client on each request and never stored
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use consistent_core::models::ReviewPeriod;
use serde::Deserialize;

use super::{json_body, query_params, TodayQuery};
use crate::auth::authenticate;
use crate::errors::AppError;
use crate::flows::CoachTipsInput;
use crate::resources::ServerResources;
use crate::services::coaching;

/// Body of a review request
#[derive(Debug, Deserialize)]
pub struct ReviewBody {
    /// `weekly` or `monthly`
    pub period: ReviewPeriod,
}

/// Coaching routes implementation
pub struct CoachRoutes;

impl CoachRoutes {
    /// Create coaching routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/coach/tips", post(Self::handle_tips))
            .route("/api/insights/review", post(Self::handle_review))
            .with_state(resources)
    }

    /// Handle POST /api/coach/tips
    async fn handle_tips(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<CoachTipsInput>, JsonRejection>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources).await?;
        let input = json_body(body)?;

        let output = coaching::get_ai_coach_tips(&resources.flows, &input).await?;
        Ok((StatusCode::OK, Json(output)).into_response())
    }

    /// Handle POST /api/insights/review
    async fn handle_review(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<TodayQuery>, QueryRejection>,
        body: Result<Json<ReviewBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let today = query_params(query)?.resolve()?;
        let body = json_body(body)?;

        let output = coaching::get_ai_habit_review(
            &resources.database,
            &resources.flows,
            &user.uid,
            body.period,
            today,
        )
        .await?;
        Ok((StatusCode::OK, Json(output)).into_response())
    }
}
