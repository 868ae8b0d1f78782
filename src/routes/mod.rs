// ABOUTME: Route module organization for the git-consistent HTTP API
// ABOUTME: Assembles domain routers and the tower-http middleware stack into one Router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! Route module for the git-consistent server
//!
//! Each domain module contains only route definitions and thin handler
//! functions that authenticate, parse input and delegate to the service layer.

/// AI coaching tips and habit review routes
pub mod coach;
/// Dashboard, sidebar and contribution graph routes
pub mod dashboard;
/// Habit CRUD and completion log routes
pub mod habits;
/// Health check and readiness routes
pub mod health;
/// Journal routes
pub mod journal;
/// Session and profile routes
pub mod session;
/// User settings routes
pub mod settings;

pub use coach::CoachRoutes;
pub use dashboard::DashboardRoutes;
pub use habits::HabitRoutes;
pub use health::HealthRoutes;
pub use journal::JournalRoutes;
pub use session::SessionRoutes;
pub use settings::SettingsRoutes;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use axum::body::Body;
use axum::http::{Response, Uri};
use axum::Router;
use chrono::NaiveDate;
use consistent_core::dates::resolve_today;
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::errors::{AppError, AppResult};
use crate::middleware::{make_request_span, setup_cors, MakeRequestIdentifier};
use crate::resources::ServerResources;

/// Build the complete application router
#[must_use]
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let config = Arc::clone(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(SessionRoutes::routes(Arc::clone(&resources)))
        .merge(HabitRoutes::routes(Arc::clone(&resources)))
        .merge(DashboardRoutes::routes(Arc::clone(&resources)))
        .merge(CoachRoutes::routes(Arc::clone(&resources)))
        .merge(JournalRoutes::routes(Arc::clone(&resources)))
        .merge(SettingsRoutes::routes(resources))
        .fallback(handle_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestIdentifier))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(make_request_span)
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(setup_cors(&config))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.request_timeout_secs,
                )))
                .map_response(|response: Response<_>| response.map(Body::new))
                .layer(RequestBodyLimitLayer::new(config.max_body_bytes)),
        )
}

async fn handle_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}

/// Optional `today` override for date-relative views
#[derive(Debug, Default, Deserialize)]
pub struct TodayQuery {
    /// `YYYY-MM-DD`; the server's UTC date when absent
    #[serde(default)]
    pub today: Option<String>,
}

impl TodayQuery {
    /// Resolve the reference day
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for a malformed date
    pub fn resolve(&self) -> AppResult<NaiveDate> {
        resolve_today(self.today.as_deref())
    }
}

/// Unwrap a JSON body, reporting malformed input as `INVALID_INPUT`
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        AppError::invalid_input(format!("Invalid request body: {}", rejection.body_text()))
    })
}

/// Unwrap query parameters, reporting malformed input as `INVALID_INPUT`
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query.map(|Query(value)| value).map_err(|rejection| {
        AppError::invalid_input(format!("Invalid query parameters: {}", rejection.body_text()))
    })
}
