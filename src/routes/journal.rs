// ABOUTME: Route handlers for journal entries
// ABOUTME: Posting an entry runs the AI analysis before the entry is stored
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use consistent_core::dates::resolve_today;
use consistent_core::models::JournalEntry;
use serde::{Deserialize, Serialize};

use super::{json_body, query_params};
use crate::auth::authenticate;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::journal;

/// Query parameters for listing entries
#[derive(Debug, Default, Deserialize)]
pub struct ListJournalQuery {
    /// Maximum number of entries
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Query parameters for saving an entry
#[derive(Debug, Default, Deserialize)]
pub struct SaveJournalQuery {
    /// Day to file the entry under, defaults to today (UTC)
    #[serde(default)]
    pub today: Option<String>,
}

/// Body of a new entry
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalBody {
    /// Entry text
    pub journal_text: String,
}

/// Response listing entries
#[derive(Debug, Serialize)]
pub struct JournalListResponse {
    /// Entries, newest day first
    pub entries: Vec<JournalEntry>,
}

/// Journal routes implementation
pub struct JournalRoutes;

impl JournalRoutes {
    /// Create journal routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/journal",
                get(Self::handle_list).post(Self::handle_create),
            )
            .with_state(resources)
    }

    /// Handle GET /api/journal
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<ListJournalQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let query = query_params(query)?;

        let entries = journal::list_entries(&resources.database, &user.uid, query.limit).await?;
        Ok((StatusCode::OK, Json(JournalListResponse { entries })).into_response())
    }

    /// Handle POST /api/journal
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<SaveJournalQuery>, QueryRejection>,
        body: Result<Json<JournalBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let today = resolve_today(query_params(query)?.today.as_deref())?;
        let body = json_body(body)?;

        let analyzed = journal::analyze_journal_entry(
            &resources.database,
            &resources.flows,
            &user.uid,
            &body.journal_text,
            today,
        )
        .await?;
        Ok((StatusCode::CREATED, Json(analyzed)).into_response())
    }
}
