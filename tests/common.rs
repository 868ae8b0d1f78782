// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides an in-memory database, a stub identity verifier and a scripted LLM provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `git_consistent_server`

use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use chrono::NaiveDate;
use consistent_core::dates::parse_date;
use consistent_core::models::{HabitDraft, HabitFrequency};
use git_consistent_server::auth::{AuthenticatedUser, IdentityVerifier};
use git_consistent_server::config::ServerConfig;
use git_consistent_server::database::Database;
use git_consistent_server::errors::{AppError, AppResult, ErrorCode};
use git_consistent_server::flows::{FlowRunner, FlowSettings};
use git_consistent_server::llm::{
    ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage,
};
use git_consistent_server::resources::ServerResources;
use git_consistent_server::routes::build_router;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Parse a `YYYY-MM-DD` literal
pub fn day(value: &str) -> NaiveDate {
    parse_date(value).unwrap()
}

/// A daily habit draft
pub fn daily_draft(name: &str) -> HabitDraft {
    HabitDraft {
        name: name.to_owned(),
        description: None,
        frequency: HabitFrequency::Daily,
        target_days: None,
    }
}

/// A weekly habit draft due on the given weekdays
pub fn weekly_draft(name: &str, target_days: &[i64]) -> HabitDraft {
    HabitDraft {
        name: name.to_owned(),
        description: Some(format!("{name} on schedule")),
        frequency: HabitFrequency::Weekly,
        target_days: Some(target_days.to_vec()),
    }
}

/// Verifier accepting `token-<uid>` bearer tokens
///
/// `expired` yields `AUTH_EXPIRED`; anything else is `AUTH_INVALID`.
pub struct StubVerifier;

/// Prefix of tokens accepted by [`StubVerifier`]
pub const TOKEN_PREFIX: &str = "token-";

/// Bearer token for a uid
pub fn token_for(uid: &str) -> String {
    format!("{TOKEN_PREFIX}{uid}")
}

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, id_token: &str) -> AppResult<AuthenticatedUser> {
        if id_token == "expired" {
            return Err(AppError::auth_expired());
        }
        let uid = id_token
            .strip_prefix(TOKEN_PREFIX)
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| AppError::auth_invalid("Invalid token"))?;

        Ok(AuthenticatedUser {
            uid: uid.to_owned(),
            email: Some(format!("{uid}@example.com")),
            name: Some(format!("User {uid}")),
            picture: None,
        })
    }
}

/// One scripted provider reply
#[derive(Debug, Clone)]
pub enum Reply {
    /// Successful completion with this content
    Content(String),
    /// Failure with this code and message
    Fail(ErrorCode, String),
}

/// LLM provider that replays canned replies and records the requests it saw
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    /// Provider that answers with the given replies in order
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Provider answering once with `content`
    pub fn replying(content: &str) -> Arc<Self> {
        Self::new(vec![Reply::Content(content.to_owned())])
    }

    /// Number of completions requested so far
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Text of the last user message sent
    pub fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .and_then(|request| request.messages.last())
            .map(|message| message.content.clone())
    }

    /// The last request sent
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Content(content)) => Ok(ChatResponse {
                content,
                model: "scripted-model".to_owned(),
                usage: Some(TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
                finish_reason: Some("stop".to_owned()),
            }),
            Some(Reply::Fail(code, message)) => Err(AppError::new(code, message)),
            None => Err(AppError::external_unavailable(
                "scripted",
                "No scripted reply left",
            )),
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// Flow runner over a scripted provider
pub fn flow_runner(provider: Arc<ScriptedProvider>) -> FlowRunner {
    FlowRunner::new(provider, FlowSettings::default())
}

/// Server resources over an in-memory database, the stub verifier and `provider`
pub async fn create_test_resources(provider: Arc<ScriptedProvider>) -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(
        ServerConfig::default(),
        database,
        Arc::new(StubVerifier),
        flow_runner(provider),
    )))
}

/// Full application router for tests
pub async fn create_test_app(provider: Arc<ScriptedProvider>) -> Result<(Router, Arc<ServerResources>)> {
    let resources = create_test_resources(provider).await?;
    Ok((build_router(Arc::clone(&resources)), resources))
}
