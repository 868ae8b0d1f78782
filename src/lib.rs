// ABOUTME: Main library entry point for the git-consistent habit tracking server
// ABOUTME: Provides the REST API, identity verification, persistence and LLM coaching flows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

#![deny(unsafe_code)]

//! # git-consistent Server
//!
//! A habit-tracking HTTP service. Users authenticate with Firebase ID tokens,
//! create daily or weekly habits, log completions, browse a GitHub-style
//! contribution graph and ask an LLM for coaching tips, periodic reviews and
//! journal reflections.
//!
//! ## Architecture
//!
//! - **routes**: thin axum handlers that authenticate and delegate
//! - **services**: business rules shared by the handlers
//! - **database**: `SQLite` managers, one per entity
//! - **flows**: schema-validated prompt templates around one LLM call each
//! - **llm**: Gemini and `OpenAI`-compatible providers
//! - **auth**: Firebase ID token verification
//!
//! Pure streak, contribution-graph and progress computations live in the
//! `consistent-intelligence` crate; shared models and errors in
//! `consistent-core`.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use git_consistent_server::config::ServerConfig;
//! use git_consistent_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("git-consistent configured with port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Firebase ID token verification and request authentication
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// `SQLite` persistence
pub mod database;

/// Unified error handling, re-exported from `consistent-core`
pub mod errors;

/// Schema-validated LLM prompt flows
pub mod flows;

/// LLM provider abstraction and implementations
pub mod llm;

/// Structured logging setup and application log helpers
pub mod logging;

/// HTTP middleware: request ids, tracing spans and CORS
pub mod middleware;

/// Shared server resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Domain services behind the routes
pub mod services;
