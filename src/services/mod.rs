// ABOUTME: Domain service layer for habit tracking actions extracted from route handlers
// ABOUTME: Each action takes the verified user id and works through the database and flows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! Domain service layer
//!
//! Route handlers authenticate, parse input and delegate here. Services own
//! the business rules: ownership checks, date windows, empty-data messages and
//! the checks on LLM output.

/// Session establishment, profile and settings actions
pub mod account;

/// AI coaching tips and periodic habit reviews
pub mod coaching;

/// Dashboard, sidebar and contribution graph aggregates
pub mod dashboard;

/// Habit CRUD and completion toggling
pub mod habits;

/// Journal analysis and storage
pub mod journal;
