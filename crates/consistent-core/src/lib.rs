// ABOUTME: Core types and constants for the git-consistent habit tracker
// ABOUTME: Foundation crate with error handling, domain models, date helpers, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

#![deny(unsafe_code)]

//! # git-consistent Core
//!
//! Foundation crate providing shared types for the habit tracker. It performs no
//! I/O and changes infrequently, so the rest of the workspace compiles incrementally
//! on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Habits, logs, journal entries, settings and profiles
//! - **dates**: `YYYY-MM-DD` parsing and Sunday-based weekday numbering
//! - **constants**: Validation limits and date windows

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Calendar-day helpers
pub mod dates;

/// Core data models
pub mod models;
