// ABOUTME: Error types for the server crate, re-exported from consistent-core
// ABOUTME: Gives server modules a local crate::errors path for AppError and friends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! # Unified Error Handling System
//!
//! Every fallible operation returns [`AppResult`]. Handlers return
//! `Result<Response, AppError>`; the error renders as an [`ErrorResponse`]
//! with the HTTP status of its [`ErrorCode`].

pub use consistent_core::errors::{
    AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse, ErrorResponseDetails,
};
