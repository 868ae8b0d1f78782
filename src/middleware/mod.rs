// ABOUTME: HTTP middleware for request tracing, request ids and cross-origin access
// ABOUTME: Provides request ID generation, span creation and the CORS layer for the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

pub mod cors;
pub mod tracing;

// CORS configuration
pub use cors::setup_cors;

// Request tracing and correlation
pub use self::tracing::{make_request_span, MakeRequestIdentifier, REQUEST_ID_HEADER};
