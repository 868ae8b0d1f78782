// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for validation limits, date windows, and service names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Validation and date-window limits
pub mod limits;

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// API endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Readiness endpoint
    pub const READY: &str = "/ready";
    /// API base path
    pub const API_BASE: &str = "/api";
}

/// Names of external collaborators as they appear in logs and error messages
pub mod service_names {
    /// Google Gemini API
    pub const GEMINI: &str = "gemini";
    /// Any `/chat/completions` compatible endpoint (Groq, `OpenAI`, Ollama, vLLM)
    pub const OPENAI_COMPATIBLE: &str = "openai-compatible";
    /// Firebase Authentication token verification
    pub const FIREBASE_AUTH: &str = "firebase-auth";
    /// Service name reported by health checks and logs
    pub const GIT_CONSISTENT_SERVER: &str = "git-consistent-server";
}
