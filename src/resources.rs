// ABOUTME: Shared server resources handed to every route handler
// ABOUTME: Bundles configuration, database, identity verifier and prompt flow runner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::flows::FlowRunner;

/// Centralized resource container for dependency injection
///
/// Built once at startup and shared as `Arc<ServerResources>` router state.
#[derive(Clone)]
pub struct ServerResources {
    /// Effective configuration
    pub config: Arc<ServerConfig>,
    /// Database handle
    pub database: Database,
    /// ID token verifier
    pub verifier: Arc<dyn IdentityVerifier>,
    /// LLM prompt flows
    pub flows: FlowRunner,
}

impl ServerResources {
    /// Assemble the resources
    #[must_use]
    pub fn new(
        config: ServerConfig,
        database: Database,
        verifier: Arc<dyn IdentityVerifier>,
        flows: FlowRunner,
    ) -> Self {
        Self {
            config: Arc::new(config),
            database,
            verifier,
            flows,
        }
    }
}
