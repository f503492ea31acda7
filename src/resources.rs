// ABOUTME: Shared server resources container for dependency injection
// ABOUTME: Bundles the database, auth manager, LLM provider, and configuration behind one Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::llm::LlmProvider;

/// Everything a request handler needs, created once at startup and shared
/// across all routes as `Arc<ServerResources>`
pub struct ServerResources {
    pub database: Database,
    pub auth_manager: AuthManager,
    pub provider: Arc<dyn LlmProvider>,
    pub config: ServerConfig,
}

impl ServerResources {
    /// Create a new resource container
    #[must_use]
    pub fn new(
        database: Database,
        auth_manager: AuthManager,
        provider: Arc<dyn LlmProvider>,
        config: ServerConfig,
    ) -> Self {
        Self {
            database,
            auth_manager,
            provider,
            config,
        }
    }
}
