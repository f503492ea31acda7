// ABOUTME: Shared setup helpers for integration tests
// ABOUTME: Builds in-memory resources, users, bearer tokens, and the full router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach
#![allow(dead_code)]

use anyhow::Result;
use coach_server::{
    auth::{hash_password, AuthManager},
    config::{AuthConfig, CorsConfig, LlmConfig, ServerConfig},
    database::Database,
    llm::LlmProvider,
    models::{User, UserRole},
    resources::ServerResources,
    routes,
};
use std::sync::{Arc, Once};

/// Password used by every account the helpers create
pub const TEST_PASSWORD: &str = "password123";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Configuration pointing at nothing real; the provider is always injected
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database_url: "sqlite::memory:".into(),
        auth: AuthConfig {
            jwt_secret: "integration_test_secret".into(),
            jwt_expiry_hours: 24,
        },
        llm: LlmConfig {
            base_url: "http://localhost:0".into(),
            api_key: None,
            model: "mock-model".into(),
            chat_model: "mock-chat-model".into(),
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".into()],
        },
    }
}

/// Full resource container over an in-memory database
pub async fn create_test_resources(
    provider: Arc<dyn LlmProvider>,
) -> Result<Arc<ServerResources>> {
    init_test_logging();

    let database = Database::new("sqlite::memory:").await?;
    let config = test_config();
    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_expiry_hours,
    );

    Ok(Arc::new(ServerResources::new(
        database,
        auth_manager,
        provider,
        config,
    )))
}

/// The complete application router plus the resources behind it
pub async fn setup_app(
    provider: Arc<dyn LlmProvider>,
) -> Result<(axum::Router, Arc<ServerResources>)> {
    let resources = create_test_resources(provider).await?;
    Ok((routes::router(resources.clone()), resources))
}

/// Create a regular account with [`TEST_PASSWORD`]
pub async fn create_test_user(resources: &ServerResources, email: &str) -> Result<User> {
    let password_hash = hash_password(TEST_PASSWORD.into()).await?;
    let user = User::new(
        email.into(),
        password_hash,
        "Test User".into(),
        "intermediate".into(),
        vec!["strength".into()],
    );
    resources.database.create_user(&user).await?;
    Ok(user)
}

/// Create an admin account with [`TEST_PASSWORD`]
pub async fn create_admin_user(resources: &ServerResources, email: &str) -> Result<User> {
    let password_hash = hash_password(TEST_PASSWORD.into()).await?;
    let mut user = User::new(
        email.into(),
        password_hash,
        "Admin".into(),
        "advanced".into(),
        vec![],
    );
    user.role = UserRole::Admin;
    resources.database.create_user(&user).await?;
    Ok(user)
}

/// Authorization header value for the given user
pub fn bearer_for(resources: &ServerResources, user: &User) -> String {
    let token = resources
        .auth_manager
        .generate_token(user)
        .expect("Failed to generate test token");
    format!("Bearer {token}")
}
