// ABOUTME: HTTP route modules and the top-level router assembly
// ABOUTME: Shared bearer-token authentication helper used by every protected handler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

pub mod admin;
pub mod ai;
pub mod analytics;
pub mod auth;
pub mod health;
pub mod programs;
pub mod sessions;

use axum::http::HeaderMap;
use axum::Router;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::resources::ServerResources;

/// Build the full application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes(resources.clone()))
        .merge(auth::AuthRoutes::routes(resources.clone()))
        .merge(programs::ProgramRoutes::routes(resources.clone()))
        .merge(ai::AiRoutes::routes(resources.clone()))
        .merge(sessions::SessionRoutes::routes(resources.clone()))
        .merge(analytics::AnalyticsRoutes::routes(resources.clone()))
        .merge(admin::AdminRoutes::routes(resources))
}

/// Extract and authenticate the user behind the bearer token
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> AppResult<User> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::auth_invalid("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth_invalid("Authorization header must be a bearer token"))?;

    let claims = resources.auth_manager.validate_token(token)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::auth_invalid("Invalid user id in token"))?;

    resources
        .database
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::auth_invalid("User no longer exists"))
}

/// Authenticate and require the admin role
pub(crate) async fn authenticate_admin(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> AppResult<User> {
    let user = authenticate(headers, resources).await?;
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin access required"));
    }
    Ok(user)
}
