// ABOUTME: Admin route handlers gated by the admin role attribute
// ABOUTME: Platform stats, non-admin user listing, password overwrite, and cascade delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::database::admin::{AdminUserSummary, PlatformStats};
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use crate::routes::authenticate_admin;

/// Request to overwrite a user's password
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Admin routes handler
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/admin/stats", get(Self::stats))
            .route("/admin/users", get(Self::list_users))
            .route("/admin/users/:id/password", put(Self::set_password))
            .route("/admin/users/:id", delete(Self::delete_user))
            .with_state(resources)
    }

    /// Platform-wide counts
    async fn stats(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<Json<PlatformStats>> {
        authenticate_admin(&headers, &resources).await?;
        let stats = resources.database.platform_stats().await?;
        Ok(Json(stats))
    }

    /// Every non-admin account
    async fn list_users(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<Json<Vec<AdminUserSummary>>> {
        authenticate_admin(&headers, &resources).await?;
        let users = resources.database.list_regular_users().await?;
        Ok(Json(users))
    }

    /// Overwrite a user's password
    async fn set_password(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Json(request): Json<SetPasswordRequest>,
    ) -> AppResult<Json<MessageResponse>> {
        let admin = authenticate_admin(&headers, &resources).await?;

        if request.new_password.len() < 8 {
            return Err(AppError::invalid_input(
                "Password must be at least 8 characters",
            ));
        }

        let hash = hash_password(request.new_password).await?;
        let updated = resources.database.update_user_password(id, &hash).await?;
        if !updated {
            return Err(AppError::not_found("User"));
        }

        info!(admin_id = %admin.id, user_id = %id, "Admin reset user password");

        Ok(Json(MessageResponse {
            message: "Password updated".into(),
        }))
    }

    /// Delete a user and everything they own
    async fn delete_user(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<Json<MessageResponse>> {
        let admin = authenticate_admin(&headers, &resources).await?;

        if admin.id == id {
            return Err(AppError::invalid_input("Admins cannot delete themselves"));
        }

        let deleted = resources.database.delete_user_cascade(id).await?;
        if !deleted {
            return Err(AppError::not_found("User"));
        }

        info!(admin_id = %admin.id, user_id = %id, "Admin deleted user");

        Ok(Json(MessageResponse {
            message: "User deleted".into(),
        }))
    }
}
