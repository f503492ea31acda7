// ABOUTME: Authentication route handlers for registration, login, profile, and password change
// ABOUTME: Register and login are public; profile and password change require a bearer token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::resources::ServerResources;
use crate::routes::authenticate;

/// Minimum accepted password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// Request to register a new account
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub goals: Vec<String>,
}

fn default_level() -> String {
    "beginner".into()
}

/// Request to log in
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to change the password
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Public view of a user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub level: String,
    pub goals: Vec<String>,
    pub role: String,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.display_name.clone(),
            level: user.experience_level.clone(),
            goals: user.goals.clone(),
            role: user.role.as_str().to_owned(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Response carrying a fresh token and the user
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/register", post(Self::register))
            .route("/auth/login", post(Self::login))
            .route("/auth/me", get(Self::me))
            .route("/auth/password", put(Self::change_password))
            .with_state(resources)
    }

    /// Register a new account
    async fn register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> AppResult<(StatusCode, Json<AuthResponse>)> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        if request.name.trim().is_empty() {
            return Err(AppError::invalid_input("Name is required"));
        }

        if resources
            .database
            .get_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Email already in use"));
        }

        let password_hash = hash_password(request.password).await?;
        let user = User::new(
            request.email,
            password_hash,
            request.name,
            request.level,
            request.goals,
        );

        resources.database.create_user(&user).await?;
        let token = resources.auth_manager.generate_token(&user)?;

        info!(user_id = %user.id, "Registered new user");

        Ok((
            StatusCode::CREATED,
            Json(AuthResponse {
                message: "Account created".into(),
                token,
                user: UserResponse::from(&user),
            }),
        ))
    }

    /// Log in with email and password
    async fn login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> AppResult<Json<AuthResponse>> {
        if request.email.is_empty() || request.password.is_empty() {
            return Err(AppError::invalid_input("Email and password are required"));
        }

        // Same message whether the email or the password is wrong
        let user = resources
            .database
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        let valid = verify_password(request.password, user.password_hash.clone()).await?;
        if !valid {
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        let token = resources.auth_manager.generate_token(&user)?;

        Ok(Json(AuthResponse {
            message: "Logged in".into(),
            token,
            user: UserResponse::from(&user),
        }))
    }

    /// Current user's profile
    async fn me(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<Json<UserResponse>> {
        let user = authenticate(&headers, &resources).await?;
        Ok(Json(UserResponse::from(&user)))
    }

    /// Change the current user's password
    async fn change_password(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ChangePasswordRequest>,
    ) -> AppResult<Json<MessageResponse>> {
        let user = authenticate(&headers, &resources).await?;

        let valid = verify_password(request.current_password, user.password_hash.clone()).await?;
        if !valid {
            return Err(AppError::invalid_input("Current password is incorrect"));
        }

        validate_password(&request.new_password)?;
        let new_hash = hash_password(request.new_password).await?;
        resources
            .database
            .update_user_password(user.id, &new_hash)
            .await?;

        Ok(Json(MessageResponse {
            message: "Password updated".into(),
        }))
    }
}

fn validate_email(email: &str) -> AppResult<()> {
    let well_formed = email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
        && email.rsplit('@').next().is_some_and(|d| d.contains('.'));
    if well_formed {
        Ok(())
    } else {
        Err(AppError::invalid_input("Invalid email address"))
    }
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
