// ABOUTME: Program route handlers for generation, listing, activation, and deletion
// ABOUTME: Generation delegates to the AI pipeline; everything else is owner-scoped storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::models::{Exercise, Program};
use crate::resources::ServerResources;
use crate::routes::authenticate;
use crate::services::{generate_program, GenerateProgramRequest};

/// Response for a successful generation
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub program_id: i64,
}

/// A program together with its exercise rows
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgramDetailResponse {
    pub program: Program,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Program routes handler
pub struct ProgramRoutes;

impl ProgramRoutes {
    /// Create all program routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/programs/generate", post(Self::generate))
            .route("/programs", get(Self::list))
            .route("/programs/history", get(Self::history))
            .route("/programs/:id", get(Self::detail))
            .route("/programs/:id/activate", put(Self::activate))
            .route("/programs/:id", delete(Self::delete))
            .with_state(resources)
    }

    /// Generate a new program from the user's brief
    async fn generate(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<GenerateProgramRequest>,
    ) -> AppResult<Json<GenerateResponse>> {
        let user = authenticate(&headers, &resources).await?;

        let program_id = generate_program(
            &resources.database,
            resources.provider.as_ref(),
            &resources.config.llm.model,
            user.id,
            request,
            Utc::now().date_naive(),
        )
        .await?;

        Ok(Json(GenerateResponse {
            success: true,
            program_id,
        }))
    }

    /// All of the user's programs, newest first
    async fn list(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<Json<Vec<Program>>> {
        let user = authenticate(&headers, &resources).await?;
        let programs = resources.database.list_programs(user.id).await?;
        Ok(Json(programs))
    }

    /// The 10 most recent programs
    async fn history(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<Json<Vec<Program>>> {
        let user = authenticate(&headers, &resources).await?;
        let programs = resources.database.program_history(user.id).await?;
        Ok(Json(programs))
    }

    /// One program with its exercises
    async fn detail(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> AppResult<Json<ProgramDetailResponse>> {
        let user = authenticate(&headers, &resources).await?;

        let program = resources
            .database
            .get_program(user.id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Program"))?;
        let exercises = resources.database.get_program_exercises(id).await?;

        Ok(Json(ProgramDetailResponse { program, exercises }))
    }

    /// Make this program the active one
    async fn activate(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> AppResult<Json<MessageResponse>> {
        let user = authenticate(&headers, &resources).await?;

        let activated = resources.database.activate_program(user.id, id).await?;
        if !activated {
            return Err(AppError::not_found("Program"));
        }

        info!(user_id = %user.id, program_id = id, "Activated program");

        Ok(Json(MessageResponse {
            message: "Program activated".into(),
        }))
    }

    /// Delete a program with its exercises and sessions
    async fn delete(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> AppResult<Json<MessageResponse>> {
        let user = authenticate(&headers, &resources).await?;

        let deleted = resources.database.delete_program(user.id, id).await?;
        if !deleted {
            return Err(AppError::not_found("Program"));
        }

        info!(user_id = %user.id, program_id = id, "Deleted program");

        Ok(Json(MessageResponse {
            message: "Program deleted".into(),
        }))
    }
}
