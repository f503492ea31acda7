// ABOUTME: AI route handlers for the conversational coach and program modification
// ABOUTME: Chat is free-form text; modification goes through the strict rewrite pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::llm::prompts::COACH_SYSTEM_PROMPT;
use crate::llm::{ChatMessage, ChatRequest};
use crate::resources::ServerResources;
use crate::routes::authenticate;
use crate::services::{modify_program, ModificationOutcome};

/// Cap on coach replies; keeps conversational answers short
const CHAT_MAX_TOKENS: u32 = 500;

/// One prior exchange in the chat history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    /// "user" or anything else for the assistant
    pub sender: String,
    pub text: String,
}

/// Request for `POST /ai/chat`
#[derive(Debug, Deserialize)]
pub struct ChatCoachRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Reply from the coach
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCoachResponse {
    pub reply: String,
}

/// Request for `POST /ai/modify`
#[derive(Debug, Deserialize)]
pub struct ModifyRequest {
    pub instruction: String,
}

/// Outcome of a modification request
#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub message: String,
}

/// AI routes handler
pub struct AiRoutes;

impl AiRoutes {
    /// Create all AI routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/ai/chat", post(Self::chat))
            .route("/ai/modify", post(Self::modify))
            .with_state(resources)
    }

    /// Free-form conversation with the coach persona
    async fn chat(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ChatCoachRequest>,
    ) -> AppResult<Json<ChatCoachResponse>> {
        authenticate(&headers, &resources).await?;

        if request.message.trim().is_empty() {
            return Err(AppError::invalid_input("Message is required"));
        }

        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(ChatMessage::system(COACH_SYSTEM_PROMPT));
        for entry in &request.history {
            if entry.sender == "user" {
                messages.push(ChatMessage::user(&entry.text));
            } else {
                messages.push(ChatMessage::assistant(&entry.text));
            }
        }
        messages.push(ChatMessage::user(&request.message));

        let chat_request = ChatRequest::new(messages)
            .with_model(&resources.config.llm.chat_model)
            .with_max_tokens(CHAT_MAX_TOKENS);

        let response = resources.provider.complete(&chat_request).await?;

        Ok(Json(ChatCoachResponse {
            reply: response.content,
        }))
    }

    /// Apply a free-text instruction to the active program
    async fn modify(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ModifyRequest>,
    ) -> AppResult<Json<ModifyResponse>> {
        let user = authenticate(&headers, &resources).await?;

        let outcome = modify_program(
            &resources.database,
            resources.provider.as_ref(),
            &resources.config.llm.chat_model,
            user.id,
            &request.instruction,
        )
        .await?;

        let response = match outcome {
            ModificationOutcome::Updated { days } => ModifyResponse {
                success: Some(true),
                message: format!("Program updated for: {}", days.join(", ")),
            },
            ModificationOutcome::NotUnderstood => ModifyResponse {
                success: None,
                message: "I could not understand the modification. Try to be more specific."
                    .into(),
            },
        };

        Ok(Json(response))
    }
}
