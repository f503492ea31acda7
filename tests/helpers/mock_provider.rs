// ABOUTME: Scripted in-memory LLM provider for integration tests
// ABOUTME: Pops queued replies in order and records every request it receives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use async_trait::async_trait;
use coach_server::errors::AppError;
use coach_server::llm::{ChatRequest, ChatResponse, LlmProvider};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Provider that replays a fixed script instead of calling a real API.
/// Running out of scripted replies behaves like an unreachable gateway.
pub struct MockProvider {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    /// Provider that answers with the given replies, in order
    pub fn scripted(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| (*r).to_owned()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider whose every call fails like a gateway outage
    #[allow(dead_code)]
    pub fn unreachable() -> Self {
        Self::scripted(&[])
    }

    /// Every request this provider has received so far
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Mock"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());

        let content = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::upstream_unavailable("AI gateway unreachable"))?;

        Ok(ChatResponse {
            content,
            model: "mock-model".into(),
            usage: None,
            finish_reason: Some("stop".into()),
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}
