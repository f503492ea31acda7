// ABOUTME: Program modification pipeline applying AI-rewritten days to the active program
// ABOUTME: Each rewritten day is a transactional delete-then-reinsert; other days stay untouched
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use tracing::{info, instrument};
use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::llm::plan::parse_day_rewrites;
use crate::llm::prompts::{modification_prompt, MODIFICATION_SYSTEM_PROMPT};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Result of a modification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModificationOutcome {
    /// The listed days were rewritten
    Updated { days: Vec<String> },
    /// The model returned no rewritten days; nothing was changed
    NotUnderstood,
}

/// Apply a free-text modification instruction to the user's active program.
///
/// Returns 404 when no active program exists. An empty rewrite set from the
/// model is a legitimate non-error outcome and mutates nothing.
#[instrument(skip(db, provider, instruction), fields(user_id = %user_id))]
pub async fn modify_program(
    db: &Database,
    provider: &dyn LlmProvider,
    model: &str,
    user_id: Uuid,
    instruction: &str,
) -> AppResult<ModificationOutcome> {
    if instruction.trim().is_empty() {
        return Err(AppError::invalid_input("Modification instruction is required"));
    }

    let program = db
        .get_active_program(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Active program"))?;

    let exercises = db.get_program_exercises(program.id).await?;

    let chat_request = ChatRequest::new(vec![
        ChatMessage::system(MODIFICATION_SYSTEM_PROMPT),
        ChatMessage::user(modification_prompt(&exercises, instruction)),
    ])
    .with_model(model)
    .with_json_mode();

    let response = provider.complete(&chat_request).await?;
    let rewrites = parse_day_rewrites(&response.content)?;

    if rewrites.modified_days.is_empty() {
        info!(program_id = program.id, "Model returned no rewritten days");
        return Ok(ModificationOutcome::NotUnderstood);
    }

    let mut days = Vec::with_capacity(rewrites.modified_days.len());
    for day in &rewrites.modified_days {
        let day_label = day.day.to_lowercase();
        db.replace_day_exercises(program.id, &day_label, &day.exercises)
            .await?;
        days.push(day_label);
    }

    info!(program_id = program.id, days = ?days, "Rewrote program days");

    Ok(ModificationOutcome::Updated { days })
}
