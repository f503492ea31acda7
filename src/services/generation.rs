// ABOUTME: Program generation pipeline from user brief to persisted program graph
// ABOUTME: Derive directive, prompt the gateway, validate the plan, persist in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::llm::plan::parse_workout_plan;
use crate::llm::prompts::{generation_prompt, ProgramBrief};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Temperature for generation; some creativity, stable structure
const GENERATION_TEMPERATURE: f32 = 0.7;

/// Personal context embedded in the generation prompt
#[derive(Debug, Clone, Deserialize)]
pub struct PersonalInfo {
    pub age: i64,
    pub weight: f64,
    #[serde(default)]
    pub constraints: Option<String>,
}

/// Wire request for `POST /programs/generate`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProgramRequest {
    /// Lowercase French weekday names
    pub training_days: Vec<String>,
    pub duration_minutes: i64,
    pub equipment: String,
    #[serde(default)]
    pub equipment_details: Option<String>,
    pub level: String,
    pub goals: Vec<String>,
    pub personal_info: PersonalInfo,
    /// Target language for the generated free text
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "French".into()
}

impl GenerateProgramRequest {
    fn validate(&self) -> AppResult<()> {
        if self.training_days.is_empty() {
            return Err(AppError::invalid_input("At least one training day is required"));
        }
        if self.goals.is_empty() {
            return Err(AppError::invalid_input("At least one goal is required"));
        }
        if self.duration_minutes <= 0 {
            return Err(AppError::invalid_input("Session duration must be positive"));
        }
        Ok(())
    }
}

/// Run the full generation pipeline and return the new program id.
///
/// A gateway failure or an invalid plan aborts before any write; the
/// persist step itself is one transaction, so a storage failure leaves
/// no partial rows either.
#[instrument(skip(db, provider, request), fields(user_id = %user_id))]
pub async fn generate_program(
    db: &Database,
    provider: &dyn LlmProvider,
    model: &str,
    user_id: Uuid,
    request: GenerateProgramRequest,
    today: NaiveDate,
) -> AppResult<i64> {
    request.validate()?;

    let brief = ProgramBrief {
        goals: request.goals.clone(),
        level: request.level.clone(),
        duration_minutes: request.duration_minutes,
        training_days: request.training_days.clone(),
        equipment: request.equipment.clone(),
        equipment_details: request.equipment_details.clone(),
        age: request.personal_info.age,
        weight_kg: request.personal_info.weight,
        constraints: request.personal_info.constraints.clone(),
        language: request.language.clone(),
    };

    let chat_request = ChatRequest::new(vec![ChatMessage::system(generation_prompt(&brief))])
        .with_model(model)
        .with_temperature(GENERATION_TEMPERATURE)
        .with_json_mode();

    let response = provider.complete(&chat_request).await?;
    let plan = parse_workout_plan(&response.content)?;

    let program_id = db
        .create_program_graph(
            user_id,
            &plan,
            request.duration_minutes,
            &request.level,
            request.goals.first().map_or("", String::as_str),
            today,
        )
        .await?;

    info!(
        program_id,
        days = plan.schedule.len(),
        "Generated and persisted program"
    );

    Ok(program_id)
}
