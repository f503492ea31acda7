// ABOUTME: Prompt templates for program generation, modification, and the chat coach
// ABOUTME: Holds the deterministic exercise-count directive derived from session length
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

//! Prompt construction for the AI gateway. All templates demand strict JSON
//! where a structured payload is expected, and pin schedule day labels to the
//! lowercase French weekday names regardless of the requested output
//! language (storage and the session join depend on those labels).

use serde_json::json;

/// System persona for the conversational coach
pub const COACH_SYSTEM_PROMPT: &str =
    "You are an expert strength and conditioning coach, motivating and direct. \
     Give concrete, practical answers. Stay within training, sports nutrition, \
     and recovery; for any serious health issue, recommend seeing a doctor.";

/// System persona for the modification call
pub const MODIFICATION_SYSTEM_PROMPT: &str =
    "You are a JSON API that edits strength-training programs.";

/// Everything the generation prompt needs about the user's request
#[derive(Debug, Clone)]
pub struct ProgramBrief {
    pub goals: Vec<String>,
    pub level: String,
    pub duration_minutes: i64,
    /// Lowercase French weekday names
    pub training_days: Vec<String>,
    pub equipment: String,
    pub equipment_details: Option<String>,
    pub age: i64,
    pub weight_kg: f64,
    pub constraints: Option<String>,
    /// Target language for all free text in the output
    pub language: String,
}

/// Deterministic exercise-count directive for a session length.
///
/// The model systematically under-fills long sessions without an explicit
/// count, so the instruction is derived here instead of left to the prompt.
#[must_use]
pub fn exercise_count_directive(duration_minutes: i64) -> &'static str {
    match duration_minutes {
        ..=30 => "exactly 3 exercises",
        31..=45 => "exactly 4 or 5 exercises",
        46..=60 => "between 6 and 7 exercises",
        61..=90 => "between 8 and 10 exercises",
        _ => "about 10 exercises",
    }
}

/// Build the full generation prompt for a user brief
#[must_use]
pub fn generation_prompt(brief: &ProgramBrief) -> String {
    let directive = exercise_count_directive(brief.duration_minutes);
    let details = brief.equipment_details.as_deref().unwrap_or("Standard");
    let constraints = brief.constraints.as_deref().unwrap_or("None");

    format!(
        r#"You are an expert strength coach and nutritionist.
Create a strength-training program in STRICT JSON format.

PROFILE:
- Goal: {goals}
- Level: {level}
- Session length: {duration} minutes
- Training days: {days}
- Equipment: {equipment} ({details})
- About: {age} years old, {weight}kg.
- Constraints: {constraints}

HARD RULES:
1. For {duration}-minute sessions you MUST program {directive} per session. This is CRITICAL.
2. The 'nutrition_tips', 'progression_tips' and 'safety_tips' arrays MUST each contain at least 3 entries. Never leave them empty.
3. Write all free text in {language}, but every "day" value MUST be one of the lowercase French weekday names: lundi, mardi, mercredi, jeudi, vendredi, samedi, dimanche.
4. Respond with the JSON only.

EXPECTED JSON FORMAT:
{{
  "programName": "Program name",
  "description": "Short description",
  "calories_target": 2500,
  "proteins_target": 160,
  "nutrition_tips": ["...", "...", "..."],
  "progression_tips": ["...", "...", "..."],
  "safety_tips": ["...", "...", "..."],
  "schedule": [
    {{
      "day": "lundi",
      "exercises": [
        {{
          "name": "Squat",
          "sets": "4",
          "reps": "10",
          "rest": "90",
          "tempo": "2-0-2-0",
          "tips": "Push the knees outward"
        }}
      ]
    }}
  ]
}}"#,
        goals = brief.goals.join(", "),
        level = brief.level,
        duration = brief.duration_minutes,
        days = brief.training_days.join(", "),
        equipment = brief.equipment,
        details = details,
        age = brief.age,
        weight = brief.weight_kg,
        constraints = constraints,
        directive = directive,
        language = brief.language,
    )
}

/// Build the modification prompt around the current exercise rows
#[must_use]
pub fn modification_prompt(current_exercises: &[crate::models::Exercise], instruction: &str) -> String {
    let rows: Vec<serde_json::Value> = current_exercises
        .iter()
        .map(|e| {
            json!({
                "day": e.day,
                "name": e.name,
                "sets": e.sets,
                "reps": e.reps,
                "rest_seconds": e.rest_seconds,
                "tempo": e.tempo,
                "tips": e.tips,
                "notes": e.notes,
                "order_index": e.order_index,
            })
        })
        .collect();
    let current = serde_json::to_string(&rows).unwrap_or_else(|_| "[]".into());

    format!(
        r#"You manage a strength-training program database.
Here are the current exercises of the program (JSON format):
{current}

The user wants this modification: "{instruction}"

YOUR TASK:
1. Identify the affected day or days.
2. Return ONLY the complete exercise list for each modified day.
3. If the user asks to add, add. If the user asks to replace, replace.
4. Keep the same JSON format. Day labels stay lowercase French weekday names.

Expected response format (STRICT JSON):
{{
  "modifiedDays": [
    {{
      "day": "lundi",
      "exercises": [
        {{ "name": "Leg press", "sets": 4, "reps": "10", "rest_seconds": 90, "notes": "...", "tempo": "...", "tips": "..." }}
      ]
    }}
  ]
}}
Every other exercise of a modified day must be present too."#
    )
}
