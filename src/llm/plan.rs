// ABOUTME: Strict schema types and validation for AI-generated workout payloads
// ABOUTME: Model output is untrusted input; nothing reaches storage without passing here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

//! # Plan Schema
//!
//! Deserialization and validation for the two JSON payloads the model
//! produces: a full [`WorkoutPlan`] (generation) and a [`DayRewriteSet`]
//! (modification). The model is inconsistent about numeric fields, so
//! `sets`/`rest`/`reps` accept either a JSON number or a numeric string.
//! Anything that fails to parse or validate maps to an `InvalidAiOutput`
//! error and the caller persists nothing.

use serde::{Deserialize, Deserializer};

use crate::errors::{AppError, AppResult};

/// Inclusive bounds on plausible sets per exercise
const SETS_RANGE: std::ops::RangeInclusive<i64> = 1..=20;
/// Inclusive bounds on plausible rest seconds between sets
const REST_RANGE: std::ops::RangeInclusive<i64> = 0..=600;

/// Default rest when the model omits or mangles the field
const DEFAULT_REST_SECONDS: i64 = 60;
/// Default tempo notation
const DEFAULT_TEMPO: &str = "2-0-2-0";

/// Full generated program payload
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutPlan {
    #[serde(alias = "programName", default = "default_program_name")]
    pub program_name: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_calories", deserialize_with = "flexible_i64")]
    pub calories_target: i64,
    #[serde(default = "default_proteins", deserialize_with = "flexible_i64")]
    pub proteins_target: i64,
    #[serde(default)]
    pub nutrition_tips: Vec<String>,
    #[serde(default)]
    pub progression_tips: Vec<String>,
    #[serde(default)]
    pub safety_tips: Vec<String>,
    #[serde(default)]
    pub schedule: Vec<PlanDay>,
}

/// One training day within a generated plan
#[derive(Debug, Clone, Deserialize)]
pub struct PlanDay {
    pub day: String,
    #[serde(default)]
    pub exercises: Vec<PlanExercise>,
}

/// One prescribed exercise within a plan day
#[derive(Debug, Clone, Deserialize)]
pub struct PlanExercise {
    pub name: String,
    #[serde(deserialize_with = "flexible_i64")]
    pub sets: i64,
    #[serde(deserialize_with = "flexible_string")]
    pub reps: String,
    #[serde(default = "default_rest", deserialize_with = "flexible_i64")]
    pub rest: i64,
    #[serde(default)]
    pub tempo: Option<String>,
    #[serde(default)]
    pub tips: Option<String>,
}

impl PlanExercise {
    /// Tempo with the model's omissions filled in
    #[must_use]
    pub fn tempo_or_default(&self) -> String {
        self.tempo
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPO.to_owned())
    }
}

impl WorkoutPlan {
    /// Validate ranges and structure. The tip arrays are backfilled with
    /// stock advice when the model leaves them empty; structural problems
    /// are rejected outright.
    pub fn validate(mut self) -> AppResult<Self> {
        if self.schedule.is_empty() {
            return Err(AppError::invalid_ai_output(
                "AI returned a plan with no scheduled days",
            ));
        }
        for day in &self.schedule {
            if day.day.trim().is_empty() {
                return Err(AppError::invalid_ai_output(
                    "AI returned a schedule entry with no day label",
                ));
            }
            if day.exercises.is_empty() {
                return Err(AppError::invalid_ai_output(format!(
                    "AI returned no exercises for day '{}'",
                    day.day
                )));
            }
            for exercise in &day.exercises {
                if exercise.name.trim().is_empty() {
                    return Err(AppError::invalid_ai_output(
                        "AI returned an exercise with no name",
                    ));
                }
                if !SETS_RANGE.contains(&exercise.sets) {
                    return Err(AppError::invalid_ai_output(format!(
                        "Implausible set count {} for '{}'",
                        exercise.sets, exercise.name
                    )));
                }
                if !REST_RANGE.contains(&exercise.rest) {
                    return Err(AppError::invalid_ai_output(format!(
                        "Implausible rest time {}s for '{}'",
                        exercise.rest, exercise.name
                    )));
                }
            }
        }

        if self.nutrition_tips.is_empty() {
            self.nutrition_tips = vec![
                "Hydratation importante".into(),
                "Protéines à chaque repas".into(),
                "Légumes à volonté".into(),
            ];
        }
        if self.progression_tips.is_empty() {
            self.progression_tips =
                vec!["Surcharge progressive".into(), "Noter ses charges".into()];
        }
        if self.safety_tips.is_empty() {
            self.safety_tips = vec!["Échauffement obligatoire".into(), "Stop si douleur".into()];
        }

        Ok(self)
    }
}

/// Modification payload: complete replacement lists for the rewritten days
#[derive(Debug, Clone, Deserialize)]
pub struct DayRewriteSet {
    #[serde(alias = "modifiedDays", default)]
    pub modified_days: Vec<RewrittenDay>,
}

/// One fully rewritten day
#[derive(Debug, Clone, Deserialize)]
pub struct RewrittenDay {
    pub day: String,
    #[serde(default)]
    pub exercises: Vec<RewrittenExercise>,
}

/// One exercise row in a rewritten day
#[derive(Debug, Clone, Deserialize)]
pub struct RewrittenExercise {
    pub name: String,
    #[serde(deserialize_with = "flexible_i64")]
    pub sets: i64,
    #[serde(deserialize_with = "flexible_string")]
    pub reps: String,
    #[serde(default = "default_rest", deserialize_with = "flexible_i64")]
    pub rest_seconds: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tempo: Option<String>,
    #[serde(default)]
    pub tips: Option<String>,
}

impl DayRewriteSet {
    /// Validate the rewritten days. An empty set is legitimate (the model
    /// did not understand the instruction), so it passes untouched. A named
    /// day with no exercises is not: applying it would wipe that training
    /// day, so it is rejected like any other malformed output.
    pub fn validate(self) -> AppResult<Self> {
        for day in &self.modified_days {
            if day.day.trim().is_empty() {
                return Err(AppError::invalid_ai_output(
                    "AI returned a rewritten day with no label",
                ));
            }
            if day.exercises.is_empty() {
                return Err(AppError::invalid_ai_output(format!(
                    "AI returned no exercises for rewritten day '{}'",
                    day.day
                )));
            }
            for exercise in &day.exercises {
                if exercise.name.trim().is_empty() {
                    return Err(AppError::invalid_ai_output(
                        "AI returned an exercise with no name",
                    ));
                }
                if !SETS_RANGE.contains(&exercise.sets) {
                    return Err(AppError::invalid_ai_output(format!(
                        "Implausible set count {} for '{}'",
                        exercise.sets, exercise.name
                    )));
                }
                if !REST_RANGE.contains(&exercise.rest_seconds) {
                    return Err(AppError::invalid_ai_output(format!(
                        "Implausible rest time {}s for '{}'",
                        exercise.rest_seconds, exercise.name
                    )));
                }
            }
        }
        Ok(self)
    }
}

/// Parse a model response into a validated [`WorkoutPlan`]
pub fn parse_workout_plan(content: &str) -> AppResult<WorkoutPlan> {
    let plan: WorkoutPlan = serde_json::from_str(strip_code_fences(content))
        .map_err(|e| AppError::invalid_ai_output(format!("AI returned invalid JSON: {e}")))?;
    plan.validate()
}

/// Parse a model response into a validated [`DayRewriteSet`]
pub fn parse_day_rewrites(content: &str) -> AppResult<DayRewriteSet> {
    let rewrites: DayRewriteSet = serde_json::from_str(strip_code_fences(content))
        .map_err(|e| AppError::invalid_ai_output(format!("AI returned invalid JSON: {e}")))?;
    rewrites.validate()
}

/// Models sometimes wrap JSON-mode output in markdown fences anyway
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

fn default_program_name() -> String {
    "Programme Personnalisé".into()
}

fn default_description() -> String {
    "Votre programme sur mesure".into()
}

const fn default_calories() -> i64 {
    2000
}

const fn default_proteins() -> i64 {
    150
}

const fn default_rest() -> i64 {
    DEFAULT_REST_SECONDS
}

/// Accept a JSON number or a numeric string
fn flexible_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Float(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        #[allow(clippy::cast_possible_truncation)]
        NumberOrString::Float(f) => Ok(f as i64),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric value '{s}'"))),
    }
}

/// Accept a JSON string or a bare number (reps like `10` vs `"8-12"`)
fn flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Text(String),
        Number(i64),
        Float(f64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Text(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_PLAN: &str = r#"{
        "programName": "Force 3 jours",
        "description": "Programme full body",
        "calories_target": "2500",
        "proteins_target": 160,
        "nutrition_tips": ["Bois 3L d'eau"],
        "progression_tips": [],
        "safety_tips": [],
        "schedule": [
            {"day": "Lundi", "exercises": [
                {"name": "Squat", "sets": "4", "reps": 10, "rest": "90", "tempo": "2-0-2-0", "tips": "Dos droit"}
            ]}
        ]
    }"#;

    #[test]
    fn test_parse_valid_plan_with_mixed_number_types() {
        let plan = parse_workout_plan(VALID_PLAN).unwrap();
        assert_eq!(plan.program_name, "Force 3 jours");
        assert_eq!(plan.calories_target, 2500);
        let exercise = &plan.schedule[0].exercises[0];
        assert_eq!(exercise.sets, 4);
        assert_eq!(exercise.reps, "10");
        assert_eq!(exercise.rest, 90);
    }

    #[test]
    fn test_empty_tip_arrays_are_backfilled() {
        let plan = parse_workout_plan(VALID_PLAN).unwrap();
        assert_eq!(plan.nutrition_tips, vec!["Bois 3L d'eau"]);
        assert!(!plan.progression_tips.is_empty());
        assert!(!plan.safety_tips.is_empty());
    }

    #[test]
    fn test_code_fences_are_stripped() {
        let fenced = format!("```json\n{VALID_PLAN}\n```");
        assert!(parse_workout_plan(&fenced).is_ok());
    }

    #[test]
    fn test_non_json_is_rejected() {
        let err = parse_workout_plan("I cannot produce a program today.").unwrap_err();
        assert_eq!(err.http_status(), 502);
    }

    #[test]
    fn test_empty_schedule_is_rejected() {
        let err = parse_workout_plan(r#"{"programName": "X", "schedule": []}"#).unwrap_err();
        assert_eq!(err.http_status(), 502);
    }

    #[test]
    fn test_day_without_exercises_is_rejected() {
        let json = r#"{"schedule": [{"day": "Lundi", "exercises": []}]}"#;
        assert!(parse_workout_plan(json).is_err());
    }

    #[test]
    fn test_non_numeric_sets_string_is_rejected() {
        // A range like "4-5" is not a count; it must fail parsing, not be
        // coerced to some other number
        let json = r#"{"schedule": [{"day": "Lundi", "exercises": [
            {"name": "Squat", "sets": "4-5", "reps": "10", "rest": 60}
        ]}]}"#;
        let err = parse_workout_plan(json).unwrap_err();
        assert_eq!(err.http_status(), 502);
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_implausible_sets_are_rejected() {
        let json = r#"{"schedule": [{"day": "Lundi", "exercises": [
            {"name": "Squat", "sets": 50, "reps": "10", "rest": 60}
        ]}]}"#;
        assert!(parse_workout_plan(json).is_err());
    }

    #[test]
    fn test_implausible_rest_is_rejected() {
        let json = r#"{"schedule": [{"day": "Lundi", "exercises": [
            {"name": "Squat", "sets": 4, "reps": "10", "rest": 1200}
        ]}]}"#;
        assert!(parse_workout_plan(json).is_err());
    }

    #[test]
    fn test_empty_rewrite_set_is_not_an_error() {
        let rewrites = parse_day_rewrites(r#"{"modifiedDays": []}"#).unwrap();
        assert!(rewrites.modified_days.is_empty());
    }

    #[test]
    fn test_rewritten_day_without_exercises_is_rejected() {
        // Accepting this would silently erase the day's training
        let err =
            parse_day_rewrites(r#"{"modifiedDays": [{"day": "lundi", "exercises": []}]}"#)
                .unwrap_err();
        assert_eq!(err.http_status(), 502);
    }

    #[test]
    fn test_rewrite_set_snake_case_alias() {
        let json = r#"{"modified_days": [{"day": "lundi", "exercises": [
            {"name": "Fentes", "sets": 3, "reps": "12", "rest_seconds": 60, "notes": "Lest léger"}
        ]}]}"#;
        let rewrites = parse_day_rewrites(json).unwrap();
        assert_eq!(rewrites.modified_days[0].exercises[0].name, "Fentes");
    }
}
