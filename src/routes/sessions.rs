// ABOUTME: Session route handlers for the date view, completion toggle, and set tracking
// ABOUTME: The date view joins the active program and enriches sessions with that weekday's exercises
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::models::{day_label, Exercise, SetRecord, WorkoutSession};
use crate::resources::ServerResources;
use crate::routes::authenticate;

/// One session with the exercises prescribed for its weekday
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionWithExercises {
    #[serde(flatten)]
    pub session: WorkoutSession,
    pub exercises: Vec<Exercise>,
}

/// The day's set-tracking state, keyed `"{session_id}:{exercise_name}:{set_index}"`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayProgress {
    /// Key -> completed flag
    pub checked_sets: HashMap<String, bool>,
    /// Key -> reps actually performed
    pub actual_reps: HashMap<String, String>,
}

/// Response for `GET /sessions/date/:date`
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsForDateResponse {
    pub sessions: Vec<SessionWithExercises>,
    pub progress: DayProgress,
}

/// Request for the completion toggle
#[derive(Debug, Deserialize)]
pub struct ToggleSessionRequest {
    pub is_completed: bool,
}

/// Request for `POST /sessions/track-set`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSetRequest {
    pub session_id: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    pub exercise_name: String,
    pub set_index: i64,
    pub is_completed: bool,
    #[serde(default)]
    pub actual_reps: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for `POST /sessions/track-set`
#[derive(Debug, Serialize, Deserialize)]
pub struct TrackSetResponse {
    pub success: bool,
}

/// Session routes handler
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create all session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/sessions/date/:date", get(Self::sessions_for_date))
            .route("/sessions/:id", put(Self::toggle_complete))
            .route("/sessions/track-set", post(Self::track_set))
            .with_state(resources)
    }

    /// Sessions of the active program for one date, with exercises and the
    /// day's tracking state
    async fn sessions_for_date(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Path(date): Path<String>,
    ) -> AppResult<Json<SessionsForDateResponse>> {
        let user = authenticate(&headers, &resources).await?;
        let date = parse_date(&date)?;

        let sessions = resources.database.sessions_for_date(user.id, date).await?;
        let weekday_label = day_label(date.weekday());

        let mut enriched = Vec::with_capacity(sessions.len());
        for session in sessions {
            let exercises = resources
                .database
                .get_program_exercises(session.program_id)
                .await?
                .into_iter()
                .filter(|e| e.day == weekday_label)
                .collect();
            enriched.push(SessionWithExercises { session, exercises });
        }

        let records = resources.database.tracking_for_date(user.id, date).await?;
        let progress = reshape_tracking(&records);

        Ok(Json(SessionsForDateResponse {
            sessions: enriched,
            progress,
        }))
    }

    /// Set or clear a session's completion flag
    async fn toggle_complete(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
        Json(request): Json<ToggleSessionRequest>,
    ) -> AppResult<Json<MessageResponse>> {
        let user = authenticate(&headers, &resources).await?;

        let updated = resources
            .database
            .set_session_completed(user.id, id, request.is_completed)
            .await?;
        if !updated {
            return Err(AppError::not_found("Session"));
        }

        Ok(Json(MessageResponse {
            message: "Session status updated".into(),
        }))
    }

    /// Record one set of one exercise for a date (upsert, last write wins)
    async fn track_set(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<TrackSetRequest>,
    ) -> AppResult<Json<TrackSetResponse>> {
        let user = authenticate(&headers, &resources).await?;

        if request.exercise_name.trim().is_empty() {
            return Err(AppError::invalid_input("Exercise name is required"));
        }
        if request.set_index < 0 {
            return Err(AppError::invalid_input("Set index must not be negative"));
        }

        let record = SetRecord {
            user_id: user.id,
            date: parse_date(&request.date)?,
            session_id: request.session_id,
            exercise_name: request.exercise_name,
            set_index: request.set_index,
            is_completed: request.is_completed,
            actual_reps: request.actual_reps,
        };

        resources.database.record_set(&record).await?;

        Ok(Json(TrackSetResponse { success: true }))
    }
}

fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::invalid_input("Date must be YYYY-MM-DD"))
}

/// Reshape tracking rows into the wire maps keyed
/// `"{session_id}:{exercise_name}:{set_index}"`
fn reshape_tracking(records: &[SetRecord]) -> DayProgress {
    let mut checked_sets = HashMap::with_capacity(records.len());
    let mut actual_reps = HashMap::new();

    for record in records {
        let key = format!(
            "{}:{}:{}",
            record.session_id, record.exercise_name, record.set_index
        );
        checked_sets.insert(key.clone(), record.is_completed);
        if let Some(actual) = &record.actual_reps {
            actual_reps.insert(key, actual.clone());
        }
    }

    DayProgress {
        checked_sets,
        actual_reps,
    }
}
