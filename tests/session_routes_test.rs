// ABOUTME: Integration tests for the session date view, completion toggle, and set tracking
// ABOUTME: Covers active-program scoping, owner scoping, and the upsert semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use common::{bearer_for, create_test_user, setup_app};
use helpers::axum_test::AxumTestRequest;
use helpers::mock_provider::MockProvider;

use chrono::NaiveDate;
use coach_server::llm::plan::parse_workout_plan;
use coach_server::models::User;
use coach_server::resources::ServerResources;
use coach_server::routes::sessions::SessionsForDateResponse;
use serde_json::json;
use std::sync::Arc;

const MONDAY_THURSDAY_PLAN: &str = r#"{
    "programName": "Split",
    "schedule": [
        {"day": "lundi", "exercises": [
            {"name": "Squat", "sets": 4, "reps": "8", "rest": 120}
        ]},
        {"day": "jeudi", "exercises": [
            {"name": "Tractions", "sets": 4, "reps": "6", "rest": 120}
        ]}
    ]
}"#;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

async fn setup() -> (axum::Router, Arc<ServerResources>, User, String) {
    let (router, resources) = setup_app(Arc::new(MockProvider::unreachable()))
        .await
        .unwrap();
    let user = create_test_user(&resources, "lifter@example.com").await.unwrap();
    let auth = bearer_for(&resources, &user);

    let plan = parse_workout_plan(MONDAY_THURSDAY_PLAN).unwrap();
    resources
        .database
        .create_program_graph(user.id, &plan, 45, "intermediate", "strength", monday())
        .await
        .unwrap();

    (router, resources, user, auth)
}

#[tokio::test]
async fn test_date_view_returns_that_weekdays_exercises() {
    let (router, _resources, _user, auth) = setup().await;

    let response = AxumTestRequest::get("/sessions/date/2025-06-02")
        .header("authorization", &auth)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let view: SessionsForDateResponse = response.json();

    assert_eq!(view.sessions.len(), 1);
    assert_eq!(view.sessions[0].session.program_name, "Split");
    assert!(!view.sessions[0].session.is_completed);
    // Only Monday's exercises appear, not Thursday's
    assert_eq!(view.sessions[0].exercises.len(), 1);
    assert_eq!(view.sessions[0].exercises[0].name, "Squat");
    assert!(view.progress.checked_sets.is_empty());
    assert!(view.progress.actual_reps.is_empty());

    // A rest day has no sessions at all
    let tuesday: SessionsForDateResponse = AxumTestRequest::get("/sessions/date/2025-06-03")
        .header("authorization", &auth)
        .send(router)
        .await
        .json();
    assert!(tuesday.sessions.is_empty());
}

#[tokio::test]
async fn test_date_view_nests_tracking_under_progress() {
    let (router, _resources, _user, auth) = setup().await;

    let view: SessionsForDateResponse = AxumTestRequest::get("/sessions/date/2025-06-02")
        .header("authorization", &auth)
        .send(router.clone())
        .await
        .json();
    let session_id = view.sessions[0].session.id;

    AxumTestRequest::post("/sessions/track-set")
        .header("authorization", &auth)
        .json(&json!({
            "sessionId": session_id,
            "date": "2025-06-02",
            "exerciseName": "Squat",
            "setIndex": 0,
            "isCompleted": true,
            "actualReps": "8"
        }))
        .send(router.clone())
        .await;

    // Clients read the maps under `progress` with camelCase keys
    let body: serde_json::Value = AxumTestRequest::get("/sessions/date/2025-06-02")
        .header("authorization", &auth)
        .send(router)
        .await
        .json();
    let key = format!("{session_id}:Squat:0");
    assert_eq!(body["progress"]["checkedSets"][&key], true);
    assert_eq!(body["progress"]["actualReps"][&key], "8");
    assert!(body.get("checkedSets").is_none());
    assert!(body.get("completedSets").is_none());
}

#[tokio::test]
async fn test_date_view_rejects_malformed_dates() {
    let (router, _resources, _user, auth) = setup().await;

    let response = AxumTestRequest::get("/sessions/date/02-06-2025")
        .header("authorization", &auth)
        .send(router)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_toggle_completion_round_trip() {
    let (router, _resources, _user, auth) = setup().await;

    let view: SessionsForDateResponse = AxumTestRequest::get("/sessions/date/2025-06-02")
        .header("authorization", &auth)
        .send(router.clone())
        .await
        .json();
    let session_id = view.sessions[0].session.id;

    let toggled = AxumTestRequest::put(&format!("/sessions/{session_id}"))
        .header("authorization", &auth)
        .json(&json!({"is_completed": true}))
        .send(router.clone())
        .await;
    assert_eq!(toggled.status(), 200);

    let view: SessionsForDateResponse = AxumTestRequest::get("/sessions/date/2025-06-02")
        .header("authorization", &auth)
        .send(router.clone())
        .await
        .json();
    assert!(view.sessions[0].session.is_completed);

    // And back
    AxumTestRequest::put(&format!("/sessions/{session_id}"))
        .header("authorization", &auth)
        .json(&json!({"is_completed": false}))
        .send(router.clone())
        .await;
    let view: SessionsForDateResponse = AxumTestRequest::get("/sessions/date/2025-06-02")
        .header("authorization", &auth)
        .send(router)
        .await
        .json();
    assert!(!view.sessions[0].session.is_completed);
}

#[tokio::test]
async fn test_toggle_is_scoped_to_the_owner() {
    let (router, resources, _user, auth) = setup().await;

    let view: SessionsForDateResponse = AxumTestRequest::get("/sessions/date/2025-06-02")
        .header("authorization", &auth)
        .send(router.clone())
        .await
        .json();
    let session_id = view.sessions[0].session.id;

    let intruder = create_test_user(&resources, "intruder@example.com").await.unwrap();
    let intruder_auth = bearer_for(&resources, &intruder);

    let response = AxumTestRequest::put(&format!("/sessions/{session_id}"))
        .header("authorization", &intruder_auth)
        .json(&json!({"is_completed": true}))
        .send(router)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_track_set_upserts_on_repeat_writes() {
    let (router, _resources, _user, auth) = setup().await;

    let view: SessionsForDateResponse = AxumTestRequest::get("/sessions/date/2025-06-02")
        .header("authorization", &auth)
        .send(router.clone())
        .await
        .json();
    let session_id = view.sessions[0].session.id;

    let first = AxumTestRequest::post("/sessions/track-set")
        .header("authorization", &auth)
        .json(&json!({
            "sessionId": session_id,
            "date": "2025-06-02",
            "exerciseName": "Squat",
            "setIndex": 0,
            "isCompleted": true,
            "actualReps": "8"
        }))
        .send(router.clone())
        .await;
    assert_eq!(first.status(), 200);
    let body: serde_json::Value = first.json();
    assert_eq!(body["success"], true);

    // Second write for the same set wins outright
    let second = AxumTestRequest::post("/sessions/track-set")
        .header("authorization", &auth)
        .json(&json!({
            "sessionId": session_id,
            "date": "2025-06-02",
            "exerciseName": "Squat",
            "setIndex": 0,
            "isCompleted": false,
            "actualReps": "6"
        }))
        .send(router.clone())
        .await;
    assert_eq!(second.status(), 200);

    // A different set index is its own row
    AxumTestRequest::post("/sessions/track-set")
        .header("authorization", &auth)
        .json(&json!({
            "sessionId": session_id,
            "date": "2025-06-02",
            "exerciseName": "Squat",
            "setIndex": 1,
            "isCompleted": true
        }))
        .send(router.clone())
        .await;

    let view: SessionsForDateResponse = AxumTestRequest::get("/sessions/date/2025-06-02")
        .header("authorization", &auth)
        .send(router)
        .await
        .json();

    let key = format!("{session_id}:Squat:0");
    assert_eq!(view.progress.checked_sets.len(), 2);
    assert_eq!(view.progress.checked_sets.get(&key), Some(&false));
    assert_eq!(
        view.progress.actual_reps.get(&key).map(String::as_str),
        Some("6")
    );
    assert_eq!(
        view.progress.checked_sets.get(&format!("{session_id}:Squat:1")),
        Some(&true)
    );
}

#[tokio::test]
async fn test_track_set_validates_input() {
    let (router, _resources, _user, auth) = setup().await;

    let blank_name = AxumTestRequest::post("/sessions/track-set")
        .header("authorization", &auth)
        .json(&json!({
            "sessionId": 1,
            "date": "2025-06-02",
            "exerciseName": "  ",
            "setIndex": 0,
            "isCompleted": true
        }))
        .send(router.clone())
        .await;
    assert_eq!(blank_name.status(), 400);

    let negative_index = AxumTestRequest::post("/sessions/track-set")
        .header("authorization", &auth)
        .json(&json!({
            "sessionId": 1,
            "date": "2025-06-02",
            "exerciseName": "Squat",
            "setIndex": -1,
            "isCompleted": true
        }))
        .send(router)
        .await;
    assert_eq!(negative_index.status(), 400);
}

#[tokio::test]
async fn test_date_view_hides_sessions_of_inactive_programs() {
    let (router, resources, user, auth) = setup().await;

    // A new program takes over as active; its only day is Thursday
    let replacement = parse_workout_plan(
        r#"{"programName": "Remplacement", "schedule": [
            {"day": "jeudi", "exercises": [{"name": "Rowing", "sets": 3, "reps": "10", "rest": 90}]}
        ]}"#,
    )
    .unwrap();
    resources
        .database
        .create_program_graph(user.id, &replacement, 30, "beginner", "strength", monday())
        .await
        .unwrap();

    // Monday belonged to the now-inactive program only
    let view: SessionsForDateResponse = AxumTestRequest::get("/sessions/date/2025-06-02")
        .header("authorization", &auth)
        .send(router.clone())
        .await
        .json();
    assert!(view.sessions.is_empty());

    // Thursday shows only the active program's session
    let thursday: SessionsForDateResponse = AxumTestRequest::get("/sessions/date/2025-06-05")
        .header("authorization", &auth)
        .send(router)
        .await
        .json();
    assert_eq!(thursday.sessions.len(), 1);
    assert_eq!(thursday.sessions[0].session.program_name, "Remplacement");
}
