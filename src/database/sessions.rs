// ABOUTME: Workout session storage and the active-program date view
// ABOUTME: Sessions are projected at generation time and toggled complete by their owner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use super::Database;
use crate::models::WorkoutSession;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the workout sessions table
    pub(super) async fn migrate_sessions(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                program_id INTEGER NOT NULL REFERENCES programs(id) ON DELETE CASCADE,
                program_name TEXT NOT NULL,
                scheduled_date TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                is_completed BOOLEAN NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_sessions_user_date ON workout_sessions(user_id, scheduled_date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Sessions of the user's active program scheduled on the given date.
    ///
    /// Sessions of deactivated programs keep their rows but drop out of this
    /// view.
    pub async fn sessions_for_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<WorkoutSession>> {
        let rows = sqlx::query(
            r"
            SELECT ws.* FROM workout_sessions ws
            JOIN programs p ON p.id = ws.program_id
            WHERE ws.user_id = $1 AND ws.scheduled_date = $2 AND p.is_active = 1
            ORDER BY ws.id
            ",
        )
        .bind(user_id.to_string())
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_session).collect()
    }

    /// Set the completion flag of a session, scoped to its owner.
    ///
    /// Idempotent; returns false when no session matched.
    pub async fn set_session_completed(
        &self,
        user_id: Uuid,
        session_id: i64,
        is_completed: bool,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE workout_sessions SET is_completed = $3 WHERE id = $1 AND user_id = $2",
        )
        .bind(session_id)
        .bind(user_id.to_string())
        .bind(is_completed)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map a workout_sessions row to the domain model
pub(super) fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> Result<WorkoutSession> {
    let user_id: String = row.get("user_id");
    let scheduled_date: String = row.get("scheduled_date");

    Ok(WorkoutSession {
        id: row.get("id"),
        user_id: Uuid::parse_str(&user_id).context("Invalid user id in database")?,
        program_id: row.get("program_id"),
        program_name: row.get("program_name"),
        scheduled_date: NaiveDate::parse_from_str(&scheduled_date, "%Y-%m-%d")
            .context("Invalid scheduled date in database")?,
        duration_minutes: row.get("duration_minutes"),
        is_completed: row.get("is_completed"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::plan::parse_workout_plan;
    use crate::models::User;

    async fn setup_with_program() -> (Database, Uuid, i64, NaiveDate) {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let user = User::new(
            "sessions@example.com".into(),
            "hash".into(),
            "S".into(),
            "beginner".into(),
            vec![],
        );
        db.create_user(&user).await.unwrap();

        let plan = parse_workout_plan(
            r#"{"programName": "Push Pull", "schedule": [
                {"day": "lundi", "exercises": [{"name": "Squat", "sets": 4, "reps": "8", "rest": 90}]}
            ]}"#,
        )
        .unwrap();

        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let program_id = db
            .create_program_graph(user.id, &plan, 60, "beginner", "strength", monday)
            .await
            .unwrap();

        (db, user.id, program_id, monday)
    }

    #[tokio::test]
    async fn test_sessions_for_date_and_toggle() {
        let (db, user_id, _, monday) = setup_with_program().await;

        let sessions = db.sessions_for_date(user_id, monday).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(!sessions[0].is_completed);
        assert_eq!(sessions[0].program_name, "Push Pull");

        assert!(db
            .set_session_completed(user_id, sessions[0].id, true)
            .await
            .unwrap());
        let sessions = db.sessions_for_date(user_id, monday).await.unwrap();
        assert!(sessions[0].is_completed);

        // Toggling again with the same value stays true
        assert!(db
            .set_session_completed(user_id, sessions[0].id, true)
            .await
            .unwrap());

        // Another user cannot touch the session
        assert!(!db
            .set_session_completed(Uuid::new_v4(), sessions[0].id, false)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_deactivated_program_hides_sessions() {
        let (db, user_id, program_id, monday) = setup_with_program().await;

        sqlx::query("UPDATE programs SET is_active = 0 WHERE id = $1")
            .bind(program_id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(db.sessions_for_date(user_id, monday).await.unwrap().is_empty());

        // Rows persist even while hidden
        let row = sqlx::query("SELECT COUNT(*) as n FROM workout_sessions WHERE program_id = $1")
            .bind(program_id)
            .fetch_one(db.pool())
            .await
            .unwrap();
        let count: i64 = row.get("n");
        assert_eq!(count, 4);
    }
}
