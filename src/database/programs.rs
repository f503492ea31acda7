// ABOUTME: Program and exercise storage, including the transactional write groups
// ABOUTME: Program graph creation, activation swap, per-day rewrite, and cascade delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use super::Database;
use crate::llm::plan::{RewrittenExercise, WorkoutPlan};
use crate::models::{upcoming_occurrences, weekday_for_label, Exercise, Program};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;
use tracing::warn;
use uuid::Uuid;

/// Session occurrences projected per training day at generation time
const PROJECTED_WEEKS: usize = 4;

/// Default rest seconds when a plan row carries none
const DEFAULT_REST_SECONDS: i64 = 60;

impl Database {
    /// Create programs and exercises tables
    pub(super) async fn migrate_programs(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS programs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                duration_minutes INTEGER NOT NULL,
                level TEXT NOT NULL,
                goal TEXT NOT NULL,
                est_calories INTEGER NOT NULL DEFAULT 2000,
                est_protein INTEGER NOT NULL DEFAULT 150,
                nutrition_tips TEXT NOT NULL DEFAULT '[]',
                progression_tips TEXT NOT NULL DEFAULT '[]',
                safety_tips TEXT NOT NULL DEFAULT '[]',
                is_active BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                program_id INTEGER NOT NULL REFERENCES programs(id) ON DELETE CASCADE,
                day TEXT NOT NULL,
                name TEXT NOT NULL,
                sets INTEGER NOT NULL,
                reps TEXT NOT NULL,
                rest_seconds INTEGER NOT NULL DEFAULT 60,
                tempo TEXT,
                tips TEXT,
                notes TEXT,
                order_index INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_programs_user ON programs(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_exercises_program_day ON exercises(program_id, day)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist a validated plan as the user's new active program.
    ///
    /// One transaction covers the program insert, the deactivation of every
    /// other program, the exercise rows, and the projected session rows.
    /// Any failure rolls the whole group back.
    pub async fn create_program_graph(
        &self,
        user_id: Uuid,
        plan: &WorkoutPlan,
        duration_minutes: i64,
        level: &str,
        goal: &str,
        today: NaiveDate,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let program_id: i64 = sqlx::query(
            r"
            INSERT INTO programs (
                user_id, name, description, duration_minutes, level, goal,
                est_calories, est_protein, nutrition_tips, progression_tips, safety_tips,
                is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 1)
            RETURNING id
            ",
        )
        .bind(user_id.to_string())
        .bind(&plan.program_name)
        .bind(&plan.description)
        .bind(duration_minutes)
        .bind(level)
        .bind(goal)
        .bind(plan.calories_target)
        .bind(plan.proteins_target)
        .bind(serde_json::to_string(&plan.nutrition_tips)?)
        .bind(serde_json::to_string(&plan.progression_tips)?)
        .bind(serde_json::to_string(&plan.safety_tips)?)
        .fetch_one(&mut *tx)
        .await?
        .get("id");

        sqlx::query("UPDATE programs SET is_active = 0 WHERE user_id = $1 AND id != $2")
            .bind(user_id.to_string())
            .bind(program_id)
            .execute(&mut *tx)
            .await?;

        for day in &plan.schedule {
            let day_label = day.day.to_lowercase();

            for (order_index, exercise) in day.exercises.iter().enumerate() {
                sqlx::query(
                    r"
                    INSERT INTO exercises (
                        program_id, day, name, sets, reps, rest_seconds, tempo, tips, order_index
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    ",
                )
                .bind(program_id)
                .bind(&day_label)
                .bind(&exercise.name)
                .bind(exercise.sets)
                .bind(&exercise.reps)
                .bind(exercise.rest)
                .bind(exercise.tempo_or_default())
                .bind(exercise.tips.clone().unwrap_or_default())
                .bind(order_index as i64)
                .execute(&mut *tx)
                .await?;
            }

            let Some(weekday) = weekday_for_label(&day_label) else {
                warn!(day = %day_label, "Unrecognized day label, no sessions projected");
                continue;
            };

            for date in upcoming_occurrences(weekday, today, PROJECTED_WEEKS) {
                sqlx::query(
                    r"
                    INSERT INTO workout_sessions (
                        user_id, program_id, program_name, scheduled_date, duration_minutes
                    ) VALUES ($1, $2, $3, $4, $5)
                    ",
                )
                .bind(user_id.to_string())
                .bind(program_id)
                .bind(&plan.program_name)
                .bind(date.format("%Y-%m-%d").to_string())
                .bind(duration_minutes)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(program_id)
    }

    /// Get a program owned by the given user
    pub async fn get_program(&self, user_id: Uuid, program_id: i64) -> Result<Option<Program>> {
        let row = sqlx::query("SELECT * FROM programs WHERE id = $1 AND user_id = $2")
            .bind(program_id)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_program(&r)).transpose()
    }

    /// Get the user's active program, if any
    pub async fn get_active_program(&self, user_id: Uuid) -> Result<Option<Program>> {
        let row = sqlx::query("SELECT * FROM programs WHERE user_id = $1 AND is_active = 1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_program(&r)).transpose()
    }

    /// List all of the user's programs, newest first
    pub async fn list_programs(&self, user_id: Uuid) -> Result<Vec<Program>> {
        let rows =
            sqlx::query("SELECT * FROM programs WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(row_to_program).collect()
    }

    /// The 10 most recent programs, newest first
    pub async fn program_history(&self, user_id: Uuid) -> Result<Vec<Program>> {
        let rows = sqlx::query(
            "SELECT * FROM programs WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT 10",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_program).collect()
    }

    /// Exercises of a program ordered by day then display order
    pub async fn get_program_exercises(&self, program_id: i64) -> Result<Vec<Exercise>> {
        let rows =
            sqlx::query("SELECT * FROM exercises WHERE program_id = $1 ORDER BY day, order_index")
                .bind(program_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(row_to_exercise).collect())
    }

    /// Make the given program the user's only active one.
    ///
    /// Returns false when the program does not exist or is not owned by the
    /// user. Deactivate-all and activate-one run in one transaction.
    pub async fn activate_program(&self, user_id: Uuid, program_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE programs SET is_active = 0 WHERE user_id = $1")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE programs SET is_active = 1 WHERE id = $1 AND user_id = $2",
        )
        .bind(program_id)
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a program with its exercises and sessions, transactionally.
    ///
    /// Returns false when the program does not exist or is not owned by the
    /// user.
    pub async fn delete_program(&self, user_id: Uuid, program_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM workout_sessions WHERE program_id = $1 AND user_id = $2")
            .bind(program_id)
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "DELETE FROM exercises WHERE program_id IN (SELECT id FROM programs WHERE id = $1 AND user_id = $2)",
        )
        .bind(program_id)
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM programs WHERE id = $1 AND user_id = $2")
            .bind(program_id)
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Replace every exercise row of one (program, day) pair.
    ///
    /// Delete-then-reinsert in a single transaction; order indices are
    /// reassigned from 0 in list order.
    pub async fn replace_day_exercises(
        &self,
        program_id: i64,
        day: &str,
        exercises: &[RewrittenExercise],
    ) -> Result<()> {
        let day_label = day.to_lowercase();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM exercises WHERE program_id = $1 AND day = $2")
            .bind(program_id)
            .bind(&day_label)
            .execute(&mut *tx)
            .await?;

        for (order_index, exercise) in exercises.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO exercises (
                    program_id, day, name, sets, reps, rest_seconds, notes, order_index, tempo, tips
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ",
            )
            .bind(program_id)
            .bind(&day_label)
            .bind(&exercise.name)
            .bind(exercise.sets)
            .bind(&exercise.reps)
            .bind(if exercise.rest_seconds > 0 {
                exercise.rest_seconds
            } else {
                DEFAULT_REST_SECONDS
            })
            .bind(exercise.notes.clone().unwrap_or_default())
            .bind(order_index as i64)
            .bind(
                exercise
                    .tempo
                    .clone()
                    .unwrap_or_else(|| "2-0-2-0".to_owned()),
            )
            .bind(exercise.tips.clone().unwrap_or_default())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Map a programs row to the domain model
pub(super) fn row_to_program(row: &sqlx::sqlite::SqliteRow) -> Result<Program> {
    let user_id: String = row.get("user_id");
    let nutrition_tips: String = row.get("nutrition_tips");
    let progression_tips: String = row.get("progression_tips");
    let safety_tips: String = row.get("safety_tips");
    let created_at: DateTime<Utc> = row.get("created_at");

    Ok(Program {
        id: row.get("id"),
        user_id: Uuid::parse_str(&user_id).context("Invalid user id in database")?,
        name: row.get("name"),
        description: row.get("description"),
        duration_minutes: row.get("duration_minutes"),
        level: row.get("level"),
        goal: row.get("goal"),
        est_calories: row.get("est_calories"),
        est_protein: row.get("est_protein"),
        nutrition_tips: serde_json::from_str(&nutrition_tips)
            .context("Invalid nutrition tips JSON")?,
        progression_tips: serde_json::from_str(&progression_tips)
            .context("Invalid progression tips JSON")?,
        safety_tips: serde_json::from_str(&safety_tips).context("Invalid safety tips JSON")?,
        is_active: row.get("is_active"),
        created_at,
    })
}

/// Map an exercises row to the domain model
pub(super) fn row_to_exercise(row: &sqlx::sqlite::SqliteRow) -> Exercise {
    Exercise {
        id: row.get("id"),
        program_id: row.get("program_id"),
        day: row.get("day"),
        name: row.get("name"),
        sets: row.get("sets"),
        reps: row.get("reps"),
        rest_seconds: row.get("rest_seconds"),
        tempo: row.get("tempo"),
        tips: row.get("tips"),
        notes: row.get("notes"),
        order_index: row.get("order_index"),
    }
}
