// ABOUTME: Per-set tracking records with an upsert keyed by user, date, exercise, set
// ABOUTME: Exercise name is a deliberate weak reference that survives row regeneration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use super::Database;
use crate::models::SetRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the set tracking table
    pub(super) async fn migrate_tracking(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS set_tracking (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                session_id INTEGER NOT NULL,
                exercise_name TEXT NOT NULL,
                set_index INTEGER NOT NULL,
                is_completed BOOLEAN NOT NULL DEFAULT 0,
                actual_reps TEXT,
                UNIQUE(user_id, date, exercise_name, set_index)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_tracking_user_date ON set_tracking(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record one set. Upsert on the composite key; last write wins.
    pub async fn record_set(&self, record: &SetRecord) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO set_tracking (
                user_id, date, session_id, exercise_name, set_index, is_completed, actual_reps
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT(user_id, date, exercise_name, set_index) DO UPDATE SET
                session_id = excluded.session_id,
                is_completed = excluded.is_completed,
                actual_reps = excluded.actual_reps
            ",
        )
        .bind(record.user_id.to_string())
        .bind(record.date.format("%Y-%m-%d").to_string())
        .bind(record.session_id)
        .bind(&record.exercise_name)
        .bind(record.set_index)
        .bind(record.is_completed)
        .bind(&record.actual_reps)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All tracking rows of a user for one date
    pub async fn tracking_for_date(&self, user_id: Uuid, date: NaiveDate) -> Result<Vec<SetRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM set_tracking WHERE user_id = $1 AND date = $2 ORDER BY exercise_name, set_index",
        )
        .bind(user_id.to_string())
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<SetRecord> {
    let user_id: String = row.get("user_id");
    let date: String = row.get("date");

    Ok(SetRecord {
        user_id: Uuid::parse_str(&user_id).context("Invalid user id in database")?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .context("Invalid tracking date in database")?,
        session_id: row.get("session_id"),
        exercise_name: row.get("exercise_name"),
        set_index: row.get("set_index"),
        is_completed: row.get("is_completed"),
        actual_reps: row.get("actual_reps"),
    })
}
