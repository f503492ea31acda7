// ABOUTME: Lifetime training aggregates and the trailing 7-day activity chart
// ABOUTME: Chart days are materialized in Rust so callers never see sparse data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use super::Database;
use crate::models::day_label;
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use sqlx::Row;
use std::collections::HashMap;
use uuid::Uuid;

/// Lifetime totals for one user
#[derive(Debug, Clone, Serialize)]
pub struct GlobalStats {
    /// Completed sessions dated up to today
    pub completed: i64,
    /// Minutes across those completed sessions
    pub minutes: i64,
    /// Coarse consistency indicator: 100 when anything was ever completed
    pub rate: i64,
}

/// One day of the trailing 7-day chart
#[derive(Debug, Clone, Serialize)]
pub struct DayActivity {
    /// Date in `YYYY-MM-DD`
    pub date: String,
    /// Lowercase French weekday label
    pub day_name: String,
    /// Completed sessions on that date
    pub completed: i64,
}

impl Database {
    /// Lifetime completed-session count and minutes, sessions dated up to
    /// `today` only. Future projections never count.
    pub async fn global_stats(&self, user_id: Uuid, today: NaiveDate) -> Result<GlobalStats> {
        let row = sqlx::query(
            r"
            SELECT
                COUNT(CASE WHEN is_completed = 1 THEN 1 END) as total_completed,
                COALESCE(SUM(CASE WHEN is_completed = 1 THEN duration_minutes ELSE 0 END), 0) as total_minutes
            FROM workout_sessions
            WHERE user_id = $1 AND scheduled_date <= $2
            ",
        )
        .bind(user_id.to_string())
        .bind(today.format("%Y-%m-%d").to_string())
        .fetch_one(&self.pool)
        .await?;

        let completed: i64 = row.get("total_completed");
        let minutes: i64 = row.get("total_minutes");

        Ok(GlobalStats {
            completed,
            minutes,
            rate: if completed > 0 { 100 } else { 0 },
        })
    }

    /// Completed sessions per day over the trailing 7 days (today inclusive
    /// back to day-6), zero-filled for every calendar day.
    pub async fn weekly_chart(&self, user_id: Uuid, today: NaiveDate) -> Result<Vec<DayActivity>> {
        let window_start = today - Duration::days(6);

        let rows = sqlx::query(
            r"
            SELECT scheduled_date, COUNT(CASE WHEN is_completed = 1 THEN 1 END) as completed
            FROM workout_sessions
            WHERE user_id = $1 AND scheduled_date >= $2 AND scheduled_date <= $3
            GROUP BY scheduled_date
            ",
        )
        .bind(user_id.to_string())
        .bind(window_start.format("%Y-%m-%d").to_string())
        .bind(today.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut by_date: HashMap<String, i64> = HashMap::new();
        for row in rows {
            by_date.insert(row.get("scheduled_date"), row.get("completed"));
        }

        let chart = (0..7)
            .map(|offset| {
                let date = window_start + Duration::days(offset);
                let key = date.format("%Y-%m-%d").to_string();
                DayActivity {
                    completed: by_date.get(&key).copied().unwrap_or(0),
                    day_name: day_label(date.weekday()).to_owned(),
                    date: key,
                }
            })
            .collect();

        Ok(chart)
    }
}
