// ABOUTME: Admin-facing storage operations for user administration
// ABOUTME: Non-admin listing, platform counts, and the transactional user cascade delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use super::Database;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

/// User summary for the admin listing; never carries the password hash
#[derive(Debug, Clone, Serialize)]
pub struct AdminUserSummary {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Platform-wide counts for the admin dashboard
#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub users: i64,
    pub programs: i64,
    pub completed_sessions: i64,
}

impl Database {
    /// List every non-admin account, newest first
    pub async fn list_regular_users(&self) -> Result<Vec<AdminUserSummary>> {
        let rows = sqlx::query(
            r"
            SELECT id, email, display_name, created_at
            FROM users WHERE role != 'admin'
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| AdminUserSummary {
                id: row.get("id"),
                email: row.get("email"),
                display_name: row.get("display_name"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Aggregate counts across the platform
    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        let users: i64 = sqlx::query("SELECT COUNT(*) as n FROM users")
            .fetch_one(&self.pool)
            .await?
            .get("n");
        let programs: i64 = sqlx::query("SELECT COUNT(*) as n FROM programs")
            .fetch_one(&self.pool)
            .await?
            .get("n");
        let completed_sessions: i64 =
            sqlx::query("SELECT COUNT(*) as n FROM workout_sessions WHERE is_completed = 1")
                .fetch_one(&self.pool)
                .await?
                .get("n");

        Ok(PlatformStats {
            users,
            programs,
            completed_sessions,
        })
    }

    /// Delete a user and everything they own, in dependency order, in one
    /// transaction. Returns false when the user does not exist.
    pub async fn delete_user_cascade(&self, user_id: Uuid) -> Result<bool> {
        let id = user_id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM workout_sessions WHERE user_id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM set_tracking WHERE user_id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "DELETE FROM exercises WHERE program_id IN (SELECT id FROM programs WHERE user_id = $1)",
        )
        .bind(&id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM programs WHERE user_id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::plan::parse_workout_plan;
    use crate::models::{User, UserRole};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_listing_excludes_admins() {
        let db = Database::new("sqlite::memory:").await.unwrap();

        let regular = User::new(
            "member@example.com".into(),
            "hash".into(),
            "Member".into(),
            "beginner".into(),
            vec![],
        );
        let mut admin = User::new(
            "root@example.com".into(),
            "hash".into(),
            "Root".into(),
            "advanced".into(),
            vec![],
        );
        admin.role = UserRole::Admin;

        db.create_user(&regular).await.unwrap();
        db.create_user(&admin).await.unwrap();

        let listed = db.list_regular_users().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].email, "member@example.com");
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_everything() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let user = User::new(
            "doomed@example.com".into(),
            "hash".into(),
            "D".into(),
            "beginner".into(),
            vec![],
        );
        db.create_user(&user).await.unwrap();

        let plan = parse_workout_plan(
            r#"{"programName": "Temp", "schedule": [
                {"day": "mardi", "exercises": [{"name": "Rowing", "sets": 3, "reps": "10", "rest": 60}]}
            ]}"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let program_id = db
            .create_program_graph(user.id, &plan, 30, "beginner", "strength", today)
            .await
            .unwrap();

        assert!(db.delete_user_cascade(user.id).await.unwrap());
        assert!(db.get_user(user.id).await.unwrap().is_none());
        assert!(db.get_program_exercises(program_id).await.unwrap().is_empty());

        let stats = db.platform_stats().await.unwrap();
        assert_eq!(stats.users, 0);
        assert_eq!(stats.programs, 0);

        // Deleting again reports absence
        assert!(!db.delete_user_cascade(user.id).await.unwrap());
    }
}
