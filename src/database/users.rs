// ABOUTME: User management database operations
// ABOUTME: Handles account creation, lookup by id and email, and password updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use super::Database;
use crate::models::{User, UserRole};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                display_name TEXT NOT NULL,
                experience_level TEXT NOT NULL DEFAULT 'beginner',
                goals TEXT NOT NULL DEFAULT '[]',
                role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already in use.
    pub async fn create_user(&self, user: &User) -> Result<Uuid> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(anyhow!("Email already in use by another user"));
        }

        sqlx::query(
            r"
            INSERT INTO users (
                id, email, password_hash, display_name, experience_level, goals, role, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(&user.experience_level)
        .bind(serde_json::to_string(&user.goals)?)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by id
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Overwrite a user's password hash
    pub async fn update_user_password(&self, user_id: Uuid, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map a users row to the domain model
pub(super) fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let id: String = row.get("id");
    let goals: String = row.get("goals");
    let role: String = row.get("role");
    let created_at: DateTime<Utc> = row.get("created_at");

    Ok(User {
        id: Uuid::parse_str(&id).context("Invalid user id in database")?,
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        display_name: row.get("display_name"),
        experience_level: row.get("experience_level"),
        goals: serde_json::from_str(&goals).context("Invalid goals JSON in database")?,
        role: UserRole::from_str_or_default(&role),
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(email: &str) -> User {
        User::new(
            email.into(),
            "$2b$10$hash".into(),
            "Sample".into(),
            "intermediate".into(),
            vec!["strength".into(), "endurance".into()],
        )
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let user = sample_user("roundtrip@example.com");

        let id = db.create_user(&user).await.unwrap();
        let fetched = db.get_user(id).await.unwrap().unwrap();

        assert_eq!(fetched.email, user.email);
        assert_eq!(fetched.goals, user.goals);
        assert_eq!(fetched.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.create_user(&sample_user("dup@example.com")).await.unwrap();

        let err = db.create_user(&sample_user("dup@example.com")).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_update_password() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let user = sample_user("pw@example.com");
        db.create_user(&user).await.unwrap();

        assert!(db
            .update_user_password(user.id, "$2b$10$newhash")
            .await
            .unwrap());
        let fetched = db.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.password_hash, "$2b$10$newhash");

        assert!(!db
            .update_user_password(Uuid::new_v4(), "$2b$10$other")
            .await
            .unwrap());
    }
}
