// ABOUTME: Database manager over a SQLite pool with startup migrations
// ABOUTME: Domain operations live in per-table submodules implemented on Database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

//! # Database Management
//!
//! SQLite storage for users, programs, exercises, sessions, and set-tracking
//! records. Migrations are inline `CREATE TABLE IF NOT EXISTS` statements run
//! at startup; every multi-row write group uses a single transaction.

pub mod admin;
pub mod analytics;
pub mod programs;
pub mod sessions;
pub mod tracking;
pub mod users;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

/// Database manager for all persistent state
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let in_memory = database_url.contains(":memory:");
        let connection_options = if database_url.starts_with("sqlite:") && !in_memory {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        // An in-memory database exists per connection, so the pool must not
        // hand out more than one
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&connection_options)
                .await?
        } else {
            SqlitePoolOptions::new().connect(&connection_options).await?
        };

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_programs().await?;
        self.migrate_sessions().await?;
        self.migrate_tracking().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_migrates() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        // Re-running migrations must be idempotent
        db.migrate().await.unwrap();
    }
}
