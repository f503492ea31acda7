// ABOUTME: Core domain models for users, programs, exercises, sessions, and set tracking
// ABOUTME: Includes the French weekday-label mapping and session occurrence projection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role attribute gating the admin surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

/// Registered account with credentials and coaching profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Bcrypt hash, never serialized to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    /// Free-form level: "beginner", "intermediate", "advanced"
    pub experience_level: String,
    pub goals: Vec<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a random id and the default role
    #[must_use]
    pub fn new(
        email: String,
        password_hash: String,
        display_name: String,
        experience_level: String,
        goals: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            display_name,
            experience_level,
            goals,
            role: UserRole::User,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

/// A generated training program; at most one is active per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub duration_minutes: i64,
    pub level: String,
    pub goal: String,
    pub est_calories: i64,
    pub est_protein: i64,
    pub nutrition_tips: Vec<String>,
    pub progression_tips: Vec<String>,
    pub safety_tips: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// One prescribed exercise row within a program day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub program_id: i64,
    /// Lowercase French weekday name ("lundi" .. "dimanche")
    pub day: String,
    pub name: String,
    pub sets: i64,
    /// Free text, may be a range like "8-12"
    pub reps: String,
    pub rest_seconds: i64,
    pub tempo: Option<String>,
    pub tips: Option<String>,
    pub notes: Option<String>,
    pub order_index: i64,
}

/// A scheduled workout occurrence projected from a program's training days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: i64,
    pub user_id: Uuid,
    pub program_id: i64,
    /// Denormalized so history survives program deletion-by-replacement
    pub program_name: String,
    pub scheduled_date: NaiveDate,
    pub duration_minutes: i64,
    pub is_completed: bool,
}

/// Per-set completion record, keyed by exercise name rather than exercise id
/// so it survives exercise-row regeneration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRecord {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub session_id: i64,
    pub exercise_name: String,
    pub set_index: i64,
    pub is_completed: bool,
    pub actual_reps: Option<String>,
}

/// Canonical storage and wire labels for the seven weekdays
pub const DAY_LABELS: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

/// Lowercase French label for a chrono weekday
#[must_use]
pub const fn day_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "lundi",
        Weekday::Tue => "mardi",
        Weekday::Wed => "mercredi",
        Weekday::Thu => "jeudi",
        Weekday::Fri => "vendredi",
        Weekday::Sat => "samedi",
        Weekday::Sun => "dimanche",
    }
}

/// Parse a stored day label back to a chrono weekday
#[must_use]
pub fn weekday_for_label(label: &str) -> Option<Weekday> {
    match label {
        "lundi" => Some(Weekday::Mon),
        "mardi" => Some(Weekday::Tue),
        "mercredi" => Some(Weekday::Wed),
        "jeudi" => Some(Weekday::Thu),
        "vendredi" => Some(Weekday::Fri),
        "samedi" => Some(Weekday::Sat),
        "dimanche" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Next `count` calendar occurrences of `weekday` walking forward from
/// `from` (inclusive), one week apart.
#[must_use]
pub fn upcoming_occurrences(weekday: Weekday, from: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let offset = (7 + weekday.num_days_from_monday() as i64
        - from.weekday().num_days_from_monday() as i64)
        % 7;
    let first = from + Duration::days(offset);
    (0..count)
        .map(|week| first + Duration::days(7 * week as i64))
        .collect()
}
