// ABOUTME: JWT session tokens and bcrypt password helpers
// ABOUTME: AuthManager issues and validates HS256 tokens carrying user id and email
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use crate::errors::{AppError, AppResult};
use crate::models::User;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Bcrypt work factor for password hashing
const BCRYPT_COST: u32 = 10;

/// JWT claims structure for authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (uuid string)
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch)
    pub exp: i64,
}

/// Issues and validates the session tokens used by every protected route
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl AuthManager {
    /// Create a new manager from the shared HS256 secret
    #[must_use]
    pub fn new(secret: &[u8], expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours,
        }
    }

    /// Generate a token for the given user
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.expiry_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::auth_invalid("Token expired")
                }
                _ => AppError::auth_invalid("Invalid token"),
            })
    }
}

/// Hash a password with bcrypt on a blocking thread
pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Hash task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash on a blocking thread
pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Verify task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))
}
