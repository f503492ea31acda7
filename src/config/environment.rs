// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into typed config with sensible defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use anyhow::{Context, Result};
use std::env;
use tracing::{info, warn};

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default token lifetime in hours (30 days)
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 720;

/// JWT settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
}

/// External LLM endpoint settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Model used for program generation and modification
    pub model: String,
    /// Model used for the conversational coach
    pub chat_model: String,
}

/// CORS settings
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins, or `["*"]` for any
    pub allowed_origins: Vec<String>,
}

/// Top-level server configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub llm: LlmConfig,
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())?
                .parse()
                .context("Invalid HTTP_PORT value")?,
            database_url: env_var_or("DATABASE_URL", "sqlite:./data/coach.db")?,
            auth: AuthConfig {
                jwt_secret: env_var_or("JWT_SECRET", "dev_secret_change_me")?,
                jwt_expiry_hours: env_var_or(
                    "JWT_EXPIRY_HOURS",
                    &DEFAULT_JWT_EXPIRY_HOURS.to_string(),
                )?
                .parse()
                .context("Invalid JWT_EXPIRY_HOURS value")?,
            },
            llm: LlmConfig {
                base_url: env_var_or("COACH_LLM_BASE_URL", "https://api.openai.com/v1")?,
                api_key: env::var("COACH_LLM_API_KEY").ok(),
                model: env_var_or("COACH_LLM_MODEL", "gpt-4o-mini")?,
                chat_model: env_var_or("COACH_LLM_CHAT_MODEL", "gpt-4o-mini")?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")?),
            },
        };

        Ok(config)
    }

    /// One-line startup summary. Secrets are never included.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} database={} llm_base={} llm_model={} cors={:?}",
            self.http_port,
            self.database_url,
            self.llm.base_url,
            self.llm.model,
            self.cors.allowed_origins
        )
    }
}

fn env_var_or(key: &str, default: &str) -> Result<String> {
    Ok(env::var(key).unwrap_or_else(|_| default.to_string()))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
