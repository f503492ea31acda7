// ABOUTME: Structured logging setup built on tracing and tracing-subscriber
// ABOUTME: Level and format come from the environment; dependency noise is filtered down
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// Output format for log records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => Self::Json,
            Ok("compact") => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Read `RUST_LOG` / `LOG_FORMAT`, defaulting to info-level pretty output
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            format: LogFormat::from_env(),
        }
    }

    /// Install the global subscriber. Call once, from the binary.
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_new(&self.level)
            .unwrap_or_else(|_| EnvFilter::new("info"))
            // HTTP client and pool internals are too chatty below warn
            .add_directive("hyper=warn".parse()?)
            .add_directive("reqwest=warn".parse()?)
            .add_directive("sqlx=warn".parse()?);

        let builder = fmt().with_env_filter(filter).with_target(true);
        match self.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Pretty => builder.try_init(),
        }
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

        tracing::info!(level = %self.level, format = ?self.format, "Logging initialized");
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_is_info() {
        std::env::remove_var("RUST_LOG");
        let config = LoggingConfig::from_env();
        assert_eq!(config.level, "info");
    }
}
