// ABOUTME: Configuration module for environment-driven server settings
// ABOUTME: Re-exports the typed configuration structs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

pub mod environment;

pub use environment::{AuthConfig, CorsConfig, LlmConfig, ServerConfig};
