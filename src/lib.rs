// ABOUTME: Main library entry point for the Atlas Coach fitness backend
// ABOUTME: REST API for AI program generation, session tracking, and analytics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

#![deny(unsafe_code)]

//! # Atlas Coach Server
//!
//! REST backend for a fitness-coaching application. Program generation and
//! conversational coaching are delegated to an external OpenAI-compatible
//! chat-completions API through prompt templates; the backend validates the
//! AI's JSON output, persists it to SQLite, and serves it back.
//!
//! ## Architecture
//!
//! - **`auth`**: JWT session tokens and bcrypt password helpers
//! - **`llm`**: Provider SPI, OpenAI-compatible client, plan schema validation
//! - **`services`**: The generation and modification pipelines
//! - **`database`**: SQLite storage with transactional write groups
//! - **`routes`**: Axum handlers per domain, bearer-token authenticated

pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod resources;
pub mod routes;
pub mod services;
