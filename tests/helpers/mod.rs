// ABOUTME: Helper modules shared by the integration tests
// ABOUTME: HTTP request utilities and the scripted LLM provider

pub mod axum_test;
pub mod mock_provider;
