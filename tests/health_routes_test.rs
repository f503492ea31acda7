// ABOUTME: Integration test for the liveness endpoint
// ABOUTME: Health must answer without authentication or storage access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use common::setup_app;
use helpers::axum_test::AxumTestRequest;
use helpers::mock_provider::MockProvider;

use coach_server::routes::health::HealthResponse;
use std::sync::Arc;

#[tokio::test]
async fn test_health_answers_without_a_token() {
    let (router, _resources) = setup_app(Arc::new(MockProvider::unreachable()))
        .await
        .unwrap();

    let response = AxumTestRequest::get("/health").send(router).await;
    assert_eq!(response.status(), 200);

    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.service, "coach_server");
    assert!(!health.version.is_empty());
}
