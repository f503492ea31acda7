// ABOUTME: Analytics route handler for lifetime stats and the weekly activity chart
// ABOUTME: Single endpoint combining global aggregates with the zero-filled 7-day series
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::database::analytics::{DayActivity, GlobalStats};
use crate::errors::AppResult;
use crate::resources::ServerResources;
use crate::routes::authenticate;

/// Response for `GET /analytics`
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub global: GlobalStats,
    pub chart: Vec<DayActivity>,
}

/// Analytics routes handler
pub struct AnalyticsRoutes;

impl AnalyticsRoutes {
    /// Create the analytics route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/analytics", get(Self::analytics))
            .with_state(resources)
    }

    /// Lifetime totals plus the trailing 7-day chart
    async fn analytics(
        headers: HeaderMap,
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<Json<AnalyticsResponse>> {
        let user = authenticate(&headers, &resources).await?;
        let today = Utc::now().date_naive();

        let global = resources.database.global_stats(user.id, today).await?;
        let chart = resources.database.weekly_chart(user.id, today).await?;

        Ok(Json(AnalyticsResponse { global, chart }))
    }
}
