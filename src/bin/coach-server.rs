// ABOUTME: Server binary wiring configuration, storage, the AI provider, and the router
// ABOUTME: Serves the REST API with request tracing and CORS
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use clap::Parser;
use coach_server::{
    auth::AuthManager,
    config::environment::ServerConfig,
    database::Database,
    llm::{OpenAiConfig, OpenAiProvider},
    logging::LoggingConfig,
    resources::ServerResources,
    routes,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser)]
#[command(name = "coach-server")]
#[command(about = "Atlas Coach - AI fitness coaching REST backend")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    LoggingConfig::from_env().init()?;

    info!("Starting Atlas Coach server");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url).await?;
    info!("Database initialized and migrated");

    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_expiry_hours,
    );

    let provider = Arc::new(OpenAiProvider::new(OpenAiConfig::from(&config.llm))?);
    info!(
        "AI provider ready: {} (model {})",
        config.llm.base_url, config.llm.model
    );

    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        provider,
        config.clone(),
    ));

    let app = routes::router(resources)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");
    info!("Endpoints: /auth, /programs, /ai, /sessions, /analytics, /admin, /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.cors.allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}
