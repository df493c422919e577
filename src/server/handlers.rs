//! HTTP request handlers
//!
//! Contains handlers for all HTTP endpoints.

use std::collections::HashMap;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::AppState;
use crate::collector::DeviceTarget;
use crate::error::{AppError, AppResult};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health status
    status: String,
    /// Application version
    version: String,
}

/// Root endpoint - displays basic info
pub async fn root(State(state): State<AppState>) -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>panos-exporter</title>
</head>
<body>
    <h1>panos-exporter</h1>
    <p>Version: {}</p>
    <ul>
        <li><a href="/health">Health Check</a></li>
        <li><a href="{}?target=device">Metrics</a></li>
    </ul>
</body>
</html>"#,
        env!("CARGO_PKG_VERSION"),
        state.config.server.path
    );
    Html(html)
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Prometheus scrape endpoint.
///
/// The `target` query parameter names a configured device. A missing
/// or unknown target is rejected with 400 before any upstream call is
/// made; everything after that point degrades into `panos_up 0` plus
/// error samples rather than an HTTP error.
#[instrument(skip(state, params), name = "metrics_handler")]
pub async fn metrics(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let start = Instant::now();

    let target = params
        .get("target")
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingTarget)?;

    info!(target = %target, "Scrape requested");

    let device = state
        .config
        .get_device(target)
        .ok_or_else(|| AppError::UnknownTarget(target.clone()))?;

    let device_target = DeviceTarget::from_config(target, device);

    // Run the scrape on its own task so a panicking collector turns
    // into a 500 (with the cause in the body when debug is enabled)
    // instead of tearing down the connection.
    let exporter = state.exporter.clone();
    let result = tokio::spawn(async move { exporter.collect(&device_target).await })
        .await
        .map_err(|e| AppError::Internal {
            detail: e.to_string(),
            debug: state.config.debug,
        })?;
    let output = result.render();

    debug!(
        target = %target,
        duration_ms = start.elapsed().as_millis() as u64,
        up = result.up,
        errors = result.errors.len(),
        samples = result.samples.len(),
        "Scrape complete"
    );

    Ok((
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        output,
    ))
}
