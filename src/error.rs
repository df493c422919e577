//! Error types for panos-exporter
//!
//! This module defines the error types used throughout the application.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Transport errors raised while talking to the PAN-OS management API
#[derive(Error, Debug)]
pub enum CollectorError {
    /// HTTP client initialization failed
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// HTTP request failed (timeout, connection refused, DNS, ...)
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[source] reqwest::Error),

    /// Reading the HTTP response body failed
    #[error("Failed to read HTTP response: {0}")]
    HttpResponse(#[source] reqwest::Error),

    /// Non-success HTTP status with no retry budget spent on it
    #[error("HTTP error status: {0}")]
    HttpStatus(u16),

    /// Retryable server errors persisted through all attempts
    #[error("Retries exhausted after {attempts} attempts (last status {status})")]
    RetriesExhausted { status: u16, attempts: u32 },
}

impl CollectorError {
    /// Whether this failure is worth another attempt.
    ///
    /// Only transient upstream server errors qualify; timeouts,
    /// connection failures and 4xx responses fail immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CollectorError::HttpStatus(500 | 502 | 503 | 504)
        )
    }

    /// HTTP status code carried by this error, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            CollectorError::HttpStatus(code) => Some(*code),
            CollectorError::RetriesExhausted { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for transport operations
pub type CollectResult<T> = Result<T, CollectorError>;

/// A collector failed to make sense of a response body.
///
/// Captured at the parser boundary and converted into one synthetic
/// `panos_error` sample; never propagates past the aggregator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage}: {cause}")]
pub struct ParseError {
    /// Parser identity, e.g. "system_info_parse"
    pub stage: &'static str,
    /// Human-readable cause
    pub cause: String,
}

impl ParseError {
    /// Create a parse error for the given parser stage
    pub fn new(stage: &'static str, cause: impl Into<String>) -> Self {
        Self {
            stage,
            cause: cause.into(),
        }
    }
}

/// Application error type surfaced at the HTTP boundary
#[derive(Error, Debug)]
pub enum AppError {
    /// Scrape request without a `target` query parameter
    #[error("Missing target parameter")]
    MissingTarget,

    /// Scrape request for a device not present in the configuration
    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Internal server error; the cause is only exposed in debug mode
    #[error("Internal error: {detail}")]
    Internal { detail: String, debug: bool },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingTarget => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing target parameter" }),
            ),
            AppError::UnknownTarget(target) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("Unknown target: {}", target) }),
            ),
            AppError::Config(e) => {
                tracing::error!(error = %e, "Configuration error at request time");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Configuration error" }),
                )
            }
            AppError::Internal { detail, debug } => {
                tracing::error!(error = %detail, "Request failed");
                let body = if debug {
                    json!({ "error": "Internal error", "debug": detail })
                } else {
                    json!({ "error": "Internal error" })
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
