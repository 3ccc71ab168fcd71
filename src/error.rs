//! Common error types for the gateway and its services

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-wide error type
///
/// Transport failures of outbound calls are deliberately absent: they are
/// carried as values inside [`crate::backend::CallResult`].
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Cannot resolve {0}")]
    Resolve(String),

    #[error("Downstream failure: {0}")]
    Downstream(String),

    #[error("Workload failed: {0}")]
    Workload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a configuration validation failure
    pub fn invalid_config(message: impl Into<String>) -> Self {
        AppError::Config(::config::ConfigError::Message(message.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::Resolve(_) => StatusCode::BAD_GATEWAY,
            AppError::Downstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Workload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, format!("{}\n", self)).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
