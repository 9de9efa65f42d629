//! Application-level error types.
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Leverage must be a finite value greater than zero.
    #[error("invalid leverage: {0} (must be > 0)")]
    InvalidLeverage(f64),

    /// Bucket size must be a finite value greater than zero.
    #[error("invalid bucket size: {0} (must be > 0)")]
    InvalidBucketSize(f64),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialisation error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;
