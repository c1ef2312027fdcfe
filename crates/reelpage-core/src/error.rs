//! Error types module
//!
//! `AppError` covers every failure raised by the collaborators around the
//! upload pipeline: configuration, local I/O, HTTP transport, non-success API
//! responses, response decoding and media retrieval. Phase-tagged upload
//! failures live in `reelpage-services` and wrap an `AppError` as their source.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like invalid input
    Debug,
    /// Warning level - for upstream rejections the operator may want to look at
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Media retrieval failed: {0}")]
    Retrieval(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result alias used across the workspace.
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(format!("JSON parsing error: {}", err))
    }
}

impl AppError {
    /// HTTP status returned by the remote service, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body returned by the remote service, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            AppError::Api { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    /// Machine-readable error code (e.g. "API_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Http(_) => "HTTP_ERROR",
            AppError::Api { .. } => "API_ERROR",
            AppError::Decode(_) => "DECODE_ERROR",
            AppError::Retrieval(_) => "RETRIEVAL_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    /// Whether a later run could plausibly succeed. Logged with the error;
    /// nothing retries on its own.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Http(_) | AppError::Retrieval(_) => true,
            AppError::Api { status, .. } => *status == 429 || *status >= 500,
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Decode(_)
            | AppError::InvalidInput(_) => false,
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) => LogLevel::Debug,
            AppError::Api { status, .. } if *status < 500 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}
