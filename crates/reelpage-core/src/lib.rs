//! Reelpage Core Library
//!
//! This crate provides the domain models, error types, configuration and MIME
//! classification shared by the API client, the upload services and the CLI.

pub mod config;
pub mod error;
pub mod mime;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult, LogLevel};
pub use mime::classify;
pub use models::{
    AttachmentKind, MimeTypeInfo, PendingItem, UploadMode, VideoInfo, PART_SIZE_BYTES,
    SINGLE_PART_MAX_BYTES,
};
