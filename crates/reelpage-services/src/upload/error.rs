use reelpage_core::AppError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Phase of the upload pipeline in which a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Read,
    Create,
    Transfer,
    Finalize,
    Attach,
}

impl UploadPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadPhase::Read => "read",
            UploadPhase::Create => "create",
            UploadPhase::Transfer => "transfer",
            UploadPhase::Finalize => "finalize",
            UploadPhase::Attach => "attach",
        }
    }
}

impl std::fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal failure of one file's upload. Each variant aborts the file and
/// carries the path plus the upstream error.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create upload session for {}: {source}", .file.display())]
    SessionCreate {
        file: PathBuf,
        #[source]
        source: AppError,
    },

    /// `part_number` is `None` for a single-part transfer.
    #[error("Failed to send {} of {}: {source}", part_label(.part_number), .file.display())]
    PartTransfer {
        file: PathBuf,
        upload_id: String,
        part_number: Option<u32>,
        #[source]
        source: AppError,
    },

    #[error("Failed to complete upload {upload_id} for {}: {source}", .file.display())]
    Finalize {
        file: PathBuf,
        upload_id: String,
        #[source]
        source: AppError,
    },

    #[error("Upload session for {} has already run", .file.display())]
    AlreadyRun {
        file: PathBuf,
        upload_id: Option<String>,
    },

    #[error("Failed to attach upload {upload_id} of {} to {document_id}: {source}", .file.display())]
    Attach {
        file: PathBuf,
        document_id: String,
        upload_id: String,
        #[source]
        source: AppError,
    },
}

fn part_label(part_number: &Option<u32>) -> String {
    match part_number {
        Some(n) => format!("part {}", n),
        None => "contents".to_string(),
    }
}

impl UploadError {
    pub fn phase(&self) -> UploadPhase {
        match self {
            UploadError::Io { .. } => UploadPhase::Read,
            UploadError::SessionCreate { .. } | UploadError::AlreadyRun { .. } => {
                UploadPhase::Create
            }
            UploadError::PartTransfer { .. } => UploadPhase::Transfer,
            UploadError::Finalize { .. } => UploadPhase::Finalize,
            UploadError::Attach { .. } => UploadPhase::Attach,
        }
    }

    pub fn file(&self) -> &Path {
        match self {
            UploadError::Io { file, .. }
            | UploadError::SessionCreate { file, .. }
            | UploadError::PartTransfer { file, .. }
            | UploadError::Finalize { file, .. }
            | UploadError::AlreadyRun { file, .. }
            | UploadError::Attach { file, .. } => file,
        }
    }

    fn upstream(&self) -> Option<&AppError> {
        match self {
            UploadError::Io { .. } | UploadError::AlreadyRun { .. } => None,
            UploadError::SessionCreate { source, .. }
            | UploadError::PartTransfer { source, .. }
            | UploadError::Finalize { source, .. }
            | UploadError::Attach { source, .. } => Some(source),
        }
    }

    /// HTTP status returned by Notion, when the failure was a non-2xx response.
    pub fn upstream_status(&self) -> Option<u16> {
        self.upstream().and_then(AppError::status)
    }

    /// Response body returned by Notion, when the failure was a non-2xx response.
    pub fn upstream_body(&self) -> Option<&str> {
        self.upstream().and_then(AppError::body)
    }

    /// Part number of a failed multi-part transfer.
    pub fn part_number(&self) -> Option<u32> {
        match self {
            UploadError::PartTransfer { part_number, .. } => *part_number,
            _ => None,
        }
    }
}
