//! Sync loop: moves every pending item's media into its page.

use crate::document_store::DocumentStore;
use crate::retriever::{normalize_thumbnail_extension, MediaRetriever};
use crate::upload::UploadOrchestrator;
use reelpage_core::{AppError, AppResult, LogLevel, PendingItem};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Why one item was not marked processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub document_id: String,
    pub reason: String,
}

/// Summary of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Items whose media was attached and whose processed flag was set.
    pub completed: Vec<String>,
    /// Items without a URL.
    pub skipped: Vec<String>,
    pub failures: Vec<ItemFailure>,
}

impl SyncReport {
    pub fn total(&self) -> usize {
        self.completed.len() + self.skipped.len() + self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

enum ItemOutcome {
    Completed,
    Skipped,
    Failed(String),
}

/// Processes pending items one after another.
///
/// For each item: download the media, clear the page, retitle it, upload the
/// video and then the thumbnail, and set the processed flag once every upload
/// succeeded. A failing item is logged and left unprocessed so a later run
/// picks it up again; the loop always moves on to the next item.
pub struct SyncService {
    store: Arc<dyn DocumentStore>,
    retriever: Arc<dyn MediaRetriever>,
    uploader: UploadOrchestrator,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        retriever: Arc<dyn MediaRetriever>,
        uploader: UploadOrchestrator,
    ) -> Self {
        Self {
            store,
            retriever,
            uploader,
        }
    }

    /// Run once over every pending item.
    ///
    /// Only a failed query of the pending items is returned as an error.
    pub async fn run(&self) -> AppResult<SyncReport> {
        let items = self.store.find_pending().await?;
        let mut report = SyncReport::default();

        if items.is_empty() {
            tracing::warn!("No pending items in the database");
            return Ok(report);
        }

        tracing::info!(count = items.len(), "Processing pending items");

        for item in items {
            match self.process_item(&item).await {
                ItemOutcome::Completed => {
                    tracing::info!(document_id = %item.id, "Item processed");
                    report.completed.push(item.id);
                }
                ItemOutcome::Skipped => report.skipped.push(item.id),
                ItemOutcome::Failed(reason) => {
                    tracing::error!(document_id = %item.id, reason = %reason, "Item failed");
                    report.failures.push(ItemFailure {
                        document_id: item.id,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            completed = report.completed.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "Sync finished"
        );
        Ok(report)
    }

    #[tracing::instrument(skip(self, item), fields(document_id = %item.id))]
    async fn process_item(&self, item: &PendingItem) -> ItemOutcome {
        let Some(url) = item.url.as_deref() else {
            tracing::warn!("Item has no URL; skipping");
            return ItemOutcome::Skipped;
        };

        let info = match self.retriever.fetch(url).await {
            Ok(info) => info,
            Err(e) => return ItemOutcome::Failed(format!("download of {} failed: {}", url, e)),
        };

        if let Err(e) = self.store.clear_content(&item.id).await {
            log_collaborator_error(&e, "Failed to clear page content; continuing");
        }
        if let Err(e) = self.store.set_title(&item.id, &info.title).await {
            log_collaborator_error(&e, "Failed to update page title; continuing");
        }

        let mut upload_errors = Vec::new();
        if let Err(reason) = self.upload(&item.id, &info.video_path).await {
            upload_errors.push(reason);
        }

        if let Some(thumbnail) = &info.thumbnail_path {
            match normalize_thumbnail_extension(thumbnail).await {
                Ok(path) => {
                    if let Err(reason) = self.upload(&item.id, &path).await {
                        upload_errors.push(reason);
                    }
                }
                Err(e) => upload_errors.push(format!(
                    "could not rename {}: {}",
                    thumbnail.display(),
                    e
                )),
            }
        }

        if !upload_errors.is_empty() {
            return ItemOutcome::Failed(upload_errors.join("; "));
        }

        match self.store.set_processed_flag(&item.id, true).await {
            Ok(()) => ItemOutcome::Completed,
            Err(e) => ItemOutcome::Failed(format!("could not set processed flag: {}", e)),
        }
    }

    async fn upload(&self, document_id: &str, path: &Path) -> Result<(), String> {
        match self.uploader.upload(document_id, path).await {
            Ok(outcome) => {
                tracing::info!(
                    file = %path.display(),
                    upload_id = %outcome.upload_id,
                    kind = %outcome.attachment_kind,
                    "File attached"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    file = %e.file().display(),
                    phase = %e.phase(),
                    status = ?e.upstream_status(),
                    body = ?e.upstream_body(),
                    error = %e,
                    "Upload failed"
                );
                Err(e.to_string())
            }
        }
    }
}

fn log_collaborator_error(error: &AppError, message: &str) {
    let code = error.error_code();
    let recoverable = error.is_recoverable();
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(error = %error, code, recoverable, "{}", message),
        LogLevel::Warn => tracing::warn!(error = %error, code, recoverable, "{}", message),
        LogLevel::Error => tracing::error!(error = %error, code, recoverable, "{}", message),
    }
}
