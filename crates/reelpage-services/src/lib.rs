//! Reelpage Services Layer
//!
//! This crate hosts the upload pipeline (session state machine, attachment
//! composer, orchestrator) and the collaborators the sync loop drives: the
//! Notion-backed document store and the yt-dlp media retriever. The CLI wires
//! them together; keep I/O details in the API client.

pub mod document_store;
pub mod retriever;
pub mod sync;
pub mod upload;

pub use document_store::{DocumentStore, NotionDocumentStore};
pub use retriever::{normalize_thumbnail_extension, MediaRetriever, YtDlpRetriever};
pub use sync::{ItemFailure, SyncReport, SyncService};
pub use upload::{
    compose_and_attach, AttachmentRequest, SessionState, UploadApi, UploadError,
    UploadOrchestrator, UploadOutcome, UploadPhase, UploadSession,
};
