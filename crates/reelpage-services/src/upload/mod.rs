//! Chunked file upload into Notion pages.
//!
//! A file goes through three phases: an upload session is created, the bytes
//! are transferred (as one request or as ordered parts), and the finished
//! upload is attached to a page as an image or video block.

pub mod composer;
pub mod error;
pub mod orchestrator;
pub mod session;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use composer::{compose_and_attach, AttachmentRequest};
pub use error::{UploadError, UploadPhase};
pub use orchestrator::{UploadOrchestrator, UploadOutcome};
pub use session::{SessionState, UploadSession};
pub use traits::UploadApi;
