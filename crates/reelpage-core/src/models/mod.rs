//! Data models for the application
//!
//! Each sub-module represents one feature area: MIME information for
//! attachments, the upload-mode decision, and the work items and downloaded
//! media handled by the sync loop.

mod item;
mod media;
mod upload;

pub use item::*;
pub use media::*;
pub use upload::*;
