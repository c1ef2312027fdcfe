//! Extension-based MIME classification for attachments.

use std::path::Path;

use crate::models::{AttachmentKind, MimeTypeInfo};

/// Returned for any extension not in the table. It pairs a generic binary
/// content type with the `image` block kind so callers always get a kind.
pub const FALLBACK: MimeTypeInfo =
    MimeTypeInfo::new("application/octet-stream", AttachmentKind::Image);

/// Classify a file by its lowercased extension.
pub fn classify(path: impl AsRef<Path>) -> MimeTypeInfo {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("mp4") => MimeTypeInfo::new("application/mp4", AttachmentKind::Video),
        Some("jpg") | Some("jpeg") => MimeTypeInfo::new("image/jpeg", AttachmentKind::Image),
        Some("png") => MimeTypeInfo::new("image/png", AttachmentKind::Image),
        Some("gif") => MimeTypeInfo::new("image/gif", AttachmentKind::Image),
        Some("webp") => MimeTypeInfo::new("image/webp", AttachmentKind::Image),
        _ => FALLBACK,
    }
}
