use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Block type used when a finished upload is embedded in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Video => "video",
        }
    }
}

impl Display for AttachmentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Content type and attachment kind derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeTypeInfo {
    pub content_type: &'static str,
    pub attachment_kind: AttachmentKind,
}

impl MimeTypeInfo {
    pub const fn new(content_type: &'static str, attachment_kind: AttachmentKind) -> Self {
        Self {
            content_type,
            attachment_kind,
        }
    }
}
