use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A database row whose processed checkbox is still unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingItem {
    /// Page ID of the row; it is also the document that receives attachments.
    pub id: String,
    /// Source URL of the media, if the URL property is set.
    pub url: Option<String>,
}

/// Files produced by the media retriever for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub video_path: PathBuf,
    pub thumbnail_path: Option<PathBuf>,
}
