//! Request and response types for the Notion endpoints used by reelpage.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Body of `POST /file_uploads`.
///
/// Single-part uploads only carry the filename; multi-part uploads also
/// declare the content type, the mode and the number of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateFileUploadRequest {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_parts: Option<u32>,
}

impl CreateFileUploadRequest {
    pub fn single_part(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            mode: None,
            number_of_parts: None,
        }
    }

    pub fn multi_part(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        number_of_parts: u32,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: Some(content_type.into()),
            mode: Some("multi_part".to_string()),
            number_of_parts: Some(number_of_parts),
        }
    }
}

/// File upload object returned by the create, send and complete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileUpload {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Bytes sent to `POST /file_uploads/{id}/send`.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// 1-based part number; `None` for single-part uploads.
    pub part_number: Option<u32>,
}

/// Paginated list envelope shared by list and query endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedList<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// The parts of a block object reelpage needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockRef {
    pub id: String,
}

/// A page (database row) with its raw property values.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, JsonValue>,
}

impl Page {
    /// Value of a `url` property, if present and non-null.
    pub fn url_property(&self, name: &str) -> Option<String> {
        self.properties
            .get(name)?
            .get("url")?
            .as_str()
            .map(str::to_string)
    }
}
