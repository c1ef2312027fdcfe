//! Embeds a finished upload in a page as an image or video block.

use super::traits::UploadApi;
use reelpage_core::{AppResult, AttachmentKind};
use serde_json::{json, Value as JsonValue};

/// Everything needed to attach one finished upload to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRequest {
    pub document_id: String,
    pub upload_id: String,
    pub attachment_kind: AttachmentKind,
    pub display_name: String,
}

impl AttachmentRequest {
    pub fn new(
        document_id: impl Into<String>,
        upload_id: impl Into<String>,
        attachment_kind: AttachmentKind,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            upload_id: upload_id.into(),
            attachment_kind,
            display_name: display_name.into(),
        }
    }

    /// Block whose outer type is the attachment kind, referencing the upload
    /// and captioned with the display name.
    pub fn to_block(&self) -> JsonValue {
        let kind = self.attachment_kind.as_str();
        let mut block = json!({ "type": kind });
        block[kind] = json!({
            "caption": [caption_text(&self.display_name)],
            "type": "file_upload",
            "file_upload": { "id": self.upload_id },
        });
        block
    }
}

fn caption_text(content: &str) -> JsonValue {
    json!({
        "type": "text",
        "text": { "content": content, "link": null },
        "annotations": {
            "bold": false,
            "italic": false,
            "strikethrough": false,
            "underline": false,
            "code": false,
            "color": "default"
        },
        "plain_text": content,
        "href": null
    })
}

/// Append the attachment block as the last child of the document.
///
/// Consumes the request; a failure is returned as-is and never retried.
pub async fn compose_and_attach(api: &dyn UploadApi, request: AttachmentRequest) -> AppResult<()> {
    let block = request.to_block();
    api.append_block(&request.document_id, block).await?;
    tracing::info!(
        document_id = %request.document_id,
        upload_id = %request.upload_id,
        kind = %request.attachment_kind,
        "Attachment appended"
    );
    Ok(())
}
