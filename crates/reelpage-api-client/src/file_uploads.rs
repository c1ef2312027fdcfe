//! File upload endpoints: create a session, send bytes, complete a multi-part upload.

use crate::types::{CreateFileUploadRequest, FilePart, FileUpload};
use crate::{segment, ApiClient};
use reelpage_core::{AppError, AppResult};
use reqwest::multipart::{Form, Part};

impl ApiClient {
    /// `POST /file_uploads`
    pub async fn create_file_upload(
        &self,
        request: &CreateFileUploadRequest,
    ) -> AppResult<FileUpload> {
        self.post_json("/file_uploads", request).await
    }

    /// `POST /file_uploads/{id}/send` with the bytes as the `file` form field.
    pub async fn send_file_upload(&self, upload_id: &str, part: FilePart) -> AppResult<FileUpload> {
        let file = Part::bytes(part.bytes)
            .file_name(part.filename)
            .mime_str(&part.content_type)
            .map_err(|e| {
                AppError::InvalidInput(format!(
                    "Invalid content type {}: {}",
                    part.content_type, e
                ))
            })?;

        let mut form = Form::new().part("file", file);
        if let Some(part_number) = part.part_number {
            form = form.text("part_number", part_number.to_string());
        }

        self.post_multipart(&format!("/file_uploads/{}/send", segment(upload_id)), form)
            .await
    }

    /// `POST /file_uploads/{id}/complete`
    pub async fn complete_file_upload(&self, upload_id: &str) -> AppResult<FileUpload> {
        self.post_json(
            &format!("/file_uploads/{}/complete", segment(upload_id)),
            &serde_json::json!({}),
        )
        .await
    }
}
