//! Remote operations used by the upload pipeline

use async_trait::async_trait;
use reelpage_api_client::{ApiClient, CreateFileUploadRequest, FilePart, FileUpload};
use reelpage_core::AppResult;
use serde_json::Value as JsonValue;

/// The four remote calls the upload pipeline speaks.
///
/// Implemented by [`ApiClient`]; tests substitute a recording mock.
#[async_trait]
pub trait UploadApi: Send + Sync {
    /// Open an upload session.
    async fn create_upload(&self, request: &CreateFileUploadRequest) -> AppResult<FileUpload>;

    /// Send the whole file, or one numbered part of it.
    async fn send_upload(&self, upload_id: &str, part: FilePart) -> AppResult<FileUpload>;

    /// Close a multi-part session.
    async fn complete_upload(&self, upload_id: &str) -> AppResult<FileUpload>;

    /// Append one block as the last child of a document.
    async fn append_block(&self, document_id: &str, block: JsonValue) -> AppResult<()>;
}

#[async_trait]
impl UploadApi for ApiClient {
    async fn create_upload(&self, request: &CreateFileUploadRequest) -> AppResult<FileUpload> {
        self.create_file_upload(request).await
    }

    async fn send_upload(&self, upload_id: &str, part: FilePart) -> AppResult<FileUpload> {
        self.send_file_upload(upload_id, part).await
    }

    async fn complete_upload(&self, upload_id: &str) -> AppResult<FileUpload> {
        self.complete_file_upload(upload_id).await
    }

    async fn append_block(&self, document_id: &str, block: JsonValue) -> AppResult<()> {
        self.append_block_children(document_id, vec![block])
            .await
            .map(|_| ())
    }
}
