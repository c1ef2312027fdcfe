//! Recording mock of the remote upload API for testing without HTTP

use super::traits::UploadApi;
use async_trait::async_trait;
use reelpage_api_client::{CreateFileUploadRequest, FilePart, FileUpload};
use reelpage_core::{AppError, AppResult};
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex};

/// One remote call as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(CreateFileUploadRequest),
    Send {
        upload_id: String,
        filename: String,
        content_type: String,
        part_number: Option<u32>,
        len: usize,
    },
    Complete(String),
    Append {
        document_id: String,
        block: JsonValue,
    },
}

/// Records every call and fails the ones it is told to fail.
#[derive(Clone, Default)]
pub struct RecordingUploadApi {
    calls: Arc<Mutex<Vec<Call>>>,
    created: Arc<Mutex<u32>>,
    fail_create: Arc<Mutex<Option<u16>>>,
    fail_send_at: Arc<Mutex<Option<usize>>>,
    fail_complete: Arc<Mutex<Option<u16>>>,
    fail_append: Arc<Mutex<Option<u16>>>,
}

fn rejected(status: u16) -> AppError {
    AppError::Api {
        status,
        body: format!(r#"{{"status":{status},"code":"validation_error"}}"#),
    }
}

impl RecordingUploadApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create(&self, status: u16) {
        *self.fail_create.lock().unwrap() = Some(status);
    }

    /// Fail the `n`th send call (1-based, counted across sessions) with a 500.
    pub fn fail_send_at(&self, n: usize) {
        *self.fail_send_at.lock().unwrap() = Some(n);
    }

    pub fn fail_complete(&self, status: u16) {
        *self.fail_complete.lock().unwrap() = Some(status);
    }

    pub fn fail_append(&self, status: u16) {
        *self.fail_append.lock().unwrap() = Some(status);
    }

    pub fn reset_failures(&self) {
        *self.fail_create.lock().unwrap() = None;
        *self.fail_send_at.lock().unwrap() = None;
        *self.fail_complete.lock().unwrap() = None;
        *self.fail_append.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<CreateFileUploadRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Part numbers of every send call, in order.
    pub fn sent_parts(&self) -> Vec<Option<u32>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { part_number, .. } => Some(part_number),
                _ => None,
            })
            .collect()
    }

    pub fn sent_lengths(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { len, .. } => Some(len),
                _ => None,
            })
            .collect()
    }

    pub fn completes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Complete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn appends(&self) -> Vec<(String, JsonValue)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Append { document_id, block } => Some((document_id, block)),
                _ => None,
            })
            .collect()
    }

    fn send_count(&self) -> usize {
        self.sent_parts().len()
    }
}

#[async_trait]
impl UploadApi for RecordingUploadApi {
    async fn create_upload(&self, request: &CreateFileUploadRequest) -> AppResult<FileUpload> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(request.clone()));
        if let Some(status) = *self.fail_create.lock().unwrap() {
            return Err(rejected(status));
        }
        let mut created = self.created.lock().unwrap();
        *created += 1;
        Ok(FileUpload {
            id: format!("fu_{}", *created),
            status: Some("pending".to_string()),
            filename: Some(request.filename.clone()),
        })
    }

    async fn send_upload(&self, upload_id: &str, part: FilePart) -> AppResult<FileUpload> {
        self.calls.lock().unwrap().push(Call::Send {
            upload_id: upload_id.to_string(),
            filename: part.filename.clone(),
            content_type: part.content_type.clone(),
            part_number: part.part_number,
            len: part.bytes.len(),
        });
        if *self.fail_send_at.lock().unwrap() == Some(self.send_count()) {
            return Err(rejected(500));
        }
        Ok(FileUpload {
            id: upload_id.to_string(),
            status: Some("pending".to_string()),
            filename: Some(part.filename),
        })
    }

    async fn complete_upload(&self, upload_id: &str) -> AppResult<FileUpload> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Complete(upload_id.to_string()));
        if let Some(status) = *self.fail_complete.lock().unwrap() {
            return Err(rejected(status));
        }
        Ok(FileUpload {
            id: upload_id.to_string(),
            status: Some("uploaded".to_string()),
            filename: None,
        })
    }

    async fn append_block(&self, document_id: &str, block: JsonValue) -> AppResult<()> {
        self.calls.lock().unwrap().push(Call::Append {
            document_id: document_id.to_string(),
            block,
        });
        if let Some(status) = *self.fail_append.lock().unwrap() {
            return Err(rejected(status));
        }
        Ok(())
    }
}

/// Sparse file of `len` bytes; reads return zeros without using disk space.
pub fn sized_file(dir: &tempfile::TempDir, name: &str, len: u64) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let file = std::fs::File::create(&path).unwrap();
    file.set_len(len).unwrap();
    path
}
