use super::composer::{compose_and_attach, AttachmentRequest};
use super::error::UploadError;
use super::session::UploadSession;
use super::traits::UploadApi;
use reelpage_core::{classify, AttachmentKind, UploadMode};
use std::path::Path;
use std::sync::Arc;

/// Result of uploading and attaching one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub upload_id: String,
    pub attachment_kind: AttachmentKind,
    pub display_name: String,
    pub mode: UploadMode,
    pub parts_sent: u32,
}

/// Uploads local files and attaches them to documents.
///
/// Classifies the file, runs one [`UploadSession`], then appends the
/// attachment block. The first failure ends the file; nothing created
/// remotely is cleaned up.
#[derive(Clone)]
pub struct UploadOrchestrator {
    api: Arc<dyn UploadApi>,
}

impl UploadOrchestrator {
    pub fn new(api: Arc<dyn UploadApi>) -> Self {
        Self { api }
    }

    #[tracing::instrument(skip(self, file_path), fields(file = %file_path.display()))]
    pub async fn upload(
        &self,
        document_id: &str,
        file_path: &Path,
    ) -> Result<UploadOutcome, UploadError> {
        let mime = classify(file_path);
        let display_name = display_name(file_path);

        let file_size = tokio::fs::metadata(file_path)
            .await
            .map_err(|source| UploadError::Io {
                file: file_path.to_path_buf(),
                source,
            })?
            .len();

        let mut session =
            UploadSession::new(file_path, display_name.clone(), mime.content_type, file_size);
        let upload_id = session.run(self.api.as_ref()).await?;

        let request = AttachmentRequest::new(
            document_id,
            upload_id.clone(),
            mime.attachment_kind,
            display_name.clone(),
        );
        compose_and_attach(self.api.as_ref(), request)
            .await
            .map_err(|source| UploadError::Attach {
                file: file_path.to_path_buf(),
                document_id: document_id.to_string(),
                upload_id: upload_id.clone(),
                source,
            })?;

        Ok(UploadOutcome {
            upload_id,
            attachment_kind: mime.attachment_kind,
            display_name,
            mode: session.mode(),
            parts_sent: session.parts_sent(),
        })
    }
}

/// Base name of the file, used as the upload filename and the caption.
fn display_name(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string_lossy().into_owned())
}
