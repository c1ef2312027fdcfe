//! Upload session state machine for one file.

use super::error::UploadError;
use super::traits::UploadApi;
use reelpage_api_client::{CreateFileUploadRequest, FilePart};
use reelpage_core::{UploadMode, PART_SIZE_BYTES};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Lifecycle of an [`UploadSession`].
///
/// `Created → SessionOpened → Transferring → Transferred → Finalized`, with
/// `Failed` reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    SessionOpened,
    Transferring,
    Transferred,
    Finalized,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Finalized | SessionState::Failed)
    }
}

/// Remote upload lifecycle of one file.
///
/// The mode is fixed at construction from the declared size. A session runs
/// once: it is never retried or resumed, and a failure leaves whatever was
/// created remotely in place.
#[derive(Debug)]
pub struct UploadSession {
    file_path: PathBuf,
    display_name: String,
    content_type: String,
    file_size: u64,
    chunk_size: u64,
    mode: UploadMode,
    upload_id: Option<String>,
    parts_sent: u32,
    state: SessionState,
}

impl UploadSession {
    pub fn new(
        file_path: impl Into<PathBuf>,
        display_name: impl Into<String>,
        content_type: impl Into<String>,
        file_size: u64,
    ) -> Self {
        Self::build(
            file_path.into(),
            display_name.into(),
            content_type.into(),
            file_size,
            PART_SIZE_BYTES,
            UploadMode::for_size(file_size),
        )
    }

    /// Session with an explicit single-part threshold and chunk size.
    pub fn with_limits(
        file_path: impl Into<PathBuf>,
        display_name: impl Into<String>,
        content_type: impl Into<String>,
        file_size: u64,
        threshold: u64,
        chunk_size: u64,
    ) -> Self {
        let chunk_size = chunk_size.max(1);
        Self::build(
            file_path.into(),
            display_name.into(),
            content_type.into(),
            file_size,
            chunk_size,
            UploadMode::with_limits(file_size, threshold, chunk_size),
        )
    }

    fn build(
        file_path: PathBuf,
        display_name: String,
        content_type: String,
        file_size: u64,
        chunk_size: u64,
        mode: UploadMode,
    ) -> Self {
        Self {
            file_path,
            display_name,
            content_type,
            file_size,
            chunk_size,
            mode,
            upload_id: None,
            parts_sent: 0,
            state: SessionState::Created,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    pub fn parts_sent(&self) -> u32 {
        self.parts_sent
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session through create, transfer and finalize.
    ///
    /// Returns the upload ID once the upload is ready to attach.
    pub async fn run(&mut self, api: &dyn UploadApi) -> Result<String, UploadError> {
        if self.state != SessionState::Created {
            return Err(UploadError::AlreadyRun {
                file: self.file_path.clone(),
                upload_id: self.upload_id.clone(),
            });
        }

        let outcome = self.drive(api).await;
        if outcome.is_err() {
            self.state = SessionState::Failed;
        }
        outcome
    }

    async fn drive(&mut self, api: &dyn UploadApi) -> Result<String, UploadError> {
        let upload_id = self.create(api).await?;
        self.transfer(api, &upload_id).await?;
        self.finalize(api, &upload_id).await?;
        Ok(upload_id)
    }

    async fn create(&mut self, api: &dyn UploadApi) -> Result<String, UploadError> {
        let request = match self.mode {
            UploadMode::SinglePart => CreateFileUploadRequest::single_part(&self.display_name),
            UploadMode::MultiPart { parts_total } => CreateFileUploadRequest::multi_part(
                &self.display_name,
                &self.content_type,
                parts_total,
            ),
        };

        let upload = api
            .create_upload(&request)
            .await
            .map_err(|source| UploadError::SessionCreate {
                file: self.file_path.clone(),
                source,
            })?;

        tracing::info!(
            file = %self.file_path.display(),
            upload_id = %upload.id,
            mode = self.mode.as_str(),
            parts_total = ?self.mode.parts_total(),
            "Upload session created"
        );

        self.upload_id = Some(upload.id.clone());
        self.state = SessionState::SessionOpened;
        Ok(upload.id)
    }

    async fn transfer(&mut self, api: &dyn UploadApi, upload_id: &str) -> Result<(), UploadError> {
        self.state = SessionState::Transferring;
        match self.mode {
            UploadMode::SinglePart => self.send_whole(api, upload_id).await?,
            UploadMode::MultiPart { parts_total } => {
                self.send_parts(api, upload_id, parts_total).await?
            }
        }
        self.state = SessionState::Transferred;
        Ok(())
    }

    async fn send_whole(&mut self, api: &dyn UploadApi, upload_id: &str) -> Result<(), UploadError> {
        let bytes = tokio::fs::read(&self.file_path)
            .await
            .map_err(|source| self.io_error(source))?;

        api.send_upload(upload_id, self.file_part(bytes, None))
            .await
            .map_err(|source| UploadError::PartTransfer {
                file: self.file_path.clone(),
                upload_id: upload_id.to_string(),
                part_number: None,
                source,
            })?;

        tracing::debug!(upload_id = %upload_id, "File contents sent");
        Ok(())
    }

    async fn send_parts(
        &mut self,
        api: &dyn UploadApi,
        upload_id: &str,
        parts_total: u32,
    ) -> Result<(), UploadError> {
        let mut file = tokio::fs::File::open(&self.file_path)
            .await
            .map_err(|source| self.io_error(source))?;

        let mut bytes_read: u64 = 0;
        for part_number in 1..=parts_total {
            // Never reserve more than what is left of the declared size.
            let expected = self
                .chunk_size
                .min(self.file_size.saturating_sub(bytes_read));
            let mut chunk = Vec::with_capacity(usize::try_from(expected).unwrap_or(0));
            (&mut file)
                .take(self.chunk_size)
                .read_to_end(&mut chunk)
                .await
                .map_err(|source| self.io_error(source))?;

            bytes_read += chunk.len() as u64;
            if chunk.is_empty() {
                tracing::debug!(
                    upload_id = %upload_id,
                    part_number,
                    parts_total,
                    "Reached end of file before the last declared part"
                );
                break;
            }

            api.send_upload(upload_id, self.file_part(chunk, Some(part_number)))
                .await
                .map_err(|source| UploadError::PartTransfer {
                    file: self.file_path.clone(),
                    upload_id: upload_id.to_string(),
                    part_number: Some(part_number),
                    source,
                })?;

            self.parts_sent += 1;
            tracing::debug!(upload_id = %upload_id, part_number, parts_total, "Part sent");
        }
        Ok(())
    }

    async fn finalize(&mut self, api: &dyn UploadApi, upload_id: &str) -> Result<(), UploadError> {
        if self.mode.is_multi_part() {
            api.complete_upload(upload_id)
                .await
                .map_err(|source| UploadError::Finalize {
                    file: self.file_path.clone(),
                    upload_id: upload_id.to_string(),
                    source,
                })?;
            tracing::debug!(upload_id = %upload_id, parts_sent = self.parts_sent, "Multi-part upload completed");
        }
        self.state = SessionState::Finalized;
        Ok(())
    }

    fn file_part(&self, bytes: Vec<u8>, part_number: Option<u32>) -> FilePart {
        FilePart {
            filename: self.display_name.clone(),
            content_type: self.content_type.clone(),
            bytes,
            part_number,
        }
    }

    fn io_error(&self, source: std::io::Error) -> UploadError {
        UploadError::Io {
            file: self.file_path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::test_helpers::{sized_file, RecordingUploadApi};
    use crate::upload::UploadPhase;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn mode_is_fixed_at_creation() {
        let at_threshold = UploadSession::new("a.mp4", "a.mp4", "application/mp4", 20 * MIB);
        assert_eq!(at_threshold.mode(), UploadMode::SinglePart);
        assert_eq!(at_threshold.state(), SessionState::Created);
        assert_eq!(at_threshold.upload_id(), None);

        let over = UploadSession::new("b.mp4", "b.mp4", "application/mp4", 20 * MIB + 1);
        assert_eq!(over.mode(), UploadMode::MultiPart { parts_total: 3 });

        let quarter = UploadSession::new("c.mp4", "c.mp4", "application/mp4", 25 * MIB);
        assert_eq!(quarter.mode().parts_total(), Some(3));
        assert_eq!(quarter.chunk_size(), PART_SIZE_BYTES);
    }

    #[tokio::test]
    async fn single_part_sends_once_and_never_completes() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(&dir, "clip.mp4", 5 * MIB);
        let api = RecordingUploadApi::new();

        let mut session = UploadSession::new(&path, "clip.mp4", "application/mp4", 5 * MIB);
        let upload_id = session.run(&api).await.unwrap();

        assert_eq!(upload_id, "fu_1");
        assert_eq!(session.upload_id(), Some("fu_1"));
        assert!(session.state().is_terminal());
        assert_eq!(api.sent_parts(), vec![None]);
        assert_eq!(api.sent_lengths(), vec![(5 * MIB) as usize]);
        assert!(api.completes().is_empty());
        assert_eq!(session.parts_sent(), 0);
    }

    #[tokio::test]
    async fn multi_part_sends_ordered_parts_then_completes() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(&dir, "big.png", 25 * MIB);
        let api = RecordingUploadApi::new();

        let mut session = UploadSession::new(&path, "big.png", "image/png", 25 * MIB);
        session.run(&api).await.unwrap();

        assert_eq!(api.sent_parts(), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(
            api.sent_lengths(),
            vec![(10 * MIB) as usize, (10 * MIB) as usize, (5 * MIB) as usize]
        );
        assert_eq!(api.completes(), vec!["fu_1".to_string()]);
        assert_eq!(session.parts_sent(), 3);
        assert_eq!(session.state(), SessionState::Finalized);
    }

    #[tokio::test]
    async fn part_failure_stops_transfer_without_complete() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(&dir, "big.png", 45 * MIB);
        let api = RecordingUploadApi::new();
        api.fail_send_at(2);

        let mut session = UploadSession::new(&path, "big.png", "image/png", 45 * MIB);
        let err = session.run(&api).await.unwrap_err();

        assert_eq!(err.phase(), UploadPhase::Transfer);
        assert_eq!(err.part_number(), Some(2));
        assert_eq!(err.upstream_status(), Some(500));
        assert_eq!(api.sent_parts(), vec![Some(1), Some(2)]);
        assert!(api.completes().is_empty());
        assert_eq!(session.parts_sent(), 1);
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.upload_id(), Some("fu_1"));
    }

    #[tokio::test]
    async fn create_failure_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(&dir, "clip.mp4", MIB);
        let api = RecordingUploadApi::new();
        api.fail_create(400);

        let mut session = UploadSession::new(&path, "clip.mp4", "application/mp4", MIB);
        let err = session.run(&api).await.unwrap_err();

        assert_eq!(err.phase(), UploadPhase::Create);
        assert_eq!(err.upstream_status(), Some(400));
        assert!(api.sent_parts().is_empty());
        assert_eq!(session.upload_id(), None);
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn finalize_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(&dir, "big.png", 21 * MIB);
        let api = RecordingUploadApi::new();
        api.fail_complete(409);

        let mut session = UploadSession::new(&path, "big.png", "image/png", 21 * MIB);
        let err = session.run(&api).await.unwrap_err();

        assert_eq!(err.phase(), UploadPhase::Finalize);
        assert_eq!(err.upstream_status(), Some(409));
        assert_eq!(api.sent_parts(), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn short_file_ends_transfer_early() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, b"abcdefghi").unwrap();
        let api = RecordingUploadApi::new();

        // Declared 20 bytes in 4-byte chunks, but only 9 bytes exist on disk.
        let mut session =
            UploadSession::with_limits(&path, "short.bin", "application/octet-stream", 20, 10, 4);
        assert_eq!(session.mode(), UploadMode::MultiPart { parts_total: 5 });
        session.run(&api).await.unwrap();

        assert_eq!(api.sent_parts(), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(api.sent_lengths(), vec![4, 4, 1]);
        assert_eq!(api.completes().len(), 1);
        assert_eq!(session.parts_sent(), 3);
        assert_eq!(session.state(), SessionState::Finalized);
    }

    #[tokio::test]
    async fn oversized_chunk_reads_only_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.bin");
        std::fs::write(&path, [7u8; 16]).unwrap();
        let api = RecordingUploadApi::new();

        let mut session = UploadSession::with_limits(
            &path,
            "small.bin",
            "application/octet-stream",
            16,
            4,
            u64::MAX / 2,
        );
        assert_eq!(session.mode(), UploadMode::MultiPart { parts_total: 1 });
        session.run(&api).await.unwrap();

        assert_eq!(api.sent_parts(), vec![Some(1)]);
        assert_eq!(api.sent_lengths(), vec![16]);
        assert_eq!(api.completes().len(), 1);
    }

    #[tokio::test]
    async fn missing_file_fails_after_session_is_opened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.mp4");
        let api = RecordingUploadApi::new();

        let mut session = UploadSession::new(&path, "gone.mp4", "application/mp4", 10);
        let err = session.run(&api).await.unwrap_err();

        assert_eq!(err.phase(), UploadPhase::Read);
        assert_eq!(api.creates().len(), 1);
        assert!(api.sent_parts().is_empty());
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn session_runs_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(&dir, "clip.mp4", 10);
        let api = RecordingUploadApi::new();

        let mut session = UploadSession::new(&path, "clip.mp4", "application/mp4", 10);
        session.run(&api).await.unwrap();
        let err = session.run(&api).await.unwrap_err();

        assert!(matches!(err, UploadError::AlreadyRun { .. }));
        assert_eq!(api.creates().len(), 1);
        assert_eq!(session.state(), SessionState::Finalized);
    }
}
