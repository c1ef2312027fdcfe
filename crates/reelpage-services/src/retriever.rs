//! Media retrieval: turns a URL into a downloaded video, its title and thumbnail.

use async_trait::async_trait;
use reelpage_core::{AppError, AppResult, Config, VideoInfo};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Resolves a media URL into local files.
#[async_trait]
pub trait MediaRetriever: Send + Sync {
    async fn fetch(&self, url: &str) -> AppResult<VideoInfo>;
}

/// [`MediaRetriever`] that shells out to yt-dlp.
#[derive(Debug, Clone)]
pub struct YtDlpRetriever {
    program: String,
    download_dir: PathBuf,
    format: String,
}

impl YtDlpRetriever {
    pub fn new(
        program: impl Into<String>,
        download_dir: impl Into<PathBuf>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            download_dir: download_dir.into(),
            format: format.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.ytdlp_path.clone(),
            config.download_dir.clone(),
            config.ytdlp_format.clone(),
        )
    }

    /// Arguments for one download. The final info dict is printed as JSON
    /// once the file has been moved into place.
    fn args(&self, url: &str) -> Vec<String> {
        let template = self.download_dir.join("%(title)s_%(id)s.%(ext)s");
        vec![
            "--no-playlist".to_string(),
            "--write-thumbnail".to_string(),
            "-f".to_string(),
            self.format.clone(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            "--print".to_string(),
            "after_move:%()j".to_string(),
            url.to_string(),
        ]
    }
}

#[async_trait]
impl MediaRetriever for YtDlpRetriever {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> AppResult<VideoInfo> {
        tokio::fs::create_dir_all(&self.download_dir).await?;

        let output = Command::new(&self.program)
            .args(self.args(url))
            .output()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to execute {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(AppError::Retrieval(format!(
                "{} failed for {}: {}",
                self.program,
                url,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let info = parse_download_info(&String::from_utf8_lossy(&output.stdout))?;
        tracing::info!(
            title = %info.title,
            video = %info.video_path.display(),
            thumbnail = ?info.thumbnail_path,
            "Download finished"
        );
        Ok(info)
    }
}

/// Parse the info JSON printed by yt-dlp. The last non-empty line wins.
pub fn parse_download_info(stdout: &str) -> AppResult<VideoInfo> {
    let line = stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| AppError::Retrieval("Downloader printed no info".to_string()))?;

    let info: JsonValue = serde_json::from_str(line.trim())?;

    let title = info["title"]
        .as_str()
        .ok_or_else(|| AppError::Retrieval("Downloader info has no title".to_string()))?
        .to_string();

    let video_path = info["filepath"]
        .as_str()
        .or_else(|| info["_filename"].as_str())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| AppError::Retrieval(format!("No downloaded file for {}", title)))?;

    let thumbnail_path = info["thumbnails"]
        .as_array()
        .into_iter()
        .flatten()
        .rev()
        .find_map(|thumb| thumb["filepath"].as_str())
        .map(PathBuf::from);

    Ok(VideoInfo {
        title,
        video_path,
        thumbnail_path,
    })
}

/// Rename a thumbnail saved with an `.image` extension to `.jpg`.
///
/// Returns the path to upload; other paths are returned unchanged.
pub async fn normalize_thumbnail_extension(path: &Path) -> AppResult<PathBuf> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("image") {
        return Ok(path.to_path_buf());
    }
    let renamed = path.with_extension("jpg");
    tokio::fs::rename(path, &renamed).await?;
    tracing::info!(
        from = %path.display(),
        to = %renamed.display(),
        "Renamed thumbnail extension"
    );
    Ok(renamed)
}
