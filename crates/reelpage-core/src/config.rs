//! Configuration module
//!
//! Everything the API client, the media retriever and telemetry need is read
//! once from the environment (a `.env` file is honoured) into an explicit
//! `Config` value that is passed to the components that use it.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

// Common constants
const NOTION_VERSION: &str = "2022-06-28";
const NOTION_API_URL: &str = "https://api.notion.com/v1";
const PROCESSED_PROPERTY: &str = "処理済";
const URL_PROPERTY: &str = "URL";
const DOWNLOAD_DIR: &str = "~/Downloads";
const LOG_DIR: &str = "~/Downloads";
const LOG_FILE_PREFIX: &str = "reelpage-log";
const YTDLP_PATH: &str = "yt-dlp";
const YTDLP_FORMAT: &str = "bv[ext=mp4]+ba[ext=m4a]/bv+ba/best[ext=mp4]/best";
const HTTP_TIMEOUT_SECS: u64 = 300;

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Integration token sent as `Authorization: Bearer ...`.
    pub notion_token: String,
    /// Database holding the work items. Only needed by the sync loop.
    pub database_id: Option<String>,
    /// Value of the pinned `Notion-Version` header.
    pub notion_version: String,
    pub api_base_url: String,
    /// Checkbox property marking an item as processed.
    pub processed_property: String,
    /// URL property holding the media link.
    pub url_property: String,
    pub download_dir: PathBuf,
    /// Directory for the daily log file. `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
    pub log_file_prefix: String,
    pub ytdlp_path: String,
    pub ytdlp_format: String,
    pub http_timeout_secs: u64,
    pub environment: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("notion_token", &"[REDACTED]")
            .field("database_id", &self.database_id)
            .field("notion_version", &self.notion_version)
            .field("api_base_url", &self.api_base_url)
            .field("processed_property", &self.processed_property)
            .field("url_property", &self.url_property)
            .field("download_dir", &self.download_dir)
            .field("log_dir", &self.log_dir)
            .field("log_file_prefix", &self.log_file_prefix)
            .field("ytdlp_path", &self.ytdlp_path)
            .field("ytdlp_format", &self.ytdlp_format)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("environment", &self.environment)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let notion_token = var("NOTION_TOKEN")
            .ok_or_else(|| anyhow::anyhow!("NOTION_TOKEN must be set to call the Notion API"))?;

        // An explicitly empty LOG_DIR disables the log file.
        let log_dir = match lookup("LOG_DIR") {
            Some(dir) if dir.trim().is_empty() => None,
            Some(dir) => Some(expand_home(&dir)),
            None => Some(expand_home(LOG_DIR)),
        };

        let config = Config {
            notion_token,
            database_id: var("NOTION_DATABASE_ID"),
            notion_version: var("NOTION_VERSION").unwrap_or_else(|| NOTION_VERSION.to_string()),
            api_base_url: var("NOTION_API_URL")
                .unwrap_or_else(|| NOTION_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            processed_property: var("PROCESSED_PROPERTY")
                .unwrap_or_else(|| PROCESSED_PROPERTY.to_string()),
            url_property: var("URL_PROPERTY").unwrap_or_else(|| URL_PROPERTY.to_string()),
            download_dir: expand_home(&var("DOWNLOAD_DIR").unwrap_or_else(|| DOWNLOAD_DIR.to_string())),
            log_dir,
            log_file_prefix: var("LOG_FILE_PREFIX")
                .unwrap_or_else(|| LOG_FILE_PREFIX.to_string()),
            ytdlp_path: var("YTDLP_PATH").unwrap_or_else(|| YTDLP_PATH.to_string()),
            ytdlp_format: var("YTDLP_FORMAT").unwrap_or_else(|| YTDLP_FORMAT.to_string()),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(HTTP_TIMEOUT_SECS),
            environment: var("ENVIRONMENT")
                .or_else(|| var("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "NOTION_API_URL must be an http(s) URL, got {}",
                self.api_base_url
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("HTTP_TIMEOUT_SECS must be greater than 0"));
        }

        if self.processed_property.trim().is_empty() || self.url_property.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "PROCESSED_PROPERTY and URL_PROPERTY must not be empty"
            ));
        }

        Ok(())
    }

    /// Database ID, required by the commands that query the database.
    pub fn require_database_id(&self) -> Result<&str, anyhow::Error> {
        self.database_id
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("NOTION_DATABASE_ID must be set to query pending items"))
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.to_lowercase().as_str(), "production" | "prod")
    }
}

/// Expand a leading `~` to the current user's home directory.
fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => Path::new(path).to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_lookup(lookup_from(&[("NOTION_TOKEN", "secret_abc")])).unwrap();
        assert_eq!(config.notion_token, "secret_abc");
        assert_eq!(config.notion_version, "2022-06-28");
        assert_eq!(config.api_base_url, "https://api.notion.com/v1");
        assert_eq!(config.processed_property, "処理済");
        assert_eq!(config.url_property, "URL");
        assert_eq!(config.ytdlp_path, "yt-dlp");
        assert_eq!(config.http_timeout_secs, 300);
        assert_eq!(config.log_file_prefix, "reelpage-log");
        assert!(config.database_id.is_none());
        assert!(config.log_dir.is_some());
        assert!(!config.is_production());
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("NOTION_TOKEN"));

        let err = Config::from_lookup(lookup_from(&[("NOTION_TOKEN", "  ")])).unwrap_err();
        assert!(err.to_string().contains("NOTION_TOKEN"));
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("NOTION_TOKEN", "t"),
            ("NOTION_DATABASE_ID", "db-1"),
            ("NOTION_API_URL", "http://127.0.0.1:9999/v1/"),
            ("NOTION_VERSION", "2025-09-03"),
            ("DOWNLOAD_DIR", "/var/media"),
            ("LOG_DIR", "/var/log/reelpage"),
            ("HTTP_TIMEOUT_SECS", "12"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();
        assert_eq!(config.require_database_id().unwrap(), "db-1");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999/v1");
        assert_eq!(config.notion_version, "2025-09-03");
        assert_eq!(config.download_dir, PathBuf::from("/var/media"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/reelpage")));
        assert_eq!(config.http_timeout_secs, 12);
        assert!(config.is_production());
    }

    #[test]
    fn empty_log_dir_disables_file_logging() {
        let config =
            Config::from_lookup(lookup_from(&[("NOTION_TOKEN", "t"), ("LOG_DIR", "")])).unwrap();
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn unparsable_timeout_falls_back_to_default() {
        let config = Config::from_lookup(lookup_from(&[
            ("NOTION_TOKEN", "t"),
            ("HTTP_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap();
        assert_eq!(config.http_timeout_secs, 300);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = Config::from_lookup(lookup_from(&[
            ("NOTION_TOKEN", "t"),
            ("NOTION_API_URL", "ftp://example.com"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("NOTION_API_URL"));

        let err = Config::from_lookup(lookup_from(&[
            ("NOTION_TOKEN", "t"),
            ("HTTP_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
    }

    #[test]
    fn missing_database_id_is_reported_on_use() {
        let config = Config::from_lookup(lookup_from(&[("NOTION_TOKEN", "t")])).unwrap();
        assert!(config.require_database_id().is_err());
    }

    #[test]
    fn debug_redacts_token() {
        let config =
            Config::from_lookup(lookup_from(&[("NOTION_TOKEN", "secret_placeholder")])).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret_placeholder"));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/Downloads"), home.join("Downloads"));
            assert_eq!(expand_home("~"), home.join(""));
        }
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("~user/x"), PathBuf::from("~user/x"));
    }
}
