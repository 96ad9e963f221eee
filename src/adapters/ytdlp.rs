//! yt-dlp metadata fetcher.
//!
//! Shells out to the yt-dlp binary in JSON-dump mode; no media is
//! downloaded for metadata.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tokio::time::timeout;

use super::{is_youtube_url, MetadataFetcher};
use crate::domain::VideoMetadata;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Fields of interest from `yt-dlp --dump-json`
#[derive(Debug, Deserialize)]
struct RawVideoInfo {
    title: Option<String>,
    #[serde(default)]
    uploader: String,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    upload_date: String,
    #[serde(default)]
    view_count: i64,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    webpage_url: String,
}

/// Metadata fetcher backed by the yt-dlp CLI
pub struct YtDlpFetcher {
    /// Path to the yt-dlp binary (default: "yt-dlp")
    binary_path: String,

    /// How long a single dump may take
    fetch_timeout: Duration,
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpFetcher {
    /// Create a fetcher with the default binary path
    pub fn new() -> Self {
        Self {
            binary_path: "yt-dlp".to_string(),
            fetch_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a fetcher with a custom binary path
    pub fn with_binary_path(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            fetch_timeout: DEFAULT_TIMEOUT,
        }
    }

    async fn dump_json(&self, url: &str) -> Result<String> {
        let output = timeout(
            self.fetch_timeout,
            Command::new(&self.binary_path)
                .args(["--dump-json", "--no-download", url])
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await
        .with_context(|| format!("yt-dlp timed out after {:?}", self.fetch_timeout))?
        .with_context(|| {
            format!(
                "Failed to run {}. Make sure yt-dlp is installed.",
                self.binary_path
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", stderr.trim());
        }

        let stdout = String::from_utf8(output.stdout).context("yt-dlp output is not valid UTF-8")?;

        if stdout.trim().is_empty() {
            anyhow::bail!("yt-dlp returned an empty response");
        }

        Ok(stdout)
    }
}

#[async_trait]
impl MetadataFetcher for YtDlpFetcher {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn fetch(&self, url: &str) -> Result<VideoMetadata> {
        if !is_youtube_url(url) {
            anyhow::bail!("Only YouTube URLs are supported: {}", url);
        }

        let json = self.dump_json(url).await?;
        let info: RawVideoInfo =
            serde_json::from_str(&json).context("Failed to parse yt-dlp output")?;

        let title = info
            .title
            .filter(|t| !t.is_empty())
            .context("Invalid video data: missing title")?;

        Ok(VideoMetadata {
            title,
            channel: if info.uploader.is_empty() {
                "Unknown Channel".to_string()
            } else {
                info.uploader
            },
            duration: info.duration as i64,
            publish_date: info.upload_date,
            views: info.view_count,
            thumbnail: info.thumbnail,
            url: if info.webpage_url.is_empty() {
                url.to_string()
            } else {
                info.webpage_url
            },
        })
    }
}
