//! Video sources and their acquisition lifecycle.
//!
//! A VideoSource moves through a fixed sequence of states while the
//! pipeline acquires its metadata and transcript. The current state is
//! only ever changed through the owning `SourceStore`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::transcript::Transcription;

/// Source identifier (SHA256(url)[0:16])
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    /// Create a source ID from a URL
    pub fn from_url(url: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let result = hasher.finalize();

        // Take first 8 bytes (16 hex chars)
        Self(hex::encode(&result[..8]))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    /// Added, not yet picked up by the pipeline
    Pending,

    /// Metadata is being fetched
    Metadata,

    /// Audio is being transcribed
    Transcribing,

    /// Metadata and transcript are both present
    Completed,

    /// A stage failed; see the source's error message
    Error,
}

impl SourceStatus {
    /// Check if the pipeline has finished with this source
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Metadata => "metadata",
            Self::Transcribing => "transcribing",
            Self::Completed => "completed",
            Self::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Metadata for a video, produced once by the metadata fetch.
///
/// `publish_date` is the raw 8-digit `YYYYMMDD` string reported by the
/// scraper; it may be empty or malformed and consumers must tolerate that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title
    pub title: String,

    /// Channel or uploader name
    pub channel: String,

    /// Duration in seconds
    pub duration: i64,

    /// Raw publish date (`YYYYMMDD`, possibly empty)
    pub publish_date: String,

    /// View count
    pub views: i64,

    /// Thumbnail URL
    pub thumbnail: String,

    /// Canonical URL
    pub url: String,
}

/// A video source being driven through the acquisition pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSource {
    /// Stable identifier, derived from the URL at creation
    pub id: SourceId,

    /// URL as entered by the user
    pub url: String,

    /// Current lifecycle state
    pub status: SourceStatus,

    /// Acquisition progress, 0-100. Monotone while not in error;
    /// resets only when the source returns to pending.
    pub progress: u8,

    /// Fetched metadata (present from the metadata stage onward)
    pub metadata: Option<VideoMetadata>,

    /// Transcription result (present once completed)
    pub transcript: Option<Transcription>,

    /// Error message when status is `Error`
    pub error: Option<String>,

    /// When the source was added
    pub added_at: DateTime<Utc>,
}

impl VideoSource {
    /// Create a new pending source for a URL
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: SourceId::from_url(&url),
            url,
            status: SourceStatus::Pending,
            progress: 0,
            metadata: None,
            transcript: None,
            error: None,
            added_at: Utc::now(),
        }
    }

    /// Check if the source is waiting for a pipeline run
    pub fn is_pending(&self) -> bool {
        self.status == SourceStatus::Pending
    }

    /// Check if the source finished successfully
    pub fn is_completed(&self) -> bool {
        self.status == SourceStatus::Completed
    }

    /// Display title: metadata title if fetched, else the URL
    pub fn display_title(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.title.as_str())
            .unwrap_or(&self.url)
    }
}
