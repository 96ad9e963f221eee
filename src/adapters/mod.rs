//! Adapter interfaces for external systems.
//!
//! The pipeline and quote assembly only ever see these traits; concrete
//! implementations (yt-dlp, the Whisper API, YouTube deep links, text
//! export) live alongside them and can be swapped for fakes in tests.

pub mod export;
pub mod whisper;
pub mod youtube;
pub mod ytdlp;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Quote, Transcription, VideoMetadata};

// Re-export the shipped implementations
pub use export::TextExporter;
pub use whisper::WhisperTranscriber;
pub use youtube::{extract_video_id, is_youtube_url, YouTubeDeepLink};
pub use ytdlp::YtDlpFetcher;

/// Fetches video metadata for a URL.
///
/// Fails with a descriptive error on network, subprocess, or parse
/// failure; the pipeline turns that into the source's error message.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Human-readable fetcher name
    fn name(&self) -> &str;

    /// Fetch metadata for the given URL
    async fn fetch(&self, url: &str) -> Result<VideoMetadata>;
}

/// Produces a word-level transcription for a URL.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Human-readable transcriber name
    fn name(&self) -> &str;

    /// Transcribe the audio behind `url` using the given API credential
    async fn transcribe(&self, url: &str, credential: &str) -> Result<Transcription>;
}

/// Looks up the transcription-service API credential.
///
/// `None` means no credential is configured; the pipeline fails the
/// source with a credential-missing error without calling the
/// transcriber.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credential(&self) -> Result<Option<String>>;
}

/// Builds a deep link into a source at a timestamp.
///
/// Best-effort: a failure here is absorbed by quote assembly and never
/// blocks quote creation.
pub trait DeepLinker: Send + Sync {
    fn generate(&self, url: &str, timestamp: f64) -> Result<String>;
}

/// Renders a set of quotes for export.
///
/// The core never depends on any particular destination; implementations
/// decide the format (plain text, clipboard payloads, documents).
pub trait QuoteExporter: Send + Sync {
    fn export(&self, quotes: &[Quote]) -> Result<String>;
}
