//! Whisper transcription backend.
//!
//! Downloads the source audio with yt-dlp, posts it to the OpenAI
//! transcription endpoint for word-level timings, then applies a
//! pause-based speaker labeling heuristic. The service itself does no
//! diarization at word granularity.

use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

use super::{is_youtube_url, Transcriber};
use crate::domain::{TranscriptToken, Transcription};

const OPENAI_TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// A silence longer than this between words suggests a speaker change
const SPEAKER_CHANGE_PAUSE_SECS: f64 = 2.0;

/// Words that open a question, used to tag the interviewer
const QUESTION_OPENERS: &[&str] = &["what", "how", "why", "when", "where"];

/// Whisper verbose_json response
#[derive(Debug, Deserialize)]
struct WhisperResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    words: Vec<WhisperWord>,
}

#[derive(Debug, Deserialize)]
struct WhisperWord {
    #[serde(default)]
    word: String,
    #[serde(default)]
    start: f64,
    #[serde(default)]
    end: f64,
}

/// Transcriber backed by yt-dlp audio extraction + the OpenAI Whisper API
pub struct WhisperTranscriber {
    client: reqwest::Client,
    api_url: String,
    ytdlp_path: String,
}

impl Default for WhisperTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl WhisperTranscriber {
    /// Create a transcriber against the public OpenAI endpoint
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: OPENAI_TRANSCRIPTION_URL.to_string(),
            ytdlp_path: "yt-dlp".to_string(),
        }
    }

    /// Point at a different endpoint (compatible proxies, test servers)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Use a custom yt-dlp binary path
    pub fn with_ytdlp_path(mut self, path: impl Into<String>) -> Self {
        self.ytdlp_path = path.into();
        self
    }

    /// Extract the source audio to a temp file
    async fn download_audio(&self, url: &str) -> Result<NamedTempFile> {
        let audio_file = tempfile::Builder::new()
            .suffix(".mp3")
            .tempfile()
            .context("Failed to create temp audio file")?;

        let output = Command::new(&self.ytdlp_path)
            .args([
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "192",
                "--output",
            ])
            .arg(audio_file.path())
            .arg(url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| {
                format!(
                    "Failed to run {}. Make sure yt-dlp is installed.",
                    self.ytdlp_path
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp audio extraction failed: {}", stderr.trim());
        }

        Ok(audio_file)
    }

    async fn request_transcription(
        &self,
        audio_bytes: Vec<u8>,
        credential: &str,
    ) -> Result<WhisperResponse> {
        let file_part = reqwest::multipart::Part::bytes(audio_bytes)
            .file_name("audio.mp3")
            .mime_str("audio/mpeg")
            .context("Failed to build audio upload")?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", "whisper-1")
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(credential)
            .multipart(form)
            .send()
            .await
            .context("Failed to reach the transcription service")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            // Gateway timeouts usually mean the upstream job is still running
            if matches!(status.as_u16(), 502 | 503 | 504) {
                anyhow::bail!(
                    "Transcription service timeout ({}). The transcript may still be processing.",
                    status.as_u16()
                );
            }

            anyhow::bail!("Transcription service error ({}): {}", status.as_u16(), body);
        }

        response
            .json::<WhisperResponse>()
            .await
            .context("Failed to parse transcription response")
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    fn name(&self) -> &str {
        "whisper"
    }

    async fn transcribe(&self, url: &str, credential: &str) -> Result<Transcription> {
        if credential.is_empty() {
            anyhow::bail!("Transcription API key is required");
        }
        if !is_youtube_url(url) {
            anyhow::bail!("Only YouTube URLs are supported: {}", url);
        }

        let audio_file = self.download_audio(url).await?;
        let audio_bytes = tokio::fs::read(audio_file.path())
            .await
            .context("Failed to read extracted audio")?;
        debug!(bytes = audio_bytes.len(), "Uploading audio for transcription");

        let response = self.request_transcription(audio_bytes, credential).await?;

        let mut tokens: Vec<TranscriptToken> = response
            .words
            .into_iter()
            .map(|w| TranscriptToken::new(w.word.trim(), w.start, w.end))
            .filter(|t| !t.text.is_empty())
            .collect();

        label_speakers(&mut tokens);

        Ok(Transcription {
            tokens,
            full_text: response.text,
        })
    }
}

/// Assign a speaker label to every token.
///
/// A gap longer than [`SPEAKER_CHANGE_PAUSE_SECS`] alternates between
/// "Speaker 1" and "Speaker 2"; a question opener right after a sentence
/// boundary is attributed to "Interviewer".
fn label_speakers(tokens: &mut [TranscriptToken]) {
    if tokens.is_empty() {
        return;
    }

    let mut current = "Speaker 1";
    let mut switches: u32 = 1;

    for i in 0..tokens.len() {
        if i > 0 {
            let pause = tokens[i].start - tokens[i - 1].end;
            if pause > SPEAKER_CHANGE_PAUSE_SECS {
                switches += 1;
                current = if switches % 2 == 1 {
                    "Speaker 1"
                } else {
                    "Speaker 2"
                };
            }

            let lower = tokens[i].text.to_lowercase();
            let opens_question = QUESTION_OPENERS.iter().any(|q| lower.starts_with(q))
                || lower.contains('?');
            if opens_question && tokens[i - 1].text.ends_with('.') {
                current = "Interviewer";
            }
        }

        tokens[i].speaker = Some(current.to_string());
    }
}
