//! Time-aligned transcript tokens.

use serde::{Deserialize, Serialize};

/// A single transcribed word with timing and an optional speaker label.
///
/// `start` is inclusive; `end` is an exclusive upper bound used only as a
/// fallback when there is no following token. Sequences are ordered by
/// `start` ascending and transforms must preserve that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptToken {
    /// Transcribed text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Speaker label, if diarization assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl TranscriptToken {
    /// Create an unattributed token
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            speaker: None,
        }
    }

    /// Attach a speaker label
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }
}

/// Result of a transcription call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    /// Word-level tokens, ordered by start time
    pub tokens: Vec<TranscriptToken>,

    /// Full transcript text as returned by the service
    pub full_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_builder() {
        let token = TranscriptToken::new("hello", 0.0, 0.5).with_speaker("Speaker 1");
        assert_eq!(token.text, "hello");
        assert_eq!(token.speaker.as_deref(), Some("Speaker 1"));
    }

    #[test]
    fn test_speaker_omitted_from_json() {
        let token = TranscriptToken::new("hello", 0.0, 0.5);
        let json = serde_json::to_string(&token).unwrap();
        assert!(!json.contains("speaker"));

        let parsed: TranscriptToken = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, token);
    }
}
