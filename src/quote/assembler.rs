//! Quote assembly from a token selection.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::adapters::DeepLinker;
use crate::domain::{QuoteDraft, SourceId, TranscriptToken, VideoMetadata};
use crate::selection::{SelectionRange, MIN_QUOTE_TOKENS};

use super::citation::format_citation;

/// Attribution used when neither a speaker label nor a channel is known
pub const UNKNOWN_SPEAKER: &str = "Unknown Speaker";

/// Errors from quote assembly
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("selection spans {got} tokens, need at least {min}")]
    SelectionTooShort { got: usize, min: usize },

    #[error("selection end {end} is past the transcript ({len} tokens)")]
    RangeOutOfBounds { end: usize, len: usize },
}

/// What to store as the deep link when link generation fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeepLinkFallback {
    /// Fall back to the plain source URL
    #[default]
    SourceUrl,

    /// Store an empty string
    Empty,
}

/// Assemble a quote draft from an inclusive selection over cleaned tokens.
///
/// The selected texts are joined with single spaces; no quotation marks
/// are embedded. The timestamp is the first selected token's start time.
/// Attribution prefers the first token's speaker label, then the channel,
/// then [`UNKNOWN_SPEAKER`]. A deep-link failure is absorbed via the
/// configured fallback; it never prevents quote creation. The returned
/// draft has no id; the owning quote store assigns one.
pub fn assemble_quote(
    range: SelectionRange,
    tokens: &[TranscriptToken],
    metadata: &VideoMetadata,
    source_id: SourceId,
    deep_linker: &dyn DeepLinker,
    fallback: DeepLinkFallback,
) -> Result<QuoteDraft, QuoteError> {
    if range.token_count() < MIN_QUOTE_TOKENS {
        return Err(QuoteError::SelectionTooShort {
            got: range.token_count(),
            min: MIN_QUOTE_TOKENS,
        });
    }

    if range.end >= tokens.len() {
        return Err(QuoteError::RangeOutOfBounds {
            end: range.end,
            len: tokens.len(),
        });
    }

    let selected = &tokens[range.start..=range.end];
    let text = selected
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let timestamp = selected[0].start;

    let speaker = match selected[0].speaker.as_deref() {
        Some(label) => label,
        None if !metadata.channel.is_empty() => metadata.channel.as_str(),
        None => UNKNOWN_SPEAKER,
    };

    let citation = format_citation(speaker, &metadata.publish_date);

    let deep_link = match deep_linker.generate(&metadata.url, timestamp) {
        Ok(link) => link,
        Err(e) => {
            warn!(url = %metadata.url, error = %e, "Deep link generation failed");
            match fallback {
                DeepLinkFallback::SourceUrl => metadata.url.clone(),
                DeepLinkFallback::Empty => String::new(),
            }
        }
    };

    Ok(QuoteDraft {
        selected_text: text.clone(),
        text,
        citation,
        deep_link,
        timestamp,
        source_id,
    })
}
