//! Extracted quotes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::source::SourceId;

/// A citable quote extracted from a transcript selection.
///
/// Immutable once created; removed from the owning store by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier, assigned by the owning store
    pub id: Uuid,

    /// Raw quoted text, no decorative quotation marks
    pub text: String,

    /// Formatted citation, e.g. `Jane Doe, (Jan 2024)`
    pub citation: String,

    /// Deep link into the source at the quote's timestamp.
    /// May be empty or the plain source URL if link generation failed.
    pub deep_link: String,

    /// Start time of the first selected token, in seconds
    pub timestamp: f64,

    /// Back-reference to the source (not an ownership link)
    pub source_id: SourceId,

    /// The text as selected, identical to `text`
    pub selected_text: String,

    /// When the quote was created
    pub created_at: DateTime<Utc>,
}

/// A fully assembled quote awaiting an id from the owning store
#[derive(Debug, Clone)]
pub struct QuoteDraft {
    pub text: String,
    pub citation: String,
    pub deep_link: String,
    pub timestamp: f64,
    pub source_id: SourceId,
    pub selected_text: String,
}

impl QuoteDraft {
    /// Finalize the draft with a store-assigned id
    pub fn with_id(self, id: Uuid) -> Quote {
        Quote {
            id,
            text: self.text,
            citation: self.citation,
            deep_link: self.deep_link,
            timestamp: self.timestamp,
            source_id: self.source_id,
            selected_text: self.selected_text,
            created_at: Utc::now(),
        }
    }
}
