//! Domain types for quotify.
//!
//! This module contains the core data structures:
//! - Source: A video source and its acquisition lifecycle
//! - Transcript: Time-aligned transcription tokens
//! - Quote: An extracted, citable quote

pub mod quote;
pub mod source;
pub mod transcript;

// Re-export commonly used types
pub use quote::{Quote, QuoteDraft};
pub use source::{SourceId, SourceStatus, VideoMetadata, VideoSource};
pub use transcript::{TranscriptToken, Transcription};
