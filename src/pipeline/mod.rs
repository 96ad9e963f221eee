//! Source acquisition pipeline.
//!
//! Drives each source through metadata fetch and transcription,
//! publishing every transition to the owning source store.

pub mod runner;

use thiserror::Error;

pub use runner::{SourcePipeline, TriggerError};

/// Terminal failures for a single source.
///
/// Each of these stops the pipeline for the affected source and becomes
/// its stored error message; other sources are unaffected. There is no
/// automatic retry; the source must be reset to pending.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Metadata fetch failed: {0}")]
    FetchMetadataFailed(String),

    #[error("Transcription API key not configured. Set it with `quotify config set-key`.")]
    CredentialMissing,

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),
}
