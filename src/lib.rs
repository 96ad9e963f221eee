//! quotify - Turn spoken-word video into citable quotes
//!
//! For each added video, an asynchronous pipeline acquires metadata and
//! a word-level transcript through external services while tracking
//! multi-stage progress. Pure transforms then clean the transcript and
//! group it into sentences, playback time resolves to an active token,
//! a drag-selection engine captures token ranges, and a deterministic
//! assembler turns a selection into a formatted, time-stamped quote.
//!
//! # Modules
//!
//! - `adapters`: External collaborators (yt-dlp, Whisper API, deep links, export)
//! - `pipeline`: Per-source acquisition state machine
//! - `transcript`: Cleaning, sentence grouping, active-token resolution
//! - `selection`: Pointer-drag token selection
//! - `quote`: Citation formatting and quote assembly
//! - `store`: Owning collections for sources and quotes
//! - `domain`: Data structures (VideoSource, TranscriptToken, Quote)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Add a video and acquire its transcript
//! quotify add "https://www.youtube.com/watch?v=..."
//!
//! # Inspect the cleaned transcript with token indices
//! quotify show <source-id> --transcript
//!
//! # Extract a quote from tokens 12 through 24
//! quotify extract <source-id> --from 12 --to 24
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod pipeline;
pub mod quote;
pub mod selection;
pub mod store;
pub mod transcript;

// Re-export main types at crate root for convenience
pub use config::Settings;
pub use domain::{
    Quote, QuoteDraft, SourceId, SourceStatus, TranscriptToken, Transcription, VideoMetadata,
    VideoSource,
};
pub use pipeline::{PipelineError, SourcePipeline};
pub use quote::{assemble_quote, format_citation, DeepLinkFallback};
pub use selection::{
    DragOutcome, PointerPosition, SelectionEngine, SelectionRange, MIN_QUOTE_TOKENS,
};
pub use store::{QuoteStore, SourcePatch, SourceStore};
pub use transcript::{active_index, clean, group_into_sentences};
