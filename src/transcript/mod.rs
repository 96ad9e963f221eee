//! Transcript processing.
//!
//! Pure functions over token sequences: cleaning raw transcription output
//! into a readable token stream, grouping it into sentences, and resolving
//! which token is active at a given playback time. None of these mutate
//! their input; cleaning always produces a new sequence.

pub mod clean;
pub mod sync;

pub use clean::{clean, group_into_sentences};
pub use sync::active_index;
