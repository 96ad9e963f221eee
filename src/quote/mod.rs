//! Quote formatting and assembly.
//!
//! Turning a token selection into a persistable quote: citation
//! rendering, timestamp formatting, and draft assembly with deep-link
//! fallback handling.

pub mod assembler;
pub mod citation;

pub use assembler::{assemble_quote, DeepLinkFallback, QuoteError, UNKNOWN_SPEAKER};
pub use citation::{format_citation, format_timestamp};
