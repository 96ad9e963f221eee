//! Playback-time to token resolution.

use crate::domain::TranscriptToken;

/// Resolve which token is being spoken at `current_time`.
///
/// Token `i` is active when `start[i] <= current_time < effective_end[i]`,
/// where the effective end is the next token's start, or the token's own
/// declared `end` for the final token. The final token additionally stays
/// active for any `current_time >= start[last]` with no upper bound, so a
/// video playing past the end of speech keeps its last word highlighted.
///
/// Returns `None` for an empty sequence or a time before the first token.
/// At most one token is active: effective ends are exclusive and derived
/// from the next token's start, so intervals cannot overlap.
pub fn active_index(tokens: &[TranscriptToken], current_time: f64) -> Option<usize> {
    if tokens.is_empty() {
        return None;
    }

    for i in 0..tokens.len() {
        let effective_end = match tokens.get(i + 1) {
            Some(next) => next.start,
            None => tokens[i].end,
        };

        if current_time >= tokens[i].start && current_time < effective_end {
            return Some(i);
        }
    }

    let last = tokens.len() - 1;
    if current_time >= tokens[last].start {
        return Some(last);
    }

    None
}
