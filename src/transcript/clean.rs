//! Transcript cleaning and sentence grouping.
//!
//! Raw transcription output carries disfluencies ("um", "uh"), pause
//! annotations ("[pause]", "..."), and stray artifacts. Cleaning drops
//! them so the remaining tokens read as prose. The operation is
//! deterministic and idempotent: cleaning an already-clean sequence is a
//! no-op.

use crate::domain::TranscriptToken;

/// Disfluencies and verbal tics removed during cleaning.
/// Matched against the trimmed, lowercased token text.
const FILLER_WORDS: &[&str] = &[
    "um", "uh", "er", "ah", "hmm", "mm", "mhm", "yeah", "like", "you know",
    "so", "well", "okay", "right", "actually", "basically",
];

/// Pause annotations stripped from token text (matched case-insensitively)
const PAUSE_MARKERS: &[&str] = &["[pause]", "[silence]", "..."];

/// A group ends at this many tokens even without closing punctuation,
/// to keep long unpunctuated runs readable.
const MAX_SENTENCE_TOKENS: usize = 20;

/// Clean a raw token sequence.
///
/// Strips pause markers from each token's text, then drops tokens that are
/// filler words, end up empty, or are single non-alphabetic characters.
/// Output order is the subsequence order of the input; input tokens are
/// never mutated.
pub fn clean(tokens: &[TranscriptToken]) -> Vec<TranscriptToken> {
    tokens
        .iter()
        .filter_map(|token| {
            let stripped = strip_pause_markers(&token.text);
            let text = stripped.trim();

            if text.is_empty() || is_filler(text) || is_artifact(text) {
                return None;
            }

            Some(TranscriptToken {
                text: text.to_string(),
                start: token.start,
                end: token.end,
                speaker: token.speaker.clone(),
            })
        })
        .collect()
}

/// Partition cleaned tokens into sentence groups.
///
/// A group ends when a token's text ends in `.`, `!`, or `?`, or when it
/// reaches [`MAX_SENTENCE_TOKENS`], whichever comes first. A trailing
/// partial group is emitted last. The groups partition the input exactly.
pub fn group_into_sentences(tokens: &[TranscriptToken]) -> Vec<Vec<TranscriptToken>> {
    let mut sentences = Vec::new();
    let mut current: Vec<TranscriptToken> = Vec::new();

    for token in tokens {
        current.push(token.clone());

        if ends_sentence(&token.text) || current.len() >= MAX_SENTENCE_TOKENS {
            sentences.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

fn is_filler(text: &str) -> bool {
    let lower = text.to_lowercase();
    FILLER_WORDS.contains(&lower.as_str())
}

/// Single non-alphabetic characters are transcription artifacts
fn is_artifact(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => !c.is_ascii_alphabetic(),
        _ => false,
    }
}

fn ends_sentence(text: &str) -> bool {
    text.ends_with(['.', '!', '?'])
}

/// Remove every pause-marker occurrence from the text, case-insensitively.
/// Markers are ASCII, so byte-wise comparison is safe.
fn strip_pause_markers(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    'scan: while i < bytes.len() {
        for marker in PAUSE_MARKERS {
            let m = marker.as_bytes();
            if bytes.len() - i >= m.len() && bytes[i..i + m.len()].eq_ignore_ascii_case(m) {
                i += m.len();
                continue 'scan;
            }
        }

        let Some(ch) = text[i..].chars().next() else {
            break;
        };
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, start: f64, end: f64) -> TranscriptToken {
        TranscriptToken::new(text, start, end)
    }

    fn texts(tokens: &[TranscriptToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_removes_filler_words() {
        let raw = vec![
            token("Hello", 0.0, 0.5),
            token("um", 0.5, 0.7),
            token("world", 0.7, 1.2),
            token("this", 1.2, 1.5),
            token("is", 1.5, 1.7),
            token("uh", 1.7, 1.9),
            token("amazing.", 1.9, 2.5),
        ];

        let cleaned = clean(&raw);
        let words = texts(&cleaned);

        assert!(!words.contains(&"um"));
        assert!(!words.contains(&"uh"));
        assert_eq!(words, vec!["Hello", "world", "this", "is", "amazing."]);
    }

    #[test]
    fn test_filler_matching_is_case_insensitive() {
        let raw = vec![token("Um", 0.0, 0.2), token("LIKE", 0.2, 0.4), token("fine", 0.4, 0.6)];
        assert_eq!(texts(&clean(&raw)), vec!["fine"]);
    }

    #[test]
    fn test_removes_pause_markers() {
        let raw = vec![
            token("[pause]", 0.0, 1.0),
            token("[Silence]", 1.0, 2.0),
            token("...", 2.0, 3.0),
            token("speech...", 3.0, 3.5),
        ];

        let cleaned = clean(&raw);
        assert_eq!(texts(&cleaned), vec!["speech"]);
    }

    #[test]
    fn test_drops_single_non_alphabetic_artifacts() {
        let raw = vec![
            token("&", 0.0, 0.1),
            token("7", 0.1, 0.2),
            token("a", 0.2, 0.3),
            token("I", 0.3, 0.4),
        ];

        // Single letters survive, everything else single-char does not
        assert_eq!(texts(&clean(&raw)), vec!["a", "I"]);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let raw = vec![
            token("Hello", 0.0, 0.5),
            token("um", 0.5, 0.7),
            token("world...", 0.7, 1.2),
            token("[pause]", 1.2, 1.4),
            token("great.", 1.4, 2.0),
        ];

        let once = clean(&raw);
        let twice = clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_never_increases_length() {
        let raw = vec![
            token("one", 0.0, 0.2),
            token("um", 0.2, 0.4),
            token("two", 0.4, 0.6),
        ];
        assert!(clean(&raw).len() <= raw.len());
    }

    #[test]
    fn test_clean_preserves_input() {
        let raw = vec![token("word...", 0.0, 0.5)];
        let _ = clean(&raw);
        assert_eq!(raw[0].text, "word...");
    }

    #[test]
    fn test_groups_on_punctuation() {
        let raw = vec![
            token("Hello", 0.0, 0.5),
            token("world.", 0.5, 1.0),
            token("Next", 1.0, 1.5),
            token("sentence!", 1.5, 2.0),
            token("Trailing", 2.0, 2.5),
        ];

        let sentences = group_into_sentences(&raw);
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].len(), 2);
        assert_eq!(sentences[1].len(), 2);
        assert_eq!(sentences[2].len(), 1);
    }

    #[test]
    fn test_groups_cap_at_twenty_tokens() {
        let raw: Vec<_> = (0..45)
            .map(|i| token("word", i as f64, i as f64 + 1.0))
            .collect();

        let sentences = group_into_sentences(&raw);
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].len(), 20);
        assert_eq!(sentences[1].len(), 20);
        assert_eq!(sentences[2].len(), 5);
    }

    #[test]
    fn test_groups_partition_exactly() {
        let raw = vec![
            token("One", 0.0, 0.5),
            token("two.", 0.5, 1.0),
            token("Three", 1.0, 1.5),
            token("four", 1.5, 2.0),
        ];

        let sentences = group_into_sentences(&raw);
        let flattened: Vec<_> = sentences.into_iter().flatten().collect();
        assert_eq!(flattened, raw);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(group_into_sentences(&[]).is_empty());
        assert!(clean(&[]).is_empty());
    }
}
