//! Plain-text quote export.

use anyhow::Result;

use super::QuoteExporter;
use crate::domain::Quote;

/// Renders quotes as text blocks: curly-quoted text, citation, deep link,
/// separated by blank lines. The stored quote text itself stays unquoted;
/// the marks exist only in the export.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExporter;

impl QuoteExporter for TextExporter {
    fn export(&self, quotes: &[Quote]) -> Result<String> {
        let blocks: Vec<String> = quotes
            .iter()
            .map(|quote| {
                format!(
                    "\u{201C}{}\u{201D} {} {}",
                    quote.text, quote.citation, quote.deep_link
                )
                .trim_end()
                .to_string()
            })
            .collect();

        Ok(blocks.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QuoteDraft, SourceId};
    use uuid::Uuid;

    fn quote(text: &str, citation: &str, deep_link: &str) -> Quote {
        QuoteDraft {
            text: text.to_string(),
            citation: citation.to_string(),
            deep_link: deep_link.to_string(),
            timestamp: 1.0,
            source_id: SourceId::from_url("https://youtu.be/abc"),
            selected_text: text.to_string(),
        }
        .with_id(Uuid::new_v4())
    }

    #[test]
    fn test_export_single_quote() {
        let quotes = vec![quote(
            "world this is",
            "Test Channel, (Jan 2024)",
            "https://youtu.be/abc?t=0",
        )];

        let text = TextExporter.export(&quotes).unwrap();
        assert_eq!(
            text,
            "\u{201C}world this is\u{201D} Test Channel, (Jan 2024) https://youtu.be/abc?t=0"
        );
    }

    #[test]
    fn test_export_separates_with_blank_lines() {
        let quotes = vec![
            quote("one two three", "A, (Jan 2024)", ""),
            quote("four five six", "B, (Feb 2024)", ""),
        ];

        let text = TextExporter.export(&quotes).unwrap();
        assert_eq!(text.matches("\n\n").count(), 1);
        // Empty deep links leave no trailing whitespace
        assert!(!text.contains(") \n"));
    }

    #[test]
    fn test_export_empty_set() {
        assert_eq!(TextExporter.export(&[]).unwrap(), "");
    }
}
