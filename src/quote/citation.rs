//! Citation and timestamp rendering.

use chrono::{NaiveDate, Utc};

/// Format a citation string: `"{speaker_or_channel}, ({Mon YYYY})"`.
///
/// `publish_date` is the scraper's raw `YYYYMMDD` string. When it is too
/// short or does not parse into a plausible year/month, the current date
/// is used instead; a citation is always produced.
pub fn format_citation(speaker_or_channel: &str, publish_date: &str) -> String {
    format!("{}, ({})", speaker_or_channel, citation_date(publish_date))
}

/// Render `Mon YYYY` from a raw `YYYYMMDD` date, falling back to today
fn citation_date(raw: &str) -> String {
    if let Some(date) = parse_publish_date(raw) {
        return date.format("%b %Y").to_string();
    }

    Utc::now().format("%b %Y").to_string()
}

fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() < 8 {
        return None;
    }

    let year: i32 = raw.get(0..4)?.parse().ok()?;
    let month: u32 = raw.get(4..6)?.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Render seconds as `m:ss` for display
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
