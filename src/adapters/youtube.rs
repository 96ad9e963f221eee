//! YouTube URL handling and deep links.

use anyhow::Result;

use super::DeepLinker;

/// Check whether a URL points at a YouTube video.
///
/// Accepts `youtube.com/watch?v=`, `youtu.be/`, and `youtube.com/embed/`
/// forms, with or without `www.`, over http or https.
pub fn is_youtube_url(url: &str) -> bool {
    let rest = match url.strip_prefix("https://").or_else(|| url.strip_prefix("http://")) {
        Some(rest) => rest,
        None => return false,
    };
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    if let Some(path) = rest.strip_prefix("youtube.com/") {
        return path.starts_with("watch?v=") || path.starts_with("embed/");
    }

    rest.strip_prefix("youtu.be/")
        .map(|id| !id.is_empty())
        .unwrap_or(false)
}

/// Extract the video id from any supported YouTube URL form
pub fn extract_video_id(url: &str) -> Option<&str> {
    let id = if let Some(pos) = url.find("v=") {
        let tail = &url[pos + 2..];
        tail.split(['&', '#', '?']).next()
    } else if let Some(pos) = url.find("youtu.be/") {
        let tail = &url[pos + 9..];
        tail.split(['&', '#', '?']).next()
    } else if let Some(pos) = url.find("embed/") {
        let tail = &url[pos + 6..];
        tail.split(['&', '#', '?']).next()
    } else {
        None
    };

    id.filter(|id| !id.is_empty())
}

/// Deep links of the form `https://youtu.be/{id}?t={seconds}`
#[derive(Debug, Clone, Copy, Default)]
pub struct YouTubeDeepLink;

impl DeepLinker for YouTubeDeepLink {
    fn generate(&self, url: &str, timestamp: f64) -> Result<String> {
        let id = extract_video_id(url)
            .ok_or_else(|| anyhow::anyhow!("No video id in URL: {}", url))?;

        Ok(format!("https://youtu.be/{}?t={}", id, timestamp as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_watch_urls() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_youtube_url("http://youtube.com/watch?v=abc-123"));
    }

    #[test]
    fn test_accepts_short_and_embed_urls() {
        assert!(is_youtube_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_youtube_url("https://www.youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_rejects_non_youtube() {
        assert!(!is_youtube_url("https://vimeo.com/12345"));
        assert!(!is_youtube_url("youtube.com/watch?v=missing-scheme"));
        assert!(!is_youtube_url("https://youtube.com/playlist?list=xyz"));
    }

    #[test]
    fn test_extract_video_id_forms() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123&t=30s"),
            Some("abc123")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/abc123?t=30"),
            Some("abc123")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/abc123"),
            Some("abc123")
        );
        assert_eq!(extract_video_id("https://example.com/video"), None);
    }

    #[test]
    fn test_deep_link_format() {
        let link = YouTubeDeepLink
            .generate("https://www.youtube.com/watch?v=abc123", 92.7)
            .unwrap();
        assert_eq!(link, "https://youtu.be/abc123?t=92");
    }

    #[test]
    fn test_deep_link_fails_without_id() {
        assert!(YouTubeDeepLink
            .generate("https://example.com/video", 10.0)
            .is_err());
    }
}
