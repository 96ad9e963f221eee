//! Pipeline Integration Tests
//!
//! Scenario tests driving the source pipeline with fake collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use quotify::adapters::{CredentialProvider, MetadataFetcher, Transcriber};
use quotify::domain::{SourceStatus, Transcription, TranscriptToken, VideoMetadata};
use quotify::{SourcePipeline, SourceStore};

fn fixture_metadata(url: &str) -> VideoMetadata {
    VideoMetadata {
        title: "Test Video".to_string(),
        channel: "Test Channel".to_string(),
        duration: 300,
        publish_date: "20240115".to_string(),
        views: 1000,
        thumbnail: "https://example.com/thumb.jpg".to_string(),
        url: url.to_string(),
    }
}

fn fixture_transcription() -> Transcription {
    Transcription {
        tokens: vec![
            TranscriptToken::new("Hello", 0.0, 0.5),
            TranscriptToken::new("um", 0.5, 0.7),
            TranscriptToken::new("world", 0.7, 1.2),
            TranscriptToken::new("this", 1.2, 1.5),
            TranscriptToken::new("is", 1.5, 1.7),
            TranscriptToken::new("great.", 1.7, 2.5),
        ],
        full_text: "Hello um world this is great.".to_string(),
    }
}

/// Metadata fetcher that fails for URLs containing "bad"
struct FakeFetcher;

#[async_trait]
impl MetadataFetcher for FakeFetcher {
    fn name(&self) -> &str {
        "fake-metadata"
    }

    async fn fetch(&self, url: &str) -> Result<VideoMetadata> {
        if url.contains("bad") {
            anyhow::bail!("network unreachable");
        }
        Ok(fixture_metadata(url))
    }
}

/// Transcriber that can be told to fail, counting its invocations
struct FakeTranscriber {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeTranscriber {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    fn name(&self) -> &str {
        "fake-transcriber"
    }

    async fn transcribe(&self, _url: &str, _credential: &str) -> Result<Transcription> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("service rejected the audio");
        }
        Ok(fixture_transcription())
    }
}

struct FakeCredentials(Option<String>);

#[async_trait]
impl CredentialProvider for FakeCredentials {
    async fn credential(&self) -> Result<Option<String>> {
        Ok(self.0.clone())
    }
}

fn pipeline(
    sources: &Arc<SourceStore>,
    transcriber: Arc<FakeTranscriber>,
    credential: Option<&str>,
) -> SourcePipeline {
    SourcePipeline::new(
        Arc::clone(sources),
        Arc::new(FakeFetcher),
        transcriber,
        Arc::new(FakeCredentials(credential.map(String::from))),
    )
}

#[tokio::test]
async fn test_successful_run_completes() {
    let sources = Arc::new(SourceStore::new());
    let source = sources.add("https://youtu.be/good-video");

    let pipeline = pipeline(&sources, Arc::new(FakeTranscriber::new(false)), Some("sk-test"));
    pipeline.trigger(&source.id).unwrap().await.unwrap();

    let done = sources.get(&source.id).unwrap();
    assert_eq!(done.status, SourceStatus::Completed);
    assert_eq!(done.progress, 100);
    assert!(done.metadata.is_some());
    assert!(done.transcript.is_some());
    assert!(done.error.is_none());
}

#[tokio::test]
async fn test_metadata_failure_is_terminal() {
    let sources = Arc::new(SourceStore::new());
    let source = sources.add("https://youtu.be/bad-video");

    let pipeline = pipeline(&sources, Arc::new(FakeTranscriber::new(false)), Some("sk-test"));
    pipeline.trigger(&source.id).unwrap().await.unwrap();

    let failed = sources.get(&source.id).unwrap();
    assert_eq!(failed.status, SourceStatus::Error);
    assert!(failed.progress <= 25);
    assert!(failed.error.as_deref().unwrap().contains("Metadata fetch failed"));
    assert!(failed.transcript.is_none());
}

#[tokio::test]
async fn test_missing_credential_skips_transcription() {
    let sources = Arc::new(SourceStore::new());
    let source = sources.add("https://youtu.be/good-video");

    let transcriber = Arc::new(FakeTranscriber::new(false));
    let pipeline = pipeline(&sources, Arc::clone(&transcriber), None);
    pipeline.trigger(&source.id).unwrap().await.unwrap();

    let failed = sources.get(&source.id).unwrap();
    assert_eq!(failed.status, SourceStatus::Error);
    assert!(failed.error.as_deref().unwrap().contains("API key"));
    // The transcriber must never be called without a credential
    assert_eq!(transcriber.calls.load(Ordering::SeqCst), 0);
    // Metadata had already been attached before the failure
    assert!(failed.metadata.is_some());
    assert_eq!(failed.progress, 75);
}

#[tokio::test]
async fn test_transcription_failure_is_terminal() {
    let sources = Arc::new(SourceStore::new());
    let source = sources.add("https://youtu.be/good-video");

    let pipeline = pipeline(&sources, Arc::new(FakeTranscriber::new(true)), Some("sk-test"));
    pipeline.trigger(&source.id).unwrap().await.unwrap();

    let failed = sources.get(&source.id).unwrap();
    assert_eq!(failed.status, SourceStatus::Error);
    assert_eq!(failed.progress, 75);
    assert!(failed.error.as_deref().unwrap().contains("Transcription failed"));
    assert!(failed.transcript.is_none());
}

#[tokio::test]
async fn test_trigger_requires_pending() {
    let sources = Arc::new(SourceStore::new());
    let source = sources.add("https://youtu.be/good-video");

    let pipeline = pipeline(&sources, Arc::new(FakeTranscriber::new(false)), Some("sk-test"));
    pipeline.trigger(&source.id).unwrap().await.unwrap();

    // Completed sources cannot be re-triggered without a reset
    assert!(pipeline.trigger(&source.id).is_err());
}

#[tokio::test]
async fn test_no_second_run_while_in_flight() {
    let sources = Arc::new(SourceStore::new());
    let source = sources.add("https://youtu.be/good-video");

    let pipeline = pipeline(&sources, Arc::new(FakeTranscriber::new(false)), Some("sk-test"));
    let handle = pipeline.trigger(&source.id).unwrap();

    // Whether the first run has already left pending or is still queued,
    // a second trigger for the same id must be rejected.
    assert!(pipeline.trigger(&source.id).is_err());

    handle.await.unwrap();
}

#[tokio::test]
async fn test_reset_to_pending_allows_retry() {
    let sources = Arc::new(SourceStore::new());
    let source = sources.add("https://youtu.be/good-video");

    // First attempt fails at transcription
    let failing = pipeline(&sources, Arc::new(FakeTranscriber::new(true)), Some("sk-test"));
    failing.trigger(&source.id).unwrap().await.unwrap();
    assert_eq!(sources.get(&source.id).unwrap().status, SourceStatus::Error);

    // Reset and retry with a working transcriber
    sources.reset_for_retry(&source.id).unwrap();
    assert_eq!(sources.get(&source.id).unwrap().progress, 0);

    let working = pipeline(&sources, Arc::new(FakeTranscriber::new(false)), Some("sk-test"));
    working.trigger(&source.id).unwrap().await.unwrap();

    let done = sources.get(&source.id).unwrap();
    assert_eq!(done.status, SourceStatus::Completed);
    assert_eq!(done.progress, 100);
    assert!(done.transcript.is_some());
}

#[tokio::test]
async fn test_failures_are_isolated_per_source() {
    let sources = Arc::new(SourceStore::new());
    let good = sources.add("https://youtu.be/good-video");
    let bad = sources.add("https://youtu.be/bad-video");

    let pipeline = pipeline(&sources, Arc::new(FakeTranscriber::new(false)), Some("sk-test"));
    let good_run = pipeline.trigger(&good.id).unwrap();
    let bad_run = pipeline.trigger(&bad.id).unwrap();

    good_run.await.unwrap();
    bad_run.await.unwrap();

    assert_eq!(sources.get(&good.id).unwrap().status, SourceStatus::Completed);
    assert_eq!(sources.get(&bad.id).unwrap().status, SourceStatus::Error);
}
