//! The owning collection of video sources.

use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

use crate::domain::{SourceId, SourceStatus, Transcription, VideoMetadata, VideoSource};

/// Errors from source-store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Source not found: {0}")]
    NotFound(SourceId),

    #[error("Source {id} is {status}; it can only be reset once the pipeline has finished")]
    InFlight { id: SourceId, status: SourceStatus },
}

/// A partial update applied atomically to one source.
///
/// Unset fields are left untouched. Progress can only move forward; the
/// store clamps any attempt to lower it (reset happens exclusively
/// through [`SourceStore::reset_for_retry`]).
#[derive(Debug, Default, Clone)]
pub struct SourcePatch {
    pub status: Option<SourceStatus>,
    pub progress: Option<u8>,
    pub metadata: Option<VideoMetadata>,
    pub transcript: Option<Transcription>,
    pub error: Option<String>,
}

/// In-memory collection of all known sources, in insertion order
#[derive(Debug, Default)]
pub struct SourceStore {
    inner: Mutex<Vec<VideoSource>>,
}

impl SourceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source for a URL.
    ///
    /// Idempotent per URL: adding an already-known URL returns the
    /// existing source unchanged, so ids are never reused or duplicated.
    pub fn add(&self, url: &str) -> VideoSource {
        let id = SourceId::from_url(url);
        let mut sources = self.inner.lock().unwrap();

        if let Some(existing) = sources.iter().find(|s| s.id == id) {
            debug!(source = %id, "URL already added");
            return existing.clone();
        }

        let source = VideoSource::new(url);
        sources.push(source.clone());
        source
    }

    /// Get a snapshot of a source by id
    pub fn get(&self, id: &SourceId) -> Option<VideoSource> {
        self.inner.lock().unwrap().iter().find(|s| &s.id == id).cloned()
    }

    /// Apply a patch to one source atomically.
    ///
    /// Returns the updated snapshot. Readers observe either the state
    /// before the whole patch or after it, never something in between.
    pub fn update(&self, id: &SourceId, patch: SourcePatch) -> Result<VideoSource, StoreError> {
        let mut sources = self.inner.lock().unwrap();
        let source = sources
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if let Some(status) = patch.status {
            source.status = status;
        }
        if let Some(progress) = patch.progress {
            source.progress = source.progress.max(progress.min(100));
        }
        if let Some(metadata) = patch.metadata {
            source.metadata = Some(metadata);
        }
        if let Some(transcript) = patch.transcript {
            source.transcript = Some(transcript);
        }
        if let Some(error) = patch.error {
            source.error = Some(error);
        }

        Ok(source.clone())
    }

    /// Return a source to `Pending` so the pipeline can re-drive it.
    ///
    /// Clears progress, error, and transcript; fetched metadata is kept
    /// (the pipeline refetches and overwrites it). Rejected while a run
    /// is still in flight.
    pub fn reset_for_retry(&self, id: &SourceId) -> Result<VideoSource, StoreError> {
        let mut sources = self.inner.lock().unwrap();
        let source = sources
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if matches!(
            source.status,
            SourceStatus::Metadata | SourceStatus::Transcribing
        ) {
            return Err(StoreError::InFlight {
                id: id.clone(),
                status: source.status,
            });
        }

        source.status = SourceStatus::Pending;
        source.progress = 0;
        source.error = None;
        source.transcript = None;

        Ok(source.clone())
    }

    /// Remove a source by id
    pub fn remove(&self, id: &SourceId) -> Option<VideoSource> {
        let mut sources = self.inner.lock().unwrap();
        let pos = sources.iter().position(|s| &s.id == id)?;
        Some(sources.remove(pos))
    }

    /// Snapshot of all sources in insertion order
    pub fn list(&self) -> Vec<VideoSource> {
        self.inner.lock().unwrap().clone()
    }

    /// Number of sources
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load a store from a JSON catalog file (empty store if absent)
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read source catalog: {}", path.display()))?;
        let sources: Vec<VideoSource> =
            serde_json::from_str(&content).context("Failed to parse source catalog")?;

        Ok(Self {
            inner: Mutex::new(sources),
        })
    }

    /// Save the store to a JSON catalog file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let sources = self.inner.lock().unwrap();
        let content = serde_json::to_string_pretty(&*sources)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write source catalog: {}", path.display()))?;

        Ok(())
    }
}
