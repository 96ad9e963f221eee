//! Per-source pipeline execution.
//!
//! One tokio task per in-flight source; an in-flight set guarantees a
//! source id is never processed twice concurrently. Failures are
//! isolated per source.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::{CredentialProvider, MetadataFetcher, Transcriber};
use crate::domain::{SourceId, SourceStatus};
use crate::store::{SourcePatch, SourceStore};

use super::PipelineError;

/// Progress checkpoints published as the stages advance
const PROGRESS_METADATA_STARTED: u8 = 25;
const PROGRESS_METADATA_DONE: u8 = 50;
const PROGRESS_TRANSCRIBING: u8 = 75;
const PROGRESS_COMPLETED: u8 = 100;

/// Why a pipeline run could not be started
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Source not found: {0}")]
    NotFound(SourceId),

    #[error("Source {id} is {status}, not pending")]
    NotPending { id: SourceId, status: SourceStatus },

    #[error("Source {0} is already being processed")]
    AlreadyRunning(SourceId),
}

/// Drives pending sources through the acquisition stages.
///
/// Constructed once at startup with its collaborators; clones share the
/// same in-flight set, so a handle can be passed around freely. Every
/// state transition goes through the source store so readers always see
/// a consistent source.
#[derive(Clone)]
pub struct SourcePipeline {
    sources: Arc<SourceStore>,
    fetcher: Arc<dyn MetadataFetcher>,
    transcriber: Arc<dyn Transcriber>,
    credentials: Arc<dyn CredentialProvider>,
    in_flight: Arc<Mutex<HashSet<SourceId>>>,
}

impl SourcePipeline {
    /// Create a pipeline over the given store and collaborators
    pub fn new(
        sources: Arc<SourceStore>,
        fetcher: Arc<dyn MetadataFetcher>,
        transcriber: Arc<dyn Transcriber>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            sources,
            fetcher,
            transcriber,
            credentials,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Start a run for a pending source.
    ///
    /// Spawns the run as a background task and returns its handle.
    /// Exactly one run can be active per source id; re-triggering is
    /// only possible after the current run finishes and the source has
    /// been reset to pending.
    pub fn trigger(&self, id: &SourceId) -> Result<JoinHandle<()>, TriggerError> {
        let source = self
            .sources
            .get(id)
            .ok_or_else(|| TriggerError::NotFound(id.clone()))?;

        if !source.is_pending() {
            return Err(TriggerError::NotPending {
                id: id.clone(),
                status: source.status,
            });
        }

        {
            let mut in_flight = self.in_flight.lock().unwrap();
            if !in_flight.insert(id.clone()) {
                return Err(TriggerError::AlreadyRunning(id.clone()));
            }
        }

        let pipeline = self.clone();
        let id = id.clone();

        Ok(tokio::spawn(async move {
            pipeline.process(&id).await;
            pipeline.in_flight.lock().unwrap().remove(&id);
        }))
    }

    /// Check whether a run is currently active for a source
    pub fn is_running(&self, id: &SourceId) -> bool {
        self.in_flight.lock().unwrap().contains(id)
    }

    #[instrument(skip(self), fields(source = %id))]
    async fn process(&self, id: &SourceId) {
        info!("Starting source pipeline");

        match self.run_stages(id).await {
            Ok(()) => info!("Source pipeline finished"),
            Err(e) => {
                error!(error = %e, "Source pipeline failed");
                // Progress stays where the failing stage left it
                let _ = self.sources.update(
                    id,
                    SourcePatch {
                        status: Some(SourceStatus::Error),
                        error: Some(e.to_string()),
                        ..Default::default()
                    },
                );
            }
        }
    }

    async fn run_stages(&self, id: &SourceId) -> Result<(), PipelineError> {
        let url = match self.sources.get(id) {
            Some(source) => source.url,
            None => return Ok(()),
        };

        if !self.publish(
            id,
            SourcePatch {
                status: Some(SourceStatus::Metadata),
                progress: Some(PROGRESS_METADATA_STARTED),
                ..Default::default()
            },
        ) {
            return Ok(());
        }

        debug!(fetcher = self.fetcher.name(), "Fetching metadata");
        let metadata = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| PipelineError::FetchMetadataFailed(e.to_string()))?;

        if !self.publish(
            id,
            SourcePatch {
                metadata: Some(metadata),
                progress: Some(PROGRESS_METADATA_DONE),
                ..Default::default()
            },
        ) {
            return Ok(());
        }

        if !self.publish(
            id,
            SourcePatch {
                status: Some(SourceStatus::Transcribing),
                progress: Some(PROGRESS_TRANSCRIBING),
                ..Default::default()
            },
        ) {
            return Ok(());
        }

        let credential = match self.credentials.credential().await {
            Ok(Some(key)) => key,
            Ok(None) => return Err(PipelineError::CredentialMissing),
            Err(e) => {
                warn!(error = %e, "Credential lookup failed");
                return Err(PipelineError::CredentialMissing);
            }
        };

        debug!(transcriber = self.transcriber.name(), "Transcribing");
        let transcript = self
            .transcriber
            .transcribe(&url, &credential)
            .await
            .map_err(|e| PipelineError::TranscriptionFailed(e.to_string()))?;

        // Transcript, terminal status, and final progress land together
        // so no reader can see a completed source without its transcript.
        self.publish(
            id,
            SourcePatch {
                status: Some(SourceStatus::Completed),
                progress: Some(PROGRESS_COMPLETED),
                transcript: Some(transcript),
                ..Default::default()
            },
        );

        Ok(())
    }

    /// Apply a patch; false when the source vanished mid-run, which
    /// quietly ends the run (there is nothing left to report against).
    fn publish(&self, id: &SourceId, patch: SourcePatch) -> bool {
        match self.sources.update(id, patch) {
            Ok(_) => true,
            Err(_) => {
                debug!(source = %id, "Source removed while processing");
                false
            }
        }
    }
}
