//! The owning collection of extracted quotes.

use std::path::Path;
use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::{Quote, QuoteDraft, SourceId};

/// In-memory collection of quotes, keyed by id, in creation order
#[derive(Debug, Default)]
pub struct QuoteStore {
    inner: Mutex<Vec<Quote>>,
}

impl QuoteStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalize a draft with a fresh unique id and add it
    pub fn add(&self, draft: QuoteDraft) -> Quote {
        let quote = draft.with_id(Uuid::new_v4());
        self.inner.lock().unwrap().push(quote.clone());
        quote
    }

    /// Get a quote by id
    pub fn get(&self, id: &Uuid) -> Option<Quote> {
        self.inner.lock().unwrap().iter().find(|q| &q.id == id).cloned()
    }

    /// Remove quotes by id; returns how many were removed
    pub fn remove(&self, ids: &[Uuid]) -> usize {
        let mut quotes = self.inner.lock().unwrap();
        let before = quotes.len();
        quotes.retain(|q| !ids.contains(&q.id));
        before - quotes.len()
    }

    /// All quotes referencing a source
    pub fn for_source(&self, source_id: &SourceId) -> Vec<Quote> {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .filter(|q| &q.source_id == source_id)
            .cloned()
            .collect()
    }

    /// Snapshot of all quotes in creation order
    pub fn list(&self) -> Vec<Quote> {
        self.inner.lock().unwrap().clone()
    }

    /// Number of quotes
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
            .with_context(|| format!("Failed to read quote catalog: {}", path.display()))?;
        let quotes: Vec<Quote> =
            serde_json::from_str(&content).context("Failed to parse quote catalog")?;

        Ok(Self {
            inner: Mutex::new(quotes),
        })
    }

    /// Save the store to a JSON catalog file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let quotes = self.inner.lock().unwrap();
        let content = serde_json::to_string_pretty(&*quotes)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write quote catalog: {}", path.display()))?;

        Ok(())
    }
}
