//! Configuration and credential lookup.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (QUOTIFY_HOME, QUOTIFY_API_KEY)
//! 2. Config file ($QUOTIFY_HOME/config.yaml, default ~/.quotify/config.yaml)
//! 3. Defaults
//!
//! Settings are constructed once at startup and passed by reference to
//! whatever needs them; there is no process-wide cache, so tests build
//! their own instances directly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::adapters::CredentialProvider;
use crate::quote::DeepLinkFallback;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Transcription-service API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    /// What to store when deep-link generation fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_link_fallback: Option<DeepLinkFallback>,

    /// Custom yt-dlp binary path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ytdlp_path: Option<String>,
}

/// Resolved application settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Data directory holding config and catalogs
    pub home: PathBuf,

    /// Transcription-service API key, if configured
    pub api_key: Option<String>,

    /// Deep-link failure policy
    pub deep_link_fallback: DeepLinkFallback,

    /// yt-dlp binary path
    pub ytdlp_path: String,
}

impl Settings {
    /// Load settings from the environment and config file
    pub fn load() -> Result<Self> {
        let home = Self::default_home()?;
        let file = Self::read_config_file(&home.join("config.yaml"))?;
        Ok(Self::resolve(
            home,
            file,
            std::env::var("QUOTIFY_API_KEY").ok(),
        ))
    }

    /// Resolve settings from explicit inputs (tests pass these directly)
    pub fn resolve(home: PathBuf, file: Option<ConfigFile>, env_api_key: Option<String>) -> Self {
        let file = file.unwrap_or_default();

        let api_key = env_api_key
            .or(file.openai_api_key)
            .filter(|key| !key.trim().is_empty());

        Self {
            home,
            api_key,
            deep_link_fallback: file.deep_link_fallback.unwrap_or_default(),
            ytdlp_path: file.ytdlp_path.unwrap_or_else(|| "yt-dlp".to_string()),
        }
    }

    /// Data directory: $QUOTIFY_HOME or ~/.quotify
    fn default_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("QUOTIFY_HOME") {
            return Ok(PathBuf::from(home));
        }

        Ok(dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(".quotify"))
    }

    fn read_config_file(path: &Path) -> Result<Option<ConfigFile>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let file = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(Some(file))
    }

    /// Path to the source catalog
    pub fn sources_path(&self) -> PathBuf {
        self.home.join("sources.json")
    }

    /// Path to the quote catalog
    pub fn quotes_path(&self) -> PathBuf {
        self.home.join("quotes.json")
    }

    /// Path to the config file
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.yaml")
    }

    /// Persist a new API key to the config file, keeping other settings
    pub fn store_api_key(&self, key: &str) -> Result<()> {
        let path = self.config_path();
        let mut file = Self::read_config_file(&path)?.unwrap_or_default();
        file.openai_api_key = Some(key.to_string());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(&file)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[async_trait]
impl CredentialProvider for Settings {
    async fn credential(&self) -> Result<Option<String>> {
        Ok(self.api_key.clone())
    }
}
