//! Command-line interface for quotify.
//!
//! Provides commands for adding sources, watching them through the
//! acquisition pipeline, inspecting transcripts, and extracting,
//! listing, and exporting quotes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::adapters::{
    is_youtube_url, QuoteExporter, TextExporter, WhisperTranscriber, YouTubeDeepLink, YtDlpFetcher,
};
use crate::config::Settings;
use crate::domain::{SourceId, SourceStatus, VideoSource};
use crate::pipeline::SourcePipeline;
use crate::quote::{assemble_quote, format_timestamp};
use crate::selection::{DragOutcome, PointerPosition, SelectionEngine, MIN_QUOTE_TOKENS};
use crate::store::{QuoteStore, SourceStore};
use crate::transcript::{clean, group_into_sentences};

/// quotify - Turn spoken-word video into citable quotes
#[derive(Parser, Debug)]
#[command(name = "quotify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a video source and run the acquisition pipeline
    Add {
        /// YouTube video URL
        url: String,
    },

    /// List all sources
    Sources,

    /// Show a source's details
    Show {
        /// Source id (or unique prefix)
        source_id: String,

        /// Also print the cleaned transcript with token indices
        #[arg(short, long)]
        transcript: bool,
    },

    /// Reset a failed source to pending and run the pipeline again
    Retry {
        /// Source id (or unique prefix)
        source_id: String,
    },

    /// Remove a source
    Remove {
        /// Source id (or unique prefix)
        source_id: String,
    },

    /// Extract a quote from a range of cleaned transcript tokens
    Extract {
        /// Source id (or unique prefix)
        source_id: String,

        /// First token index of the selection
        #[arg(long)]
        from: usize,

        /// Last token index of the selection (inclusive)
        #[arg(long)]
        to: usize,
    },

    /// List extracted quotes
    Quotes,

    /// Delete quotes by id
    Delete {
        /// Quote ids to delete
        quote_ids: Vec<Uuid>,
    },

    /// Export all quotes as text
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration
    Show,

    /// Store the transcription API key
    SetKey {
        /// API key for the transcription service
        key: String,
    },
}

impl Cli {
    /// Execute the parsed command
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load()?;

        match self.command {
            Commands::Add { url } => add_source(&settings, &url).await,
            Commands::Sources => list_sources(&settings),
            Commands::Show {
                source_id,
                transcript,
            } => show_source(&settings, &source_id, transcript),
            Commands::Retry { source_id } => retry_source(&settings, &source_id).await,
            Commands::Remove { source_id } => remove_source(&settings, &source_id),
            Commands::Extract {
                source_id,
                from,
                to,
            } => extract_quote(&settings, &source_id, from, to),
            Commands::Quotes => list_quotes(&settings),
            Commands::Delete { quote_ids } => delete_quotes(&settings, &quote_ids),
            Commands::Export { output } => export_quotes(&settings, output),
            Commands::Config { command } => match command {
                ConfigCommands::Show => show_config(&settings),
                ConfigCommands::SetKey { key } => {
                    settings.store_api_key(&key)?;
                    println!("API key saved to {}", settings.config_path().display());
                    Ok(())
                }
            },
        }
    }
}

fn load_source_store(settings: &Settings) -> Result<Arc<SourceStore>> {
    Ok(Arc::new(SourceStore::load(&settings.sources_path())?))
}

/// Find a source by id or unique prefix
fn resolve_source(store: &SourceStore, raw: &str) -> Result<VideoSource> {
    let matches: Vec<VideoSource> = store
        .list()
        .into_iter()
        .filter(|s| s.id.as_str().starts_with(raw))
        .collect();

    if matches.len() > 1 {
        anyhow::bail!("'{}' is ambiguous ({} sources match)", raw, matches.len());
    }

    matches
        .into_iter()
        .next()
        .with_context(|| format!("No source matches '{}'", raw))
}

async fn add_source(settings: &Settings, url: &str) -> Result<()> {
    if !is_youtube_url(url) {
        anyhow::bail!("Only YouTube URLs are supported: {}", url);
    }

    let sources = load_source_store(settings)?;
    let source = sources.add(url);

    match source.status {
        SourceStatus::Pending => {
            println!("Added {} ({})", source.url, source.id);
            run_pipeline(settings, sources, &source.id).await
        }
        SourceStatus::Completed => {
            println!("Already processed: {} ({})", source.display_title(), source.id);
            Ok(())
        }
        SourceStatus::Error => {
            println!(
                "Source {} previously failed: {}",
                source.id,
                source.error.as_deref().unwrap_or("unknown error")
            );
            println!("Use `quotify retry {}` to run it again.", source.id);
            Ok(())
        }
        status => {
            println!("Source {} is already {}", source.id, status);
            Ok(())
        }
    }
}

async fn run_pipeline(
    settings: &Settings,
    sources: Arc<SourceStore>,
    id: &SourceId,
) -> Result<()> {
    let pipeline = SourcePipeline::new(
        Arc::clone(&sources),
        Arc::new(YtDlpFetcher::with_binary_path(&settings.ytdlp_path)),
        Arc::new(WhisperTranscriber::new().with_ytdlp_path(&settings.ytdlp_path)),
        Arc::new(settings.clone()),
    );

    let handle = pipeline.trigger(id)?;
    handle.await.context("Pipeline task panicked")?;

    sources.save(&settings.sources_path())?;

    let source = sources.get(id).context("Source disappeared during run")?;
    match source.status {
        SourceStatus::Completed => {
            let tokens = source
                .transcript
                .as_ref()
                .map(|t| t.tokens.len())
                .unwrap_or(0);
            println!(
                "Completed: {} ({} transcript tokens)",
                source.display_title(),
                tokens
            );
        }
        SourceStatus::Error => {
            println!(
                "Failed at {}%: {}",
                source.progress,
                source.error.as_deref().unwrap_or("unknown error")
            );
        }
        status => println!("Finished in unexpected state: {}", status),
    }

    Ok(())
}

fn list_sources(settings: &Settings) -> Result<()> {
    let sources = load_source_store(settings)?;

    if sources.is_empty() {
        println!("No sources. Add one with `quotify add <url>`.");
        return Ok(());
    }

    println!("{:<18} {:<13} {:>5}  TITLE", "ID", "STATUS", "PROG");
    for source in sources.list() {
        println!(
            "{:<18} {:<13} {:>4}%  {}",
            source.id,
            source.status.to_string(),
            source.progress,
            source.display_title()
        );
    }

    Ok(())
}

fn show_source(settings: &Settings, source_id: &str, with_transcript: bool) -> Result<()> {
    let sources = load_source_store(settings)?;
    let source = resolve_source(&sources, source_id)?;

    println!("id:       {}", source.id);
    println!("url:      {}", source.url);
    println!("status:   {} ({}%)", source.status, source.progress);

    if let Some(error) = &source.error {
        println!("error:    {}", error);
    }

    if let Some(metadata) = &source.metadata {
        println!("title:    {}", metadata.title);
        println!("channel:  {}", metadata.channel);
        println!("duration: {}", format_timestamp(metadata.duration as f64));
        println!("views:    {}", metadata.views);
    }

    if with_transcript {
        let transcript = source
            .transcript
            .as_ref()
            .context("Source has no transcript yet")?;

        let cleaned = clean(&transcript.tokens);
        println!("\ntranscript ({} cleaned tokens):", cleaned.len());

        let mut index = 0;
        for sentence in group_into_sentences(&cleaned) {
            if let Some(speaker) = sentence[0].speaker.as_deref() {
                println!("  -- {}", speaker);
            }

            let line: Vec<String> = sentence
                .iter()
                .map(|token| {
                    let rendered = format!("[{}] {}", index, token.text);
                    index += 1;
                    rendered
                })
                .collect();
            println!("  {}", line.join(" "));
        }
    }

    Ok(())
}

async fn retry_source(settings: &Settings, source_id: &str) -> Result<()> {
    let sources = load_source_store(settings)?;
    let source = resolve_source(&sources, source_id)?;

    sources.reset_for_retry(&source.id)?;
    println!("Reset {} to pending", source.id);

    run_pipeline(settings, sources, &source.id).await
}

fn remove_source(settings: &Settings, source_id: &str) -> Result<()> {
    let sources = load_source_store(settings)?;
    let source = resolve_source(&sources, source_id)?;

    sources.remove(&source.id);
    sources.save(&settings.sources_path())?;
    println!("Removed {}", source.id);

    Ok(())
}

fn extract_quote(settings: &Settings, source_id: &str, from: usize, to: usize) -> Result<()> {
    let sources = load_source_store(settings)?;
    let source = resolve_source(&sources, source_id)?;

    let transcript = source
        .transcript
        .as_ref()
        .context("Source has no transcript yet")?;
    let metadata = source
        .metadata
        .as_ref()
        .context("Source has no metadata yet")?;

    let cleaned = clean(&transcript.tokens);
    if from >= cleaned.len() || to >= cleaned.len() {
        anyhow::bail!(
            "Token index out of range (transcript has {} cleaned tokens)",
            cleaned.len()
        );
    }

    // Drive the same selection machinery a pointer drag would
    let mut engine = SelectionEngine::new(cleaned.len());
    engine.pointer_down(from);
    engine.pointer_enter(to);

    let range = match engine.pointer_up(PointerPosition::default()) {
        DragOutcome::Selected(_) => engine
            .take_range()
            .context("Selection vanished before extraction")?,
        _ => anyhow::bail!("A quote needs at least {} tokens", MIN_QUOTE_TOKENS),
    };

    let draft = assemble_quote(
        range,
        &cleaned,
        metadata,
        source.id.clone(),
        &YouTubeDeepLink,
        settings.deep_link_fallback,
    )?;

    let quotes = QuoteStore::load(&settings.quotes_path())?;
    let quote = quotes.add(draft);
    quotes.save(&settings.quotes_path())?;

    println!("\u{201C}{}\u{201D}", quote.text);
    println!("{}", quote.citation);
    if !quote.deep_link.is_empty() {
        println!("{}", quote.deep_link);
    }
    println!("id: {}", quote.id);

    Ok(())
}

fn list_quotes(settings: &Settings) -> Result<()> {
    let quotes = QuoteStore::load(&settings.quotes_path())?;

    if quotes.is_empty() {
        println!("No quotes yet. Extract one with `quotify extract`.");
        return Ok(());
    }

    for quote in quotes.list() {
        println!(
            "{}  [{}]  \u{201C}{}\u{201D}",
            quote.id,
            format_timestamp(quote.timestamp),
            quote.text
        );
        println!("    {}  {}", quote.citation, quote.deep_link);
    }

    Ok(())
}

fn delete_quotes(settings: &Settings, quote_ids: &[Uuid]) -> Result<()> {
    let quotes = QuoteStore::load(&settings.quotes_path())?;
    let removed = quotes.remove(quote_ids);
    quotes.save(&settings.quotes_path())?;

    println!("Deleted {} quote(s)", removed);
    Ok(())
}

fn export_quotes(settings: &Settings, output: Option<PathBuf>) -> Result<()> {
    let quotes = QuoteStore::load(&settings.quotes_path())?;
    let text = TextExporter.export(&quotes.list())?;

    match output {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} quote(s) to {}", quotes.len(), path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}

fn show_config(settings: &Settings) -> Result<()> {
    println!("home:               {}", settings.home.display());
    println!(
        "api key:            {}",
        if settings.api_key.is_some() {
            "configured"
        } else {
            "not set"
        }
    );
    println!("deep link fallback: {:?}", settings.deep_link_fallback);
    println!("yt-dlp path:        {}", settings.ytdlp_path);

    Ok(())
}
