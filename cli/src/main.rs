//! Recall CLI: inspect saved chat pages and replay key sessions against them.
//!
//! ```text
//! recall sites                                  routing table + enablement
//! recall inspect --url URL PAGE.html            adapter, input, history
//! recall replay  --url URL PAGE.html --keys up,up,down,type:x
//! ```
//!
//! Pages are loaded into an in-memory document; the same lifecycle
//! controller that runs in a browser drives the replay.

mod replay;

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    rc::Rc,
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use url::Url;

use recall_adapters::{Adapter, ROUTES, SiteAdapter};
use recall_config::{RecallConfig, ResolvedConfig};
use recall_dom::{Document, HtmlDocument};
use recall_types::SUPPORTED_SITES;

use crate::replay::Step;

#[derive(Debug, Parser)]
#[command(name = "recall", version, about)]
struct Cli {
    /// Config file to use instead of ~/.recall/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List supported sites and whether they are enabled.
    Sites,
    /// Show what Recall finds in a saved page.
    Inspect {
        /// Location the page was saved from.
        #[arg(long)]
        url: Url,
        page: PathBuf,
    },
    /// Drive a key session against a saved page.
    Replay {
        #[arg(long)]
        url: Url,
        page: PathBuf,
        /// Comma-separated steps: up, down, blur, type:TEXT, key:NAME,
        /// cmd:up, cmd:down, wait:MS.
        #[arg(long, value_delimiter = ',', required = true)]
        keys: Vec<Step>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Sites => {
            print_sites(&config);
            Ok(())
        }
        Command::Inspect { url, page } => inspect(&url, &page),
        Command::Replay { url, page, keys } => {
            let doc = load_page(&url, &page)?;
            let report = replay::run(doc, &config, &keys);
            print!("{report}");
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let config = match explicit {
        Some(path) => Some(RecallConfig::load_from(path)?),
        None => RecallConfig::load()?,
    };
    if config.is_none() {
        tracing::debug!(path = ?RecallConfig::path(), "No config file; using defaults");
    }
    Ok(config.unwrap_or_default().resolve())
}

fn load_page(url: &Url, page: &Path) -> Result<Rc<HtmlDocument>> {
    let markup = fs::read_to_string(page)
        .with_context(|| format!("failed to read page {}", page.display()))?;
    Ok(Rc::new(HtmlDocument::new(url.clone(), &markup)))
}

fn print_sites(config: &ResolvedConfig) {
    for site in SUPPORTED_SITES {
        let enabled = if config.settings.is_site_enabled(site.id) {
            "enabled"
        } else {
            "disabled"
        };
        let hosts: Vec<String> = ROUTES
            .iter()
            .filter(|route| route.site == site.id)
            .map(|route| match route.path_prefix {
                Some(prefix) => format!("{}{prefix}", route.host),
                None => route.host.to_string(),
            })
            .collect();
        println!(
            "{:<18} {:<9} {:<28} {}",
            site.name,
            enabled,
            site.url,
            hosts.join(", ")
        );
    }
}

fn inspect(url: &Url, page: &Path) -> Result<()> {
    let doc = load_page(url, page)?;
    let Some(adapter) = Adapter::for_location(doc.clone()) else {
        println!("No supported site at {url}");
        return Ok(());
    };

    println!("site:   {}", adapter.site().display_name());
    match adapter.locate_input() {
        Some(input) => {
            let tag = doc.tag_name(input).unwrap_or_default();
            let kind = doc
                .surface_kind(input)
                .map_or_else(|| "?".to_string(), |kind| format!("{kind:?}"));
            println!("input:  <{tag}> {kind} {:?}", adapter.value());
        }
        None => println!("input:  not found"),
    }
    let submit = adapter
        .locate_submit()
        .map_or("not found", |_| "found");
    println!("submit: {submit}");

    let history = adapter.history();
    println!("history: {} entries", history.len());
    for (index, entry) in history.iter().enumerate() {
        println!("  {:>3}  {}", index + 1, entry.as_str().replace('\n', "\n       "));
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Reports go to stdout; keep logs out of them.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.recall/logs/recall.log
    if let Some(dir) = recall_config::recall_dir() {
        candidates.push(dir.join("logs").join("recall.log"));
    }

    // Fallback: ./.recall/logs/recall.log
    candidates.push(PathBuf::from(".recall").join("logs").join("recall.log"));

    candidates
}
