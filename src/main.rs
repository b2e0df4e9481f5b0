//! SiteSage main entry point
//!
//! This is the command-line interface for the SiteSage SEO analyzer.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sitesage::analysis::Analyzer;
use sitesage::config::{load_config_with_hash, load_default_config, Config};
use sitesage::output::{
    format_history_markdown, format_report_list, format_report_markdown, load_history,
    load_statistics, print_statistics, write_report_pdf,
};
use sitesage::server::{start_server, AppState};
use sitesage::storage::{ReportFilter, SqliteStorage, Storage, DEFAULT_PAGE_SIZE};
use sitesage::ReportStatus;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Interval between storage polls while waiting for a batch
const BATCH_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// SiteSage: single-page SEO analysis
///
/// SiteSage fetches a page, scores its markup against fixed SEO rules,
/// optionally asks an LLM for a written summary and keeps every report in a
/// local database for listing, history and PDF export.
#[derive(Parser, Debug)]
#[command(name = "sitesage")]
#[command(version = "1.0.0")]
#[command(about = "Single-page SEO analyzer", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a URL and print the finished report
    Analyze {
        url: String,

        /// Skip LLM insights
        #[arg(long)]
        no_ai: bool,
    },

    /// Analyze every URL listed in a file (one per line)
    Batch {
        file: PathBuf,

        /// Skip LLM insights
        #[arg(long)]
        no_ai: bool,
    },

    /// Show a stored report
    Show { id: i64 },

    /// List stored reports, newest first
    List {
        /// Only reports with this status
        #[arg(long)]
        status: Option<ReportStatus>,

        /// Only reports whose URL contains this text
        #[arg(long)]
        url: Option<String>,

        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
    },

    /// Show completed analyses of a URL over time
    History {
        url: String,

        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    /// Show aggregate statistics
    Stats,

    /// Write a completed report as PDF
    Pdf {
        id: i64,

        /// Output directory (defaults to the configured reports directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run the HTTP API
    Serve {
        /// Address to listen on (defaults to the configured bind address)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze { url, no_ai } => handle_analyze(&config, &url, !no_ai).await,
        Command::Batch { file, no_ai } => handle_batch(&config, &file, !no_ai).await,
        Command::Show { id } => handle_show(&config, id),
        Command::List {
            status,
            url,
            skip,
            limit,
        } => handle_list(
            &config,
            ReportFilter {
                status,
                url_contains: url,
                skip,
                limit,
            },
        ),
        Command::History { url, days } => handle_history(&config, &url, days),
        Command::Stats => handle_stats(&config),
        Command::Pdf { id, out } => handle_pdf(&config, id, out),
        Command::Serve { bind } => handle_serve(config, bind).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitesage=info,warn"),
            1 => EnvFilter::new("sitesage=debug,info"),
            2 => EnvFilter::new("sitesage=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            load_default_config().context("Invalid default configuration")
        }
    }
}

fn open_storage(config: &Config) -> anyhow::Result<SqliteStorage> {
    let path = Path::new(&config.output.database_path);
    SqliteStorage::new(path)
        .with_context(|| format!("Failed to open database {}", path.display()))
}

fn build_analyzer(config: &Config) -> anyhow::Result<Analyzer> {
    let storage = Arc::new(Mutex::new(open_storage(config)?));
    Ok(Analyzer::new(config, storage)?)
}

/// Handles `analyze`: runs one analysis to completion
async fn handle_analyze(config: &Config, url: &str, include_ai: bool) -> anyhow::Result<()> {
    let analyzer = build_analyzer(config)?;
    let report = analyzer.analyze_now(url, include_ai).await?;

    println!("{}", format_report_markdown(&report));

    if report.status == ReportStatus::Failed {
        bail!("Analysis of {} failed", report.url);
    }
    Ok(())
}

/// Handles `batch`: submits every URL in the file and waits for all reports
async fn handle_batch(config: &Config, file: &Path, include_ai: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read URL list {}", file.display()))?;
    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if urls.is_empty() {
        bail!("No URLs found in {}", file.display());
    }

    let analyzer = build_analyzer(config)?;
    let batch = analyzer.submit_batch(&urls, include_ai)?;
    println!("{}: {}", batch.batch_id, batch.message);

    let reports = loop {
        let reports = {
            let storage = analyzer
                .storage()
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            batch
                .submitted_reports
                .iter()
                .map(|id| storage.get_report(*id))
                .collect::<Result<Vec<_>, _>>()?
        };

        if reports.iter().all(|r| r.status.is_terminal()) {
            break reports;
        }
        tokio::time::sleep(BATCH_POLL_INTERVAL).await;
    };

    let total = reports.len() as u64;
    println!("{}", format_report_list(&reports, total, 1));
    Ok(())
}

/// Handles `show`
fn handle_show(config: &Config, id: i64) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let report = storage.get_report(id)?;
    println!("{}", format_report_markdown(&report));
    Ok(())
}

/// Handles `list`
fn handle_list(config: &Config, filter: ReportFilter) -> anyhow::Result<()> {
    let filter = filter.clamped();
    let storage = open_storage(config)?;
    let (reports, total) = storage.list_reports(&filter)?;
    println!("{}", format_report_list(&reports, total, filter.page()));
    Ok(())
}

/// Handles `history`
fn handle_history(config: &Config, url: &str, days: u32) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let history = load_history(&storage, url, days)?;
    println!("{}", format_history_markdown(&history));
    Ok(())
}

/// Handles `stats`: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(config)?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles `pdf`
fn handle_pdf(config: &Config, id: i64, out: Option<PathBuf>) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let report = storage.get_report(id)?;

    let dir = out.unwrap_or_else(|| PathBuf::from(&config.output.reports_dir));
    let path = write_report_pdf(&report, &dir)?;

    println!("✓ Report written to: {}", path.display());
    Ok(())
}

/// Handles `serve`
async fn handle_serve(config: Config, bind: Option<String>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let analyzer = build_analyzer(&config)?;

    start_server(&bind, AppState::new(analyzer))
        .await
        .with_context(|| format!("API server on {} failed", bind))?;
    Ok(())
}
