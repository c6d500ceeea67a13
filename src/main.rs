//! Refharvest main entry point
//!
//! Command-line interface for the reference harvester: crawl the source
//! site into a checkpointed dataset, render a completed dataset to
//! Markdown, or inspect checkpoint statistics.

use clap::{Parser, Subcommand};
use refharvest::config::{load_config_with_hash, Config};
use refharvest::crawler::run_crawl;
use refharvest::output::{format_summary, read_dataset, render_markdown};
use refharvest::state::ItemStatus;
use refharvest::storage::{open_checkpoint, CheckpointStore, RunStatus};
use refharvest::HarvestError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Refharvest: a resumable API reference harvester
///
/// Crawls a C# reference site into a structured dataset, surviving
/// interruption without redoing completed work, then renders the dataset
/// to Markdown pages.
#[derive(Parser, Debug)]
#[command(name = "refharvest")]
#[command(version = "0.2.0")]
#[command(about = "A resumable API reference harvester", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the reference site (resumes an interrupted run by default)
    Crawl {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Start over, discarding previous checkpoint state
        #[arg(long)]
        fresh: bool,

        /// Replace an existing dataset artifact without asking
        #[arg(long)]
        force: bool,

        /// Override the configured worker count
        #[arg(long)]
        concurrency: Option<u32>,

        /// Override the configured request spacing (milliseconds)
        #[arg(long, value_name = "MS")]
        spacing_ms: Option<u64>,

        /// Override the configured dataset output path
        #[arg(long, value_name = "PATH")]
        dataset: Option<PathBuf>,
    },

    /// Render a completed dataset to Markdown pages
    Render {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Override the configured docs output directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Print checkpoint statistics and exit
    Stats {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Crawl {
            config,
            fresh,
            force,
            concurrency,
            spacing_ms,
            dataset,
        } => handle_crawl(&config, fresh, force, concurrency, spacing_ms, dataset).await,
        Command::Render { config, out } => handle_render(&config, out),
        Command::Stats { config } => handle_stats(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(1)
        }
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("refharvest=info,warn"),
            1 => EnvFilter::new("refharvest=debug,info"),
            2 => EnvFilter::new("refharvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load(config_path: &Path) -> Result<(Config, String), HarvestError> {
    tracing::info!("Loading configuration from: {}", config_path.display());
    let (config, hash) = load_config_with_hash(config_path)?;
    Ok((config, hash))
}

/// Handles the crawl subcommand
///
/// Exit code 0 on full success, 2 when the run completed with recorded
/// extraction failures or was interrupted, 1 on fatal failure.
async fn handle_crawl(
    config_path: &Path,
    fresh: bool,
    force: bool,
    concurrency: Option<u32>,
    spacing_ms: Option<u64>,
    dataset: Option<PathBuf>,
) -> Result<ExitCode, HarvestError> {
    let (mut config, hash) = load(config_path)?;

    // Command-line overrides beat the config file.
    if let Some(concurrency) = concurrency {
        config.crawler.concurrency = concurrency.max(1);
    }
    if let Some(spacing_ms) = spacing_ms {
        config.crawler.request_spacing_ms = spacing_ms.max(1);
    }
    if let Some(dataset) = dataset {
        config.output.dataset_path = dataset.to_string_lossy().into_owned();
    }

    confirm_dataset_overwrite(&config, force)?;

    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
    } else {
        tracing::info!("Starting crawl (will resume if interrupted state exists)");
    }

    let summary = run_crawl(config, &hash, fresh).await?;
    println!("{}", format_summary(&summary));

    if summary.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

/// Refuses to clobber an existing dataset unless forced or resuming
///
/// The dataset writer itself always writes via a temp file and rename; this
/// is the user-facing guard against silently replacing a prior capture.
fn confirm_dataset_overwrite(config: &Config, force: bool) -> Result<(), HarvestError> {
    let dataset_path = Path::new(&config.output.dataset_path);
    if force || !dataset_path.exists() {
        return Ok(());
    }

    // A run in progress owns its artifact; resuming it may keep writing.
    let checkpoint_path = Path::new(&config.output.checkpoint_path);
    if checkpoint_path.exists() {
        let store = open_checkpoint(checkpoint_path)?;
        if let Some(run) = store.latest_run()? {
            if run.status == RunStatus::Running {
                return Ok(());
            }
        }
    }

    Err(HarvestError::DatasetExists(
        config.output.dataset_path.clone(),
    ))
}

/// Handles the render subcommand
fn handle_render(config_path: &Path, out: Option<PathBuf>) -> Result<ExitCode, HarvestError> {
    let (mut config, _hash) = load(config_path)?;
    if let Some(out) = out {
        config.output.docs_dir = out.to_string_lossy().into_owned();
    }

    let dataset_path = Path::new(&config.output.dataset_path);
    if !dataset_path.exists() {
        return Err(HarvestError::MissingDataset(
            config.output.dataset_path.clone(),
        ));
    }

    let dataset = read_dataset(dataset_path)?;
    tracing::info!(
        "Rendering {} namespaces / {} classes",
        dataset.namespaces.len(),
        dataset.class_count()
    );

    let written = render_markdown(&dataset, Path::new(&config.output.docs_dir))?;
    println!("Wrote {} pages to {}", written.len(), config.output.docs_dir);

    Ok(ExitCode::SUCCESS)
}

/// Handles the stats subcommand
fn handle_stats(config_path: &Path) -> Result<ExitCode, HarvestError> {
    let (config, _hash) = load(config_path)?;

    let store = open_checkpoint(Path::new(&config.output.checkpoint_path))?;

    if let Some(run) = store.latest_run()? {
        println!("Latest run: {} ({})", run.id, run.status.to_db_string());
        println!("  Started:  {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        println!("  Source:   {}", run.root_url);
    } else {
        println!("No runs recorded yet");
    }

    println!(
        "Checkpoints: {} done, {} failed, {} not found, {} pending",
        store.count_by_status(ItemStatus::Done)?,
        store.count_by_status(ItemStatus::Failed)?,
        store.count_by_status(ItemStatus::NotFound)?,
        store.count_by_status(ItemStatus::Pending)?,
    );

    Ok(ExitCode::SUCCESS)
}
