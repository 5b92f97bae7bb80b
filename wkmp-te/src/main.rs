//! wkmp-te - Tag Editor
//!
//! Applies a saved operation profile to the tags of audio files:
//! - `preview`: show the field changes without writing
//! - `apply`: write the changes (Ctrl+C stops after the current file)
//! - `scan-fields`: list non-standard fields found in the files
//! - `import-legacy`: convert a desktop-editor profile to the current format
//! - `init-config`: write a config file with the given defaults

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wkmp_common::config::{
    default_config_path, init_toml_config, load_toml_config_or_default, LoggingConfig,
    RootFolderResolver, TomlConfig,
};
use wkmp_te::batch::{BatchProcessor, BatchReport, PreviewReport};
use wkmp_te::field_scanner::FieldScanner;
use wkmp_te::profile::{selection_from, Profile};
use wkmp_te::scanner::FileScanner;
use wkmp_te::tags::{LoftyTagStore, TagStore};
use wkmp_te::FieldSelection;

/// Failures listed in the summary
const MAX_LISTED_FAILURES: usize = 10;

/// Command-line arguments for wkmp-te
#[derive(Parser, Debug)]
#[command(name = "wkmp-te")]
#[command(about = "Batch tag editor for WKMP music libraries")]
#[command(version)]
struct Args {
    /// Root folder containing music files (default target for commands)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file (default: <config dir>/wkmp/wkmp-te.toml)
    #[arg(short, long, env = "WKMP_TE_CONFIG")]
    config: Option<PathBuf>,

    /// Fields to edit, comma separated (overrides profile and config)
    #[arg(short, long, value_delimiter = ',', global = true)]
    fields: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the changes a profile would make
    Preview {
        /// Operation profile (JSON)
        #[arg(short, long)]
        profile: Option<PathBuf>,
        /// Files or directories; root folder when omitted
        paths: Vec<PathBuf>,
    },
    /// Apply a profile and write the changed tags
    Apply {
        /// Operation profile (JSON)
        #[arg(short, long)]
        profile: Option<PathBuf>,
        /// Files or directories; root folder when omitted
        paths: Vec<PathBuf>,
    },
    /// Count non-standard fields in the first files
    ScanFields {
        /// Number of files to sample
        #[arg(long, default_value_t = wkmp_te::field_scanner::DEFAULT_SAMPLE_SIZE)]
        sample_size: usize,
        /// Files or directories; root folder when omitted
        paths: Vec<PathBuf>,
    },
    /// Convert a legacy desktop-editor profile to the current format
    ImportLegacy { input: PathBuf, output: PathBuf },
    /// Write the config file from the resolved root folder, --fields and --profile
    InitConfig {
        /// Default operation profile
        #[arg(short, long)]
        profile: Option<PathBuf>,
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => default_config_path("wkmp-te").ok(),
    };
    let toml_config = config_path
        .as_deref()
        .map(load_toml_config_or_default)
        .unwrap_or_default();

    init_tracing(&toml_config.logging)?;

    info!("Starting wkmp-te (Tag Editor) v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = RootFolderResolver::new("tag-editor")
        .with_cli_arg(args.root_folder.clone())
        .with_toml_config(&toml_config)
        .resolve();

    let store: Arc<dyn TagStore> = Arc::new(LoftyTagStore::new());
    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    match args.command {
        Command::Preview { profile, paths } => {
            let profile = load_profile(profile, &toml_config)?;
            let selection = resolve_selection(&args.fields, &profile, &toml_config);
            let files = collect_files(paths, &root_folder)?;

            let batch = BatchProcessor::new(store, profile.operations, selection);
            let report = tokio::task::spawn_blocking(move || batch.preview(&files, &cancel))
                .await
                .context("Preview worker failed")?;

            print_preview(&report);
            Ok(exit_code(report.failed.is_empty()))
        }

        Command::Apply { profile, paths } => {
            let profile = load_profile(profile, &toml_config)?;
            let selection = resolve_selection(&args.fields, &profile, &toml_config);
            let files = collect_files(paths, &root_folder)?;

            let batch = BatchProcessor::new(store, profile.operations, selection);
            let report = tokio::task::spawn_blocking(move || {
                batch.run(&files, &cancel, |progress| {
                    info!(
                        "[{}/{}] {}",
                        progress.current,
                        progress.total,
                        progress.path.display()
                    );
                })
            })
            .await
            .context("Batch worker failed")?;

            print_report(&report);
            Ok(exit_code(report.is_success()))
        }

        Command::ScanFields { sample_size, paths } => {
            let files = collect_files(paths, &root_folder)?;
            let report = tokio::task::spawn_blocking(move || {
                FieldScanner::with_sample_size(sample_size).scan(&files, store.as_ref(), &cancel)
            })
            .await
            .context("Field scan worker failed")?;

            println!(
                "Scanned {} files ({} unreadable)",
                report.files_scanned, report.files_failed
            );
            for (field, count) in report.fields_by_frequency() {
                println!("  {:<24} {}", field, count);
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::ImportLegacy { input, output } => {
            let profile = Profile::load(&input)
                .with_context(|| format!("Failed to load profile {}", input.display()))?;
            profile
                .save(&output)
                .with_context(|| format!("Failed to write profile {}", output.display()))?;
            println!(
                "Converted {} operations to {}",
                profile.operations.len(),
                output.display()
            );
            Ok(ExitCode::SUCCESS)
        }

        Command::InitConfig { profile, force } => {
            let Some(path) = config_path else {
                bail!("Could not determine config directory (use --config)");
            };
            let config = TomlConfig {
                root_folder: Some(root_folder),
                profile: profile.or(toml_config.profile),
                selected_fields: (!args.fields.is_empty())
                    .then(|| selection_from(&args.fields).into_iter().collect()),
                logging: toml_config.logging,
            };
            init_toml_config(&config, &path, force)
                .with_context(|| format!("Failed to write config {}", path.display()))?;
            println!("Wrote {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `RUST_LOG` wins; otherwise the config's logging level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("wkmp_te=info"));

    match &logging.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

/// Cancel the batch on Ctrl+C; the current file is finished first
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, stopping after current file");
                cancel.cancel();
            }
            Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
        }
    });
}

fn load_profile(cli_profile: Option<PathBuf>, toml_config: &TomlConfig) -> Result<Profile> {
    let Some(path) = cli_profile.or_else(|| toml_config.profile.clone()) else {
        bail!("No operation profile given (use --profile or set `profile` in the config file)");
    };
    Profile::load(&path).with_context(|| format!("Failed to load profile {}", path.display()))
}

/// `--fields` → profile selection → config selection → standard fields
fn resolve_selection(cli_fields: &[String], profile: &Profile, toml_config: &TomlConfig) -> FieldSelection {
    if !cli_fields.is_empty() {
        return selection_from(cli_fields);
    }
    if !profile.selected_fields.is_empty() {
        return profile.selection();
    }
    selection_from(toml_config.selected_fields.as_deref().unwrap_or_default())
}

fn collect_files(paths: Vec<PathBuf>, root_folder: &std::path::Path) -> Result<Vec<PathBuf>> {
    let targets = if paths.is_empty() {
        vec![root_folder.to_path_buf()]
    } else {
        paths
    };

    let files = FileScanner::new()
        .collect(&targets)
        .context("Failed to collect audio files")?;
    info!("Found {} audio files", files.len());
    Ok(files)
}

fn print_preview(report: &PreviewReport) {
    let mut changed = 0;
    for preview in report.previews.iter().filter(|p| !p.changes.is_empty()) {
        changed += 1;
        println!("{}", preview.path.display());
        for change in &preview.changes {
            println!("  {}: {:?} -> {:?}", change.field, change.old, change.new);
        }
    }
    println!(
        "{} of {} files would change, {} unreadable",
        changed,
        report.previews.len() + report.failed.len(),
        report.failed.len()
    );
    print_failures(report.failed.iter().map(|f| (&f.path, &f.error)), report.failed.len());
}

fn print_report(report: &BatchReport) {
    let elapsed = report.finished_at - report.started_at;
    println!(
        "Done in {:.1}s - updated: {}, unchanged: {}, failed: {}",
        elapsed.num_milliseconds() as f64 / 1000.0,
        report.succeeded,
        report.unchanged,
        report.failed.len()
    );
    if report.cancelled {
        println!(
            "Cancelled: {} of {} files not processed",
            report.total - report.processed(),
            report.total
        );
    }
    print_failures(report.failed.iter().map(|f| (&f.path, &f.error)), report.failed.len());
}

fn print_failures<'a>(failures: impl Iterator<Item = (&'a PathBuf, &'a String)>, count: usize) {
    if count == 0 {
        return;
    }
    println!("Failed files:");
    for (path, error) in failures.take(MAX_LISTED_FAILURES) {
        println!("  {}: {}", path.display(), error);
    }
    if count > MAX_LISTED_FAILURES {
        println!("  ... and {} more", count - MAX_LISTED_FAILURES);
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
