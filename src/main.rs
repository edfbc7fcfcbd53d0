//! fk-name-fix CLI
//!
//! Entry point for the command-line tool.
//!
//! Exit codes:
//! - 0: Changelog fixed, or nothing to fix
//! - 1: `--check` found foreign keys without a constraint name
//! - 2: Tool error (usage, config error, parse failure, write failure)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fk_name_fix::config::OutputFormat;
use fk_name_fix::output::{JsonReporter, Reporter, RunMode, RunSummary, TextReporter};
use fk_name_fix::{ChangelogDocument, Config, fix_document};

/// Default config file name used when --config is not explicitly provided.
const DEFAULT_CONFIG_FILE: &str = "fk-name-fix.toml";

#[derive(Parser, Debug)]
#[command(name = "fk-name-fix")]
#[command(about = "Assign constraint names to unnamed foreign keys in a Liquibase XML changelog", long_about = None)]
struct Args {
    /// Path to the changelog to fix in place
    changelog: PathBuf,

    /// Path to configuration file
    #[arg(short, long, env = "FK_NAME_FIX_CONFIG")]
    config: Option<PathBuf>,

    /// Report missing names without writing; exit 1 if any are missing
    #[arg(long)]
    check: bool,

    /// Override output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fk_name_fix=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(missing_names) => {
            if missing_names {
                std::process::exit(1);
            }
            // exit 0 is implicit
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(2);
        }
    }
}

/// Fix (or check) one changelog.
///
/// Returns `Ok(true)` only in check mode when names are missing.
fn run(args: Args) -> Result<bool> {
    let config = load_config(&args.config)?;

    let mut doc = ChangelogDocument::from_file(&args.changelog)
        .context("Failed to load changelog")?;
    let report = fix_document(&mut doc, &config.naming);

    let mode = if args.check {
        RunMode::Check
    } else {
        RunMode::Write
    };

    if mode == RunMode::Write && report.is_modified() {
        doc.write_to_file(&args.changelog).with_context(|| {
            let names: Vec<&str> = report
                .injections
                .iter()
                .map(|i| i.constraint_name.as_str())
                .collect();
            format!(
                "Failed to write updated changelog (computed names: {})",
                names.join(", ")
            )
        })?;
    }

    let format = args.format.unwrap_or(config.output.format);
    let reporter: Box<dyn Reporter> = match format {
        OutputFormat::Text => Box::new(TextReporter::new()),
        OutputFormat::Json => Box::new(JsonReporter::new()),
    };
    let summary = RunSummary {
        file: &args.changelog,
        mode,
        report: &report,
    };
    let stdout = std::io::stdout();
    reporter
        .emit(&summary, &mut stdout.lock())
        .context("Failed to write report")?;

    Ok(mode == RunMode::Check && report.is_modified())
}

/// Load configuration from file.
///
/// If `config_path` is `Some`, the user explicitly passed `--config` and the file
/// must exist (error if not found). If `None`, the default config path is used;
/// a missing default config file is not an error (falls back to defaults).
fn load_config(config_path: &Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::from_file(path).context("Failed to load configuration")
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Config::from_file(&default_path).context("Failed to load configuration")
            } else {
                tracing::debug!(
                    "config file {} not found, using defaults",
                    default_path.display()
                );
                Ok(Config::default())
            }
        }
    }
}
