//! CLI entry point for pdf-harvest.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use harvest_core::config::{
    DEFAULT_BASE_DOMAIN, DEFAULT_INPUT_FILE, DEFAULT_LEDGER_FILE, DEFAULT_OUTPUT_DIR,
};
use harvest_core::download::constants::DEFAULT_TIMEOUT_SECS;
use harvest_core::{HarvestConfig, Harvester, SeenLedger};
use tracing::{debug, error, info, warn};

mod app_config;
mod cli;

use app_config::{FileConfig, load_file_config};
use cli::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // The config file may carry the verbosity, so it is read before tracing
    // starts and its error reported once logging is up.
    let loaded = load_file_config(args.config.as_deref());
    let file_config = loaded
        .as_ref()
        .ok()
        .and_then(|loaded| loaded.config.clone());

    init_tracing(default_log_level(&args, file_config.as_ref()), no_color_requested());

    let loaded = match loaded {
        Ok(loaded) => loaded,
        Err(err) => {
            error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };
    debug!(?args, config_path = ?loaded.path, "CLI arguments parsed");

    let file_config = file_config.unwrap_or_default();
    let outcome = match args.command {
        Some(Command::VerifyLedger) => verify_ledger(&args, &file_config).await,
        None => harvest(&args, &file_config).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn harvest(args: &Args, file_config: &FileConfig) -> Result<()> {
    let config = merge_config(args, file_config);
    info!(
        input = %config.input_file.display(),
        ledger = %config.ledger_file.display(),
        output_dir = %config.output_dir.display(),
        base_domain = %config.base_domain,
        record_only = config.record_only,
        "pdf-harvest starting"
    );

    let harvester = Harvester::new(config).context("Invalid configuration")?;
    harvester.run().await?;
    Ok(())
}

async fn verify_ledger(args: &Args, file_config: &FileConfig) -> Result<()> {
    let config = merge_config(args, file_config);
    let ledger = SeenLedger::load_existing(&config.ledger_file, config.ledger_match).await?;
    let audit = ledger.audit();

    for (line, entry) in &audit.invalid {
        warn!(line, entry = %entry, "invalid ledger entry");
    }
    info!(
        total = audit.total(),
        valid = audit.valid,
        invalid = audit.invalid.len(),
        "ledger verified"
    );
    println!(
        "{}: {} entries, {} valid, {} invalid",
        config.ledger_file.display(),
        audit.total(),
        audit.valid,
        audit.invalid.len()
    );
    Ok(())
}

/// Layers CLI flags over the config file over built-in defaults.
fn merge_config(args: &Args, file: &FileConfig) -> HarvestConfig {
    let timeout_secs = args
        .timeout
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    HarvestConfig {
        input_file: pick_path(args.input.as_ref(), file.input_file.as_ref(), DEFAULT_INPUT_FILE),
        ledger_file: pick_path(
            args.ledger.as_ref(),
            file.ledger_file.as_ref(),
            DEFAULT_LEDGER_FILE,
        ),
        output_dir: pick_path(
            args.output_dir.as_ref(),
            file.output_dir.as_ref(),
            DEFAULT_OUTPUT_DIR,
        ),
        base_domain: args
            .base_domain
            .clone()
            .or_else(|| file.base_domain.clone())
            .unwrap_or_else(|| DEFAULT_BASE_DOMAIN.to_string()),
        timeout: Duration::from_secs(timeout_secs),
        ledger_match: args.ledger_match.or(file.ledger_match).unwrap_or_default(),
        include_relative: !args.absolute_only && file.include_relative.unwrap_or(true),
        record_only: args.record_only,
    }
}

fn pick_path(cli: Option<&PathBuf>, file: Option<&PathBuf>, default: &str) -> PathBuf {
    cli.or(file)
        .cloned()
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Priority: quiet flag > verbose flag > config file > info.
/// `RUST_LOG` still overrides whatever this returns.
fn default_log_level(args: &Args, file: Option<&FileConfig>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => file
            .and_then(|file| file.verbosity)
            .map_or("info", app_config::VerbositySetting::log_level),
        1 => "debug",
        _ => "trace",
    }
}

fn no_color_requested() -> bool {
    let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    let dumb_terminal = std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false);
    no_color_env || dumb_terminal
}

fn init_tracing(default_level: &str, no_color: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}
