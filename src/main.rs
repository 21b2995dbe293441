//! Ansible log analyzer
//!
//! Reads the line-delimited JSON written by Ansible's callback plugin,
//! counts task outcomes and prints an execution report.
//!
//! Exit codes:
//!   0 - Log read and no task failed
//!   1 - A task failed, the log could not be read, or the configuration is invalid

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod source;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use error::AnalyzerError;
use models::ReportMetadata;
use source::{LogSource, ScanConfig};
use std::io::Write;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Config is read before logging so `general.verbose` can raise the level
    let config = load_config(&args);
    let config_verbose = config
        .as_ref()
        .map(|c| c.general.verbose)
        .unwrap_or(false);
    init_logging(&args, config_verbose);

    debug!("Arguments: {:?}", args);

    match config.and_then(|config| run(args, config)) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            debug!("Analysis aborted: {:?}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default config file.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging on stderr; stdout carries the report.
fn init_logging(args: &Args, config_verbose: bool) {
    let level = if config_verbose && !args.quiet {
        Level::DEBUG
    } else {
        args.log_level()
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Run one analysis. Returns the process exit code.
fn run(args: Args, mut config: Config) -> Result<i32> {
    config.merge_with_args(&args);

    let source = LogSource::resolve(&config.general.log_file);
    let scan_config = ScanConfig::from(&config.source);
    info!("Analyzing {}", source);

    let stats = match analysis::parse(&source, &scan_config) {
        Ok(stats) => stats,
        Err(e @ AnalyzerError::SourceUnavailable { .. }) => {
            eprintln!("Error: {}", e);
            return Ok(1);
        }
    };

    let metadata = ReportMetadata::now(source.to_string());
    let (text, success) = report::report(&stats, &metadata);

    let output = match config.report.format {
        OutputFormat::Text => text,
        OutputFormat::Json => format!("{}\n", report::generate_json_report(&stats, &metadata)?),
    };

    match args.output {
        Some(ref path) => {
            report::write_report(&output, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => {
            // process::exit skips destructors, so flush explicitly
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }

    if !success {
        warn!("{} failed tasks recorded", stats.failed_tasks);
        return Ok(1);
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is initialized, so it reports through its result only.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    Ok(Config::load_default()?.unwrap_or_default())
}
