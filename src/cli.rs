//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ansible log analyzer - summarize a playbook run from its JSON callback log
///
/// Counts ok, changed, failed and skipped tasks, lists failures and prints
/// the success rate. Exits with 1 when any task failed or the log could
/// not be read, so cron wrappers can alert on the status code.
///
/// Examples:
///   ansible-log-analyzer
///   ansible-log-analyzer /var/log/ansible/site-2024-03-01.log
///   ansible-playbook site.yml | ansible-log-analyzer -
///   ansible-log-analyzer /var/log/ansible/ --format json
///   ansible-log-analyzer --init-config
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Log file, directory of log files, or `-` for standard input
    ///
    /// Defaults to the configured log file (/var/log/ansible/ansible.log).
    #[arg(value_name = "LOG_FILE", env = "ANSIBLE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ansible-log-analyzer.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log file extensions read from a directory (comma-separated)
    ///
    /// Example: --extensions log,jsonl
    #[arg(long, value_name = "EXTS", value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .ansible-log-analyzer.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text execution report (default)
    #[default]
    Text,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref log_file) = self.log_file {
            if log_file.as_os_str().is_empty() {
                return Err("Log file path must not be empty".to_string());
            }
        }

        if let Some(ref extensions) = self.extensions {
            if extensions.iter().any(|e| e.is_empty() || e.starts_with('.')) {
                return Err("Extensions must be non-empty and given without a leading dot".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}
