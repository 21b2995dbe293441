//! Event aggregation.
//!
//! This module drains a log source line by line, decodes the JSON events
//! and folds them into a [`RunStatistics`].

use crate::error::{AnalyzerError, Result};
use crate::models::{LogEvent, RunStatistics};
use crate::source::{LogScanner, LogSource, ScanConfig};
use std::io::{self, BufRead};
use std::path::Path;
use tracing::{debug, trace};

/// Result of decoding one log line.
#[derive(Debug)]
pub enum LineOutcome {
    /// The line held a JSON event record.
    Valid(LogEvent),
    /// The line was not an event record and is ignored.
    Skip,
}

/// Decode a single raw line.
pub fn classify_line(line: &[u8]) -> LineOutcome {
    match serde_json::from_slice::<LogEvent>(line) {
        Ok(event) => LineOutcome::Valid(event),
        Err(e) => {
            trace!("Skipping non-event line: {}", e);
            LineOutcome::Skip
        }
    }
}

/// Parse a log source into run statistics.
pub fn parse(source: &LogSource, scan_config: &ScanConfig) -> Result<RunStatistics> {
    let mut stats = RunStatistics::default();

    match source {
        LogSource::File(path) => {
            parse_file(path, &mut stats)?;
        }
        LogSource::Directory(root) => {
            let scanner = LogScanner::new(root.clone(), scan_config.clone());
            for path in scanner.scan()? {
                parse_file(&path, &mut stats)?;
            }
        }
        LogSource::Stdin => {
            stats = parse_reader(LogSource::open_stdin())
                .map_err(|e| AnalyzerError::source_unavailable(source.to_string(), e))?;
        }
    }

    debug!(
        "Parsed {}: {} tasks, {} hosts",
        source,
        stats.total_tasks,
        stats.host_count()
    );
    Ok(stats)
}

/// Parse any buffered reader into run statistics.
pub fn parse_reader<R: BufRead>(reader: R) -> io::Result<RunStatistics> {
    let mut stats = RunStatistics::default();
    drain(reader, &mut stats)?;
    Ok(stats)
}

fn parse_file(path: &Path, stats: &mut RunStatistics) -> Result<()> {
    debug!("Reading {}", path.display());
    let reader = LogSource::open_file(path)?;
    drain(reader, stats).map_err(|e| AnalyzerError::source_unavailable(path, e))
}

fn drain<R: BufRead>(reader: R, stats: &mut RunStatistics) -> io::Result<()> {
    let mut skipped = 0usize;

    for line in reader.split(b'\n') {
        match classify_line(&line?) {
            LineOutcome::Valid(event) => {
                trace!("Event: {}", event.kind());
                stats.record(&event);
            }
            LineOutcome::Skip => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Ignored {} non-JSON lines", skipped);
    }
    Ok(())
}
