//! Error types for log analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a log source.
///
/// Lines that fail JSON decoding are not errors; they are dropped during
/// parsing and never surface here.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The source could not be opened or read to the end.
    #[error("Log file {} could not be read: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalyzerError {
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalyzerError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
