//! Log source resolution.
//!
//! A source is a single log file, standard input, or a directory of log
//! files. Directory sources are scanned with the configured extensions and
//! drained in path order.

use crate::error::{AnalyzerError, Result};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Path argument that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Configuration for scanning directory sources.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include (e.g., ["log", "json"])
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["log", "json", "jsonl"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl From<&crate::config::SourceConfig> for ScanConfig {
    fn from(config: &crate::config::SourceConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
        }
    }
}

/// Where log lines are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    /// A single named file.
    File(PathBuf),
    /// Every matching file below a directory.
    Directory(PathBuf),
    /// The process's standard input.
    Stdin,
}

impl LogSource {
    /// Resolve a path argument into a source.
    pub fn resolve(path: &Path) -> Self {
        if path.as_os_str() == STDIN_PATH {
            LogSource::Stdin
        } else if path.is_dir() {
            LogSource::Directory(path.to_path_buf())
        } else {
            LogSource::File(path.to_path_buf())
        }
    }

    /// Open a named file for buffered line reading.
    pub fn open_file(path: &Path) -> Result<BufReader<File>> {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| AnalyzerError::source_unavailable(path, e))
    }

    /// Lock standard input for buffered line reading.
    pub fn open_stdin() -> Box<dyn BufRead> {
        Box::new(io::stdin().lock())
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::File(path) | LogSource::Directory(path) => write!(f, "{}", path.display()),
            LogSource::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// Scanner for log files inside a directory source.
pub struct LogScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl LogScanner {
    /// Create a new scanner rooted at `root`.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// List matching files in lexicographic path order.
    ///
    /// Symlinks are followed, so rotated logs linked into the directory are
    /// read. Dangling links are skipped.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

        for entry in walker {
            if let Err(ref e) = entry {
                let dangling = e.depth() > 0
                    && e.io_error().map(|io| io.kind()) == Some(io::ErrorKind::NotFound);
                if dangling {
                    warn!("Skipping dangling link: {}", e);
                    continue;
                }
            }

            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
                AnalyzerError::source_unavailable(path, source)
            })?;

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!(
            "Found {} log files in {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }

    /// Check if a file has one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.config.extensions.iter().any(|e| e == ext)
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|n| n.starts_with('.')).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_stdin() {
        assert_eq!(LogSource::resolve(Path::new("-")), LogSource::Stdin);
        assert_eq!(LogSource::Stdin.to_string(), "<stdin>");
    }

    #[test]
    fn test_resolve_file_and_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("ansible.log");
        fs::write(&file, "").unwrap();

        assert_eq!(
            LogSource::resolve(dir.path()),
            LogSource::Directory(dir.path().to_path_buf())
        );
        assert_eq!(LogSource::resolve(&file), LogSource::File(file.clone()));
    }

    #[test]
    fn test_resolve_missing_path_is_file() {
        let path = Path::new("/nonexistent/ansible.log");
        assert_eq!(
            LogSource::resolve(path),
            LogSource::File(path.to_path_buf())
        );
    }

    #[test]
    fn test_open_missing_file() {
        let err = LogSource::open_file(Path::new("/nonexistent/ansible.log")).unwrap_err();
        assert!(matches!(err, AnalyzerError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_scan_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::create_dir(dir.path().join(".archive")).unwrap();
        fs::write(dir.path().join("b.log"), "").unwrap();
        fs::write(dir.path().join("a.json"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden.log"), "").unwrap();
        fs::write(dir.path().join("nested/c.jsonl"), "").unwrap();
        fs::write(dir.path().join(".archive/old.log"), "").unwrap();

        let rotated = TempDir::new().unwrap();
        #[cfg(unix)]
        {
            fs::write(rotated.path().join("site.log.1"), "").unwrap();
            std::os::unix::fs::symlink(
                rotated.path().join("site.log.1"),
                dir.path().join("d-linked.log"),
            )
            .unwrap();
            std::os::unix::fs::symlink(
                dir.path().join("gone.log.1"),
                dir.path().join("e-dangling.log"),
            )
            .unwrap();
        }

        let scanner = LogScanner::new(dir.path().to_path_buf(), ScanConfig::default());
        let files = scanner.scan().unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().to_string())
            .collect();
        #[cfg(unix)]
        assert_eq!(names, vec!["a.json", "b.log", "d-linked.log", "nested/c.jsonl"]);
        #[cfg(not(unix))]
        assert_eq!(names, vec!["a.json", "b.log", "nested/c.jsonl"]);
    }

    #[test]
    fn test_custom_extensions() {
        let scanner = LogScanner::new(
            PathBuf::from("."),
            ScanConfig {
                extensions: vec!["txt".to_string()],
            },
        );

        assert!(scanner.matches(Path::new("run.txt")));
        assert!(!scanner.matches(Path::new("run.log")));
    }
}
