use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::report::ReportSink;
use crate::common::config::{CleanTarget, Config};
use crate::common::format::{self, format_size};
use crate::scanner::walker::DirectoryScanner;

/// Run mode determines whether matched files are removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Files are deleted
    Live,
    /// Dry run: files are counted as if deleted but left in place
    Simulated,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Live => write!(f, "live"),
            RunMode::Simulated => write!(f, "simulated"),
        }
    }
}

/// Which rule made a file eligible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Age,
    Size,
}

impl Rule {
    fn noun(self) -> &'static str {
        match self {
            Rule::Age => "old file",
            Rule::Size => "large file",
        }
    }
}

/// Summary of one cleanup run. Returned to the caller once finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupResult {
    pub mode: RunMode,
    pub total_bytes_reclaimed: u64,
    /// Bytes from the age rule
    pub age_bytes: u64,
    /// Bytes from the large file rule
    pub large_bytes: u64,
    pub files_processed: usize,
    pub file_list: Vec<PathBuf>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// Per-file failures; none of them abort a run
    pub errors: Vec<String>,
}

impl CleanupResult {
    fn empty(mode: RunMode) -> Self {
        let now = Local::now();
        Self {
            mode,
            total_bytes_reclaimed: 0,
            age_bytes: 0,
            large_bytes: 0,
            files_processed: 0,
            file_list: Vec::new(),
            started_at: now,
            finished_at: now,
            errors: Vec::new(),
        }
    }

    fn record(&mut self, path: &Path, size: u64, rule: Rule) {
        match rule {
            Rule::Age => self.age_bytes += size,
            Rule::Size => self.large_bytes += size,
        }
        self.files_processed += 1;
        self.file_list.push(path.to_path_buf());
    }

    fn finalize(&mut self) {
        self.total_bytes_reclaimed = self.age_bytes + self.large_bytes;
        self.finished_at = Local::now();
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn total_mb(&self) -> f64 {
        format::to_mb(self.total_bytes_reclaimed)
    }

    /// Whether the host should raise a "space reclaimed" notification
    pub fn should_notify(&self, config: &Config) -> bool {
        self.total_bytes_reclaimed > 0 && config.notifications_enabled
    }
}

/// Scans configured directories and removes (or simulates removing)
/// files that are too old, or too large in directories that opt in.
///
/// Holds no state between runs. Callers must not start two runs over the
/// same directories at once.
pub struct CleanupEngine<'a> {
    sink: &'a dyn ReportSink,
}

impl<'a> CleanupEngine<'a> {
    pub fn new(sink: &'a dyn ReportSink) -> Self {
        Self { sink }
    }

    pub fn run(&self, config: &Config, mode: RunMode) -> CleanupResult {
        let mut result = CleanupResult::empty(mode);

        if !config.cleaning_enabled {
            self.sink.emit("Cleaning is disabled in configuration");
            return result;
        }

        info!(mode = %mode, dirs = config.directories_to_clean.len(), "Starting cleanup");
        let scanner = DirectoryScanner::from_patterns(&config.preserve_files);
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for target in &config.directories_to_clean {
            self.clean_directory(&scanner, target, config, mode, &mut seen, &mut result);
        }

        result.finalize();
        self.emit_summary(&result);
        info!(
            mode = %mode,
            bytes = result.total_bytes_reclaimed,
            files = result.files_processed,
            errors = result.errors.len(),
            "Cleanup finished"
        );
        result
    }

    fn clean_directory(
        &self,
        scanner: &DirectoryScanner,
        target: &CleanTarget,
        config: &Config,
        mode: RunMode,
        seen: &mut HashSet<PathBuf>,
        result: &mut CleanupResult,
    ) {
        let dir = &target.path;
        if !dir.exists() {
            self.sink
                .emit(&format!("Skipping missing directory: {}", dir.display()));
            return;
        }
        if !dir.is_dir() {
            self.sink
                .error(&format!("Skipping {}: not a directory", dir.display()));
            return;
        }
        self.sink.emit(&format!("Scanning directory: {}", dir.display()));

        let old = scanner.find_old(dir, config.days_old);
        if !old.is_empty() {
            self.sink.emit(&format!(
                "Found {} old {} in {}",
                old.len(),
                plural(old.len()),
                dir.display()
            ));
        }
        for path in &old {
            self.process_file(path, Rule::Age, mode, seen, result);
        }

        if target.large_files {
            let large = scanner.find_large(dir, config.large_file_mb);
            if !large.is_empty() {
                self.sink.emit(&format!(
                    "Found {} large {} in {}",
                    large.len(),
                    plural(large.len()),
                    dir.display()
                ));
            }
            for (path, _) in &large {
                self.process_file(path, Rule::Size, mode, seen, result);
            }
        }
    }

    fn process_file(
        &self,
        path: &Path,
        rule: Rule,
        mode: RunMode,
        seen: &mut HashSet<PathBuf>,
        result: &mut CleanupResult,
    ) {
        // A file both old and large is handled by the age pass only
        if !seen.insert(path.to_path_buf()) {
            return;
        }

        let size = match std::fs::metadata(path) {
            Ok(m) => m.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Already gone: {}", path.display());
                self.sink
                    .emit(&format!("Skipping vanished file: {}", path.display()));
                return;
            }
            Err(e) => {
                self.fail(path, &e, result);
                return;
            }
        };

        match mode {
            RunMode::Simulated => {
                result.record(path, size, rule);
                self.sink.emit(&format!(
                    "Would remove {}: {} ({})",
                    rule.noun(),
                    path.display(),
                    format_size(size)
                ));
            }
            RunMode::Live => match std::fs::remove_file(path) {
                Ok(()) => {
                    result.record(path, size, rule);
                    self.sink.emit(&format!(
                        "Removed {}: {} ({})",
                        rule.noun(),
                        path.display(),
                        format_size(size)
                    ));
                }
                Err(e) => self.fail(path, &e, result),
            },
        }
    }

    fn fail(&self, path: &Path, e: &std::io::Error, result: &mut CleanupResult) {
        let message = format!("Failed to remove {}: {}", path.display(), e);
        self.sink.error(&message);
        result.errors.push(message);
    }

    fn emit_summary(&self, result: &CleanupResult) {
        let secs = result.duration().num_milliseconds().max(0) as f64 / 1000.0;
        let verb = match result.mode {
            RunMode::Live => "reclaimed",
            RunMode::Simulated => "would reclaim",
        };
        self.sink.emit(&format!(
            "Cleanup finished in {}: {} {} from {}",
            format::format_duration(secs),
            verb,
            format_size(result.total_bytes_reclaimed),
            format::format_count(result.files_processed)
        ));
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "file"
    } else {
        "files"
    }
}
