use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;
use walkdir::WalkDir;

use super::preserve::PreserveSet;

const SECS_PER_DAY: u64 = 86_400;
const BYTES_PER_MB: u64 = 1024 * 1024;

/// A regular file seen during a walk
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Walk every regular file under `root`.
///
/// Symlinks are not followed. Entries whose metadata cannot be read are
/// skipped, as are subtrees that cannot be listed; an unreadable root simply
/// yields nothing. Visit order is whatever the filesystem returns.
pub fn walk_files(root: &Path) -> impl Iterator<Item = FileRecord> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                debug!("Walk error under {}: {}", root_display(&e), e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let metadata = match e.metadata() {
                Ok(m) => m,
                Err(err) => {
                    debug!("Skipping {}: {}", e.path().display(), err);
                    return None;
                }
            };
            Some(FileRecord {
                path: e.into_path(),
                size: metadata.len(),
                modified: metadata.modified().ok()?,
            })
        })
}

fn root_display(e: &walkdir::Error) -> String {
    e.path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown>".into())
}

/// True if `modified` lies strictly more than `days` before `now`.
/// Timestamps in the future are never old.
pub fn is_older_than(modified: SystemTime, days: u64, now: SystemTime) -> bool {
    let threshold = Duration::from_secs(days.saturating_mul(SECS_PER_DAY));
    now.duration_since(modified)
        .map(|age| age > threshold)
        .unwrap_or(false)
}

/// True if `size` is strictly greater than `mb` mebibytes
pub fn exceeds_mb(size: u64, mb: u64) -> bool {
    size > mb.saturating_mul(BYTES_PER_MB)
}

/// Finds cleanup candidates under a directory, honouring preserve patterns.
///
/// `find_old` and `find_large` are independent passes. Results are sorted by
/// path so repeated runs over an unchanged tree report identically.
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    preserve: PreserveSet,
}

impl DirectoryScanner {
    pub fn new(preserve: PreserveSet) -> Self {
        Self { preserve }
    }

    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self::new(PreserveSet::new(patterns))
    }

    fn candidates<'a>(&'a self, directory: &Path) -> impl Iterator<Item = FileRecord> + 'a {
        walk_files(directory).filter(move |r| {
            let keep = !self.preserve.is_preserved(&r.path);
            if !keep {
                debug!("Preserved: {}", r.path.display());
            }
            keep
        })
    }

    /// Files under `directory` last modified more than `days` days ago
    pub fn find_old(&self, directory: &Path, days: u64) -> Vec<PathBuf> {
        self.find_old_at(directory, days, SystemTime::now())
    }

    /// [`find_old`](Self::find_old) against a fixed clock
    pub fn find_old_at(&self, directory: &Path, days: u64, now: SystemTime) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = self
            .candidates(directory)
            .filter(|r| is_older_than(r.modified, days, now))
            .map(|r| r.path)
            .collect();
        found.sort();
        found
    }

    /// Files under `directory` larger than `mb` MiB, with their sizes
    pub fn find_large(&self, directory: &Path, mb: u64) -> Vec<(PathBuf, u64)> {
        let mut found: Vec<(PathBuf, u64)> = self
            .candidates(directory)
            .filter(|r| exceeds_mb(r.size, mb))
            .map(|r| (r.path, r.size))
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        found
    }
}
