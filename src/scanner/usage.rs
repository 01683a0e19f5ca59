use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::walker::walk_files;
use crate::common::format::to_mb;

/// Measured size of one directory tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirUsage {
    pub size_bytes: u64,
    pub size_mb: f64,
    pub size_gb: f64,
}

impl DirUsage {
    pub fn new(size_bytes: u64) -> Self {
        Self {
            size_bytes,
            size_mb: to_mb(size_bytes),
            size_gb: to_mb(size_bytes) / 1024.0,
        }
    }
}

/// Directory path -> usage, recomputed from scratch on every analysis
pub type DiskUsageSnapshot = BTreeMap<PathBuf, DirUsage>;

/// Total size of all regular files under `path`. No filtering is applied.
pub fn dir_size(path: &Path) -> u64 {
    walk_files(path).map(|r| r.size).sum()
}

/// Measure each existing directory; missing ones are left out of the snapshot
pub fn analyze<P: AsRef<Path>>(directories: &[P]) -> DiskUsageSnapshot {
    let mut snapshot = DiskUsageSnapshot::new();
    for dir in directories {
        let dir = dir.as_ref();
        if !dir.exists() {
            debug!("Skipping missing directory {}", dir.display());
            continue;
        }
        let size = dir_size(dir);
        debug!("{}: {:.2} MB", dir.display(), to_mb(size));
        snapshot.insert(dir.to_path_buf(), DirUsage::new(size));
    }
    snapshot
}

/// Sum of every directory in a snapshot
pub fn snapshot_total(snapshot: &DiskUsageSnapshot) -> u64 {
    snapshot.values().map(|u| u.size_bytes).sum()
}
