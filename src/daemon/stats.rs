use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::warn;

use crate::cleaner::CleanupResult;
use crate::common::errors::{InvCleanError, Result};
use crate::scanner::DiskUsageSnapshot;

/// One line of the append-only statistics log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub timestamp: DateTime<Local>,
    pub disk_usage: DiskUsageSnapshot,
    pub cleanup_result: CleanupResult,
}

impl StatsRecord {
    pub fn new(disk_usage: DiskUsageSnapshot, cleanup_result: CleanupResult) -> Self {
        Self {
            timestamp: Local::now(),
            disk_usage,
            cleanup_result,
        }
    }
}

/// Append a record as a single JSON line
pub fn append(path: &Path, record: &StatsRecord) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| InvCleanError::io(dir, e))?;
    }
    let line = serde_json::to_string(record).map_err(|e| InvCleanError::Stats(e.to_string()))?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| InvCleanError::io(path, e))?;
    writeln!(file, "{}", line).map_err(|e| InvCleanError::io(path, e))?;
    Ok(())
}

/// Read the last `limit` records, oldest first.
/// Lines that do not parse are skipped with a warning.
pub fn read_recent(path: &Path, limit: usize) -> Result<Vec<StatsRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path).map_err(|e| InvCleanError::io(path, e))?;

    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| InvCleanError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<StatsRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping malformed stats line {}: {}", idx + 1, e),
        }
    }

    let skip = records.len().saturating_sub(limit);
    Ok(records.split_off(skip))
}
