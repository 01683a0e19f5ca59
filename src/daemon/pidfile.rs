use std::path::{Path, PathBuf};
use tracing::warn;

use crate::common::errors::{InvCleanError, Result};

/// Holds a PID file for the lifetime of the daemon; removed on drop
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| InvCleanError::PidFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(path, std::process::id().to_string()).map_err(|e| {
            InvCleanError::PidFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove PID file {}: {}", self.path.display(), e);
            }
        }
    }
}
