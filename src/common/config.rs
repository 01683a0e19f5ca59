use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::errors::{InvCleanError, Result};

/// Environment variable that relocates the invclean data directory
pub const HOME_ENV: &str = "INVCLEAN_HOME";

/// Longest accepted `scan_interval_hours` (one year)
pub const MAX_SCAN_INTERVAL_HOURS: u64 = 24 * 365;

/// Global invclean configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Master switch; when false every cleanup run is a no-op
    #[serde(default = "default_true")]
    pub cleaning_enabled: bool,

    /// Hours between scheduled runs in daemon mode
    #[serde(default = "default_interval_hours")]
    pub scan_interval_hours: u64,

    /// Files older than this many days are eligible for removal
    #[serde(default = "default_days_old")]
    pub days_old: u64,

    /// Large file threshold in MB
    #[serde(default = "default_large_file_mb")]
    pub large_file_mb: u64,

    /// Directories measured by disk usage analysis
    #[serde(default = "default_directories_to_scan")]
    pub directories_to_scan: Vec<PathBuf>,

    /// Whether the host should raise a notification after reclaiming space
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    /// Glob patterns matched against file names that are never removed
    #[serde(default = "default_preserve_files")]
    pub preserve_files: Vec<String>,

    /// Directories cleaned on every run, in order.
    /// Kept last so TOML emits it as trailing `[[directories_to_clean]]` tables.
    #[serde(default = "default_directories_to_clean")]
    pub directories_to_clean: Vec<CleanTarget>,
}

/// A directory the cleanup engine processes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CleanTargetRepr")]
pub struct CleanTarget {
    pub path: PathBuf,

    /// Also remove files over the large file threshold, regardless of age
    #[serde(default)]
    pub large_files: bool,
}

/// Accepts either `"/var/log"` or `{ path = "/tmp", large_files = true }`
#[derive(Deserialize)]
#[serde(untagged)]
enum CleanTargetRepr {
    Bare(PathBuf),
    Table {
        path: PathBuf,
        #[serde(default)]
        large_files: bool,
    },
}

impl From<CleanTargetRepr> for CleanTarget {
    fn from(repr: CleanTargetRepr) -> Self {
        match repr {
            CleanTargetRepr::Bare(path) => CleanTarget {
                path,
                large_files: false,
            },
            CleanTargetRepr::Table { path, large_files } => CleanTarget { path, large_files },
        }
    }
}

impl CleanTarget {
    pub fn new(path: impl Into<PathBuf>, large_files: bool) -> Self {
        Self {
            path: path.into(),
            large_files,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_interval_hours() -> u64 {
    1
}
fn default_days_old() -> u64 {
    7
}
fn default_large_file_mb() -> u64 {
    200
}
fn default_directories_to_clean() -> Vec<CleanTarget> {
    vec![
        CleanTarget::new("/var/log", false),
        CleanTarget::new("/tmp", true),
        CleanTarget::new("/var/tmp", true),
    ]
}
fn default_directories_to_scan() -> Vec<PathBuf> {
    ["/var/log", "/tmp", "/var/tmp", "/home", "/usr/share", "/var/cache"]
        .iter()
        .map(PathBuf::from)
        .collect()
}
fn default_preserve_files() -> Vec<String> {
    vec!["*.conf".into(), "*.cfg".into(), "*.config".into()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cleaning_enabled: true,
            scan_interval_hours: default_interval_hours(),
            days_old: default_days_old(),
            large_file_mb: default_large_file_mb(),
            directories_to_scan: default_directories_to_scan(),
            notifications_enabled: true,
            preserve_files: default_preserve_files(),
            directories_to_clean: default_directories_to_clean(),
        }
    }
}

impl Config {
    /// Get the invclean data directory (`$INVCLEAN_HOME` or ~/.invclean)
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".invclean")
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Get the logs directory
    pub fn logs_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Append-only statistics log written by the daemon
    pub fn stats_path() -> PathBuf {
        Self::logs_dir().join("invclean-stats.jsonl")
    }

    /// Load config from file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents =
            std::fs::read_to_string(path).map_err(|e| InvCleanError::io(path, e))?;
        let config: Config = toml::from_str(&contents).map_err(|e| InvCleanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load config, falling back to defaults on any error.
    /// Configuration problems are never fatal to a run.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using built-in defaults", e);
                Config::default()
            }
        }
    }

    /// Rewrite the whole config file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| InvCleanError::io(dir, e))?;
        }
        let contents = toml::to_string_pretty(self).map_err(|e| InvCleanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, contents).map_err(|e| InvCleanError::io(path, e))?;
        Ok(())
    }

    /// Initialize the data and logs directories
    pub fn init_dirs() -> Result<()> {
        for dir in [Self::data_dir(), Self::logs_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| InvCleanError::io(&dir, e))?;
        }
        Ok(())
    }

    /// Reject values the scheduler or classifier cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.scan_interval_hours == 0 {
            return Err(InvCleanError::InvalidConfig(
                "scan_interval_hours must be at least 1".into(),
            ));
        }
        if self.scan_interval_hours > MAX_SCAN_INTERVAL_HOURS {
            return Err(InvCleanError::InvalidConfig(format!(
                "scan_interval_hours must be at most {}",
                MAX_SCAN_INTERVAL_HOURS
            )));
        }
        if self.preserve_files.iter().any(|p| p.trim().is_empty()) {
            return Err(InvCleanError::InvalidConfig(
                "preserve_files contains an empty pattern".into(),
            ));
        }
        if self
            .directories_to_clean
            .iter()
            .any(|t| t.path.as_os_str().is_empty())
        {
            return Err(InvCleanError::InvalidConfig(
                "directories_to_clean contains an empty path".into(),
            ));
        }
        Ok(())
    }

    /// Get large file threshold in bytes
    pub fn large_file_threshold_bytes(&self) -> u64 {
        self.large_file_mb.saturating_mul(1024 * 1024)
    }

    /// Update a single key from its textual form.
    ///
    /// List keys take comma-separated values. Entries of
    /// `directories_to_clean` may carry a `:large` suffix to enable the
    /// large file pass for that directory.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |e: &dyn std::fmt::Display| {
            InvCleanError::InvalidConfig(format!("{} = {:?}: {}", key, value, e))
        };
        let list = || -> Vec<String> {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        };

        match key {
            "cleaning_enabled" => {
                self.cleaning_enabled = value.parse::<bool>().map_err(|e| invalid(&e))?
            }
            "notifications_enabled" => {
                self.notifications_enabled = value.parse::<bool>().map_err(|e| invalid(&e))?
            }
            "scan_interval_hours" => {
                self.scan_interval_hours = value.parse::<u64>().map_err(|e| invalid(&e))?
            }
            "days_old" => self.days_old = value.parse::<u64>().map_err(|e| invalid(&e))?,
            "large_file_mb" => {
                self.large_file_mb = value.parse::<u64>().map_err(|e| invalid(&e))?
            }
            "preserve_files" => self.preserve_files = list(),
            "directories_to_scan" => {
                self.directories_to_scan = list().into_iter().map(PathBuf::from).collect()
            }
            "directories_to_clean" => {
                self.directories_to_clean = list()
                    .into_iter()
                    .map(|entry| match entry.strip_suffix(":large") {
                        Some(path) => CleanTarget::new(path, true),
                        None => CleanTarget::new(entry, false),
                    })
                    .collect()
            }
            _ => return Err(InvCleanError::UnknownKey(key.to_string())),
        }

        self.validate()
    }
}
