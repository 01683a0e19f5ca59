use std::path::PathBuf;

use thiserror::Error;

/// Typed errors for invclean operations.
/// The binary wraps these in `anyhow` for reporting, but library modules
/// stay precise about what failed and where.
#[derive(Error, Debug)]
pub enum InvCleanError {
    /// File system operation failed
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be read or parsed
    #[error("Config error in '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// Configuration parsed but holds values the engine cannot run with
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// `config set` was given a key that does not exist
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Statistics log could not be written or parsed
    #[error("Statistics error: {0}")]
    Stats(String),

    /// PID file could not be created
    #[error("PID file error at '{}': {message}", .path.display())]
    PidFile { path: PathBuf, message: String },
}

impl InvCleanError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InvCleanError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, InvCleanError>;
