use chrono::Local;
use colored::*;
use std::sync::Mutex;
use tracing::{info, warn};

/// Receives human-readable progress lines from the cleanup engine.
///
/// The engine only ever writes to a sink; hosts decide where lines go
/// (log file, live console, a GUI status area).
pub trait ReportSink {
    fn emit(&self, message: &str);

    /// Failure lines. Defaults to a plain `emit`.
    fn error(&self, message: &str) {
        self.emit(message);
    }
}

/// Forwards lines to `tracing`; the daemon's sink
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Live console: timestamped lines on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn emit(&self, message: &str) {
        println!(
            "{} {}",
            format!("[{}]", Local::now().format("%H:%M:%S")).dimmed(),
            message
        );
    }

    fn error(&self, message: &str) {
        println!(
            "{} {}",
            format!("[{}]", Local::now().format("%H:%M:%S")).dimmed(),
            message.red()
        );
    }
}

/// Buffers every line in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line emitted so far, errors included, in order
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Only the lines emitted through `error`
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl ReportSink for CollectingSink {
    fn emit(&self, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_string());
        }
    }

    fn error(&self, message: &str) {
        self.emit(message);
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(message.to_string());
        }
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn emit(&self, _message: &str) {}
}
