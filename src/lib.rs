//! # invclean
//!
//! A disk-space reclamation utility for Linux.
//!
//! invclean walks a configured set of directories, finds files that are
//! older than a retention threshold or larger than a size threshold, and
//! removes them. It features:
//!
//! - **Preserve Patterns**: glob patterns on file names that are never touched
//! - **Dry Run**: simulated runs report what would be reclaimed without deleting
//! - **Daemon Mode**: scheduled cleanup with an append-only statistics log
//! - **Disk Usage Analysis**: per-directory size snapshots
//! - **Pluggable Reporting**: progress lines go to logs, a console, or any host

pub mod cleaner;
pub mod cli;
pub mod common;
pub mod daemon;
pub mod scanner;
