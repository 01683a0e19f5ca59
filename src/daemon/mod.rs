pub mod pidfile;
pub mod scheduler;
pub mod stats;

pub use pidfile::PidFile;
pub use scheduler::{Schedule, Scheduler, StopSignal, Trigger};
pub use stats::StatsRecord;

use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

use crate::cleaner::{CleanupEngine, ReportSink, RunMode};
use crate::common::config::Config;
use crate::scanner::usage;

/// One scheduled pass: measure, clean, record statistics, notify.
///
/// Never fails; a statistics write error is logged and the record is still
/// returned to the caller.
pub fn scheduled_task(config: &Config, sink: &dyn ReportSink, stats_path: &Path) -> StatsRecord {
    info!("Running scheduled cleanup");

    let disk_usage = usage::analyze(&config.directories_to_scan);
    let result = CleanupEngine::new(sink).run(config, RunMode::Live);

    if result.should_notify(config) {
        info!(
            target: "invclean::notify",
            "Disk cleaner: reclaimed {:.0} MB from {} files",
            result.total_mb(),
            result.files_processed
        );
    }

    let record = StatsRecord::new(disk_usage, result);
    if let Err(e) = stats::append(stats_path, &record) {
        error!("Failed to write statistics: {}", e);
    }
    record
}

/// Run the scheduled task every `scan_interval_hours` until `stop` is raised
pub fn run(
    config: &Config,
    scheduler: &Scheduler,
    sink: &dyn ReportSink,
    stop: &StopSignal,
    stats_path: &Path,
) -> usize {
    info!(
        "Schedule set to every {} hour(s)",
        scheduler.interval.as_secs() / 3600
    );
    scheduler.run(stop, |_| {
        scheduled_task(config, sink, stats_path);
    })
}

/// Interval implied by the configuration
pub fn configured_interval(config: &Config) -> Duration {
    Duration::from_secs(config.scan_interval_hours.max(1).saturating_mul(3600))
}
