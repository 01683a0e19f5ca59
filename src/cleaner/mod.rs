pub mod engine;
pub mod report;

pub use engine::{CleanupEngine, CleanupResult, RunMode};
pub use report::{CollectingSink, ConsoleSink, NullSink, ReportSink, TracingSink};
