pub mod preserve;
pub mod usage;
pub mod walker;

pub use preserve::{is_preserved, PreserveSet};
pub use usage::{analyze, dir_size, DirUsage, DiskUsageSnapshot};
pub use walker::{walk_files, DirectoryScanner, FileRecord};
