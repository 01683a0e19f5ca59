use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use invclean::common::config::{CleanTarget, Config, MAX_SCAN_INTERVAL_HOURS};
use invclean::scanner::usage;
use invclean::scanner::walker::{self, DirectoryScanner};

const DAY: u64 = 86_400;
const MB: usize = 1024 * 1024;

/// Write `len` bytes to `dir/name` and backdate its mtime by `age_days`
fn write_aged(dir: &Path, name: &str, len: usize, age_days: u64) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, vec![0u8; len]).unwrap();
    let file = std::fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(age_days * DAY))
        .unwrap();
    path
}

// ─── Config tests ─────────────────────────────────────────────────────────────

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert!(config.cleaning_enabled);
    assert!(config.notifications_enabled);
    assert_eq!(config.scan_interval_hours, 1);
    assert_eq!(config.days_old, 7);
    assert_eq!(config.large_file_mb, 200);
    assert_eq!(config.preserve_files, vec!["*.conf", "*.cfg", "*.config"]);
    assert_eq!(
        config.directories_to_clean,
        vec![
            CleanTarget::new("/var/log", false),
            CleanTarget::new("/tmp", true),
            CleanTarget::new("/var/tmp", true),
        ]
    );
    assert_eq!(config.directories_to_scan.len(), 6);
}

#[test]
fn test_config_large_file_threshold_bytes() {
    let mut config = Config::default();
    assert_eq!(config.large_file_threshold_bytes(), 200 * 1024 * 1024);
    config.large_file_mb = u64::MAX;
    assert_eq!(config.large_file_threshold_bytes(), u64::MAX);
}

#[test]
fn test_config_missing_file_yields_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from(&tmp.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_save_load_roundtrip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested/config.toml");

    let mut config = Config::default();
    config.days_old = 14;
    config.directories_to_clean = vec![
        CleanTarget::new("/srv/logs", false),
        CleanTarget::new("/srv/tmp", true),
    ];
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_accepts_bare_and_table_targets() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
days_old = 3
directories_to_clean = ["/var/log", { path = "/tmp", large_files = true }]
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.days_old, 3);
    assert_eq!(config.large_file_mb, 200);
    assert_eq!(
        config.directories_to_clean,
        vec![
            CleanTarget::new("/var/log", false),
            CleanTarget::new("/tmp", true),
        ]
    );
}

#[test]
fn test_config_invalid_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");

    std::fs::write(&path, "days_old = \"seven\"").unwrap();
    assert!(Config::load_from(&path).is_err());
    assert_eq!(Config::load_or_default(&path), Config::default());

    std::fs::write(&path, "scan_interval_hours = 0").unwrap();
    assert!(Config::load_from(&path).is_err());
    assert_eq!(Config::load_or_default(&path), Config::default());

    std::fs::write(&path, "scan_interval_hours = 1000000").unwrap();
    assert!(Config::load_from(&path).is_err());
    assert_eq!(Config::load_or_default(&path), Config::default());
}

#[test]
fn test_config_set_value() {
    let mut config = Config::default();
    config.set_value("days_old", "30").unwrap();
    config.set_value("cleaning_enabled", "false").unwrap();
    config.set_value("preserve_files", "*.keep, *.lock").unwrap();
    config
        .set_value("directories_to_clean", "/var/log,/scratch:large")
        .unwrap();

    assert_eq!(config.days_old, 30);
    assert!(!config.cleaning_enabled);
    assert_eq!(config.preserve_files, vec!["*.keep", "*.lock"]);
    assert_eq!(
        config.directories_to_clean,
        vec![
            CleanTarget::new("/var/log", false),
            CleanTarget::new("/scratch", true),
        ]
    );

    assert!(config.set_value("no_such_key", "1").is_err());
    assert!(config.set_value("days_old", "-1").is_err());
    assert!(config.set_value("scan_interval_hours", "0").is_err());
    assert!(config
        .set_value("scan_interval_hours", &u64::MAX.to_string())
        .is_err());
    config
        .set_value("scan_interval_hours", &MAX_SCAN_INTERVAL_HOURS.to_string())
        .unwrap();
}

// ─── find_old ─────────────────────────────────────────────────────────────────

#[test]
fn test_find_old_returns_only_old_files() {
    let tmp = TempDir::new().unwrap();
    let mut old = Vec::new();
    for i in 0..5 {
        old.push(write_aged(tmp.path(), &format!("old_{}.log", i), 16 * 1024, 10));
    }
    for i in 0..3 {
        write_aged(tmp.path(), &format!("new_{}.log", i), 16 * 1024, 1);
    }

    let scanner = DirectoryScanner::from_patterns::<&str>(&[]);
    let found = scanner.find_old(tmp.path(), 7);

    old.sort();
    assert_eq!(found, old);
}

#[test]
fn test_find_old_recurses_into_subdirectories() {
    let tmp = TempDir::new().unwrap();
    let deep = write_aged(tmp.path(), "a/b/c/deep.log", 10, 30);
    write_aged(tmp.path(), "a/fresh.log", 10, 0);

    let scanner = DirectoryScanner::default();
    assert_eq!(scanner.find_old(tmp.path(), 7), vec![deep]);
}

#[test]
fn test_find_old_boundary_is_exclusive() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("edge.log");
    std::fs::write(&path, b"x").unwrap();

    // Whole seconds, so filesystems with coarse mtime storage keep it exact
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let now = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
    let exactly_seven_days = now - Duration::from_secs(7 * DAY);
    std::fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(exactly_seven_days)
        .unwrap();

    let scanner = DirectoryScanner::default();
    assert!(scanner.find_old_at(tmp.path(), 7, now).is_empty());
    assert_eq!(
        scanner.find_old_at(tmp.path(), 7, now + Duration::from_secs(1)),
        vec![path]
    );
}

#[test]
fn test_find_old_with_zero_days_takes_everything_in_the_past() {
    let tmp = TempDir::new().unwrap();
    let a = write_aged(tmp.path(), "a.tmp", 1, 1);
    let scanner = DirectoryScanner::default();
    assert_eq!(scanner.find_old(tmp.path(), 0), vec![a]);
}

// ─── find_large ───────────────────────────────────────────────────────────────

#[test]
fn test_find_large_boundary_is_exclusive() {
    let tmp = TempDir::new().unwrap();
    write_aged(tmp.path(), "exact.bin", MB, 0);
    let over = write_aged(tmp.path(), "over.bin", MB + 1, 0);
    write_aged(tmp.path(), "small.bin", 1024, 0);

    let scanner = DirectoryScanner::default();
    let found = scanner.find_large(tmp.path(), 1);
    assert_eq!(found, vec![(over, (MB + 1) as u64)]);
}

#[test]
fn test_find_large_single_big_file() {
    let tmp = TempDir::new().unwrap();
    let big = write_aged(tmp.path(), "dump.bin", 5 * MB, 0);

    let scanner = DirectoryScanner::default();
    assert_eq!(scanner.find_large(tmp.path(), 1), vec![(big, (5 * MB) as u64)]);
}

// ─── Preserve patterns ────────────────────────────────────────────────────────

#[test]
fn test_preserved_files_never_returned() {
    let tmp = TempDir::new().unwrap();
    write_aged(tmp.path(), "app.conf", 2 * MB, 100);
    write_aged(tmp.path(), "nested/db.cfg", 2 * MB, 100);
    let victim = write_aged(tmp.path(), "nested/old.log", 2 * MB, 100);

    let scanner = DirectoryScanner::from_patterns(&["*.conf", "*.cfg", "*.config"]);
    assert_eq!(scanner.find_old(tmp.path(), 7), vec![victim.clone()]);
    assert_eq!(
        scanner.find_large(tmp.path(), 1),
        vec![(victim, (2 * MB) as u64)]
    );
}

#[test]
fn test_preserve_pattern_ignores_directory_names() {
    let tmp = TempDir::new().unwrap();
    let inside = write_aged(tmp.path(), "site.conf/access.log", 10, 30);

    let scanner = DirectoryScanner::from_patterns(&["*.conf"]);
    assert_eq!(scanner.find_old(tmp.path(), 7), vec![inside]);
}

// ─── Walk edge cases ──────────────────────────────────────────────────────────

#[test]
fn test_missing_directory_yields_nothing() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");
    let scanner = DirectoryScanner::default();
    assert!(scanner.find_old(&missing, 0).is_empty());
    assert!(scanner.find_large(&missing, 0).is_empty());
    assert_eq!(walker::walk_files(&missing).count(), 0);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    let tmp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    write_aged(outside.path(), "target.log", 10, 30);
    std::os::unix::fs::symlink(outside.path(), tmp.path().join("link")).unwrap();

    let scanner = DirectoryScanner::default();
    assert!(scanner.find_old(tmp.path(), 7).is_empty());
}

// ─── Disk usage ───────────────────────────────────────────────────────────────

#[test]
fn test_analyze_sums_every_file() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    write_aged(&a, "one.bin", 1000, 0);
    write_aged(&a, "sub/two.conf", 2000, 0);
    write_aged(&b, "three.bin", 500, 0);
    let missing = tmp.path().join("missing");

    let snapshot = usage::analyze(&[a.clone(), b.clone(), missing.clone()]);

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[&a].size_bytes, 3000);
    assert_eq!(snapshot[&b].size_bytes, 500);
    assert!(!snapshot.contains_key(&missing));
    assert_eq!(usage::snapshot_total(&snapshot), 3500);
}

#[test]
fn test_analyze_reports_empty_directory_as_zero() {
    let tmp = TempDir::new().unwrap();
    let snapshot = usage::analyze(&[tmp.path()]);
    assert_eq!(snapshot[tmp.path()].size_bytes, 0);
    assert_eq!(snapshot[tmp.path()].size_mb, 0.0);
}
