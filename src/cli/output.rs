use colored::*;

use crate::cleaner::{CleanupResult, RunMode};
use crate::common::config::Config;
use crate::common::format::{self, format_size, format_size_colored};
use crate::daemon::StatsRecord;
use crate::scanner::usage::{snapshot_total, DiskUsageSnapshot};

/// Print a disk usage snapshot as a table with proportional bars
pub fn print_usage(snapshot: &DiskUsageSnapshot) {
    println!();
    println!("{}  Disk Usage", "📊");
    println!("{}", "─".repeat(60).dimmed());
    println!();

    if snapshot.is_empty() {
        println!("  None of the requested directories exist.");
        println!();
        return;
    }

    let total = snapshot_total(snapshot);
    let mut rows: Vec<_> = snapshot.iter().collect();
    rows.sort_by(|a, b| b.1.size_bytes.cmp(&a.1.size_bytes));

    for (path, usage) in rows {
        let fraction = if total == 0 {
            0.0
        } else {
            usage.size_bytes as f64 / total as f64
        };
        println!(
            "  {:<28} {:>12}  {}",
            format::truncate(&path.display().to_string(), 28),
            format_size_colored(usage.size_bytes),
            format::progress_bar(fraction, 20)
        );
    }

    println!("  {}", "─".repeat(58).dimmed());
    println!("  {:<28} {:>12}", "Total".bold(), format_size(total).bold());
    println!();
}

/// Print a snapshot as JSON
pub fn print_usage_json(snapshot: &DiskUsageSnapshot) {
    match serde_json::to_string_pretty(snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing snapshot: {}", e),
    }
}

/// One line per directory: size in bytes, then path
pub fn print_usage_quiet(snapshot: &DiskUsageSnapshot) {
    for (path, usage) in snapshot {
        println!("{}  {}", usage.size_bytes, path.display());
    }
}

/// Print the outcome of a cleanup run
pub fn print_cleanup_result(result: &CleanupResult) {
    println!();
    let (icon, mode_label, verb) = match result.mode {
        RunMode::Simulated => ("ℹ️", "Dry run", "would be reclaimed"),
        RunMode::Live => ("✓", "Cleanup", "reclaimed"),
    };

    println!(
        "  {} {} — {}, {} {}",
        icon,
        mode_label.bold(),
        format::format_count(result.files_processed).cyan(),
        format_size_colored(result.total_bytes_reclaimed),
        verb,
    );
    format::print_kv("Old files", &format_size(result.age_bytes));
    format::print_kv("Large files", &format_size(result.large_bytes));
    let secs = result.duration().num_milliseconds().max(0) as f64 / 1000.0;
    format::print_kv("Duration", &format::format_duration(secs));

    if !result.errors.is_empty() {
        println!();
        println!("  {} {} errors:", "⚠".yellow(), result.errors.len());
        for (i, err) in result.errors.iter().enumerate().take(10) {
            println!("    {} {}", format!("{}.", i + 1).dimmed(), err.dimmed());
        }
        if result.errors.len() > 10 {
            println!(
                "    ... and {} more",
                (result.errors.len() - 10).to_string().dimmed()
            );
        }
    }
    println!();
}

/// Print a cleanup result as JSON
pub fn print_cleanup_json(result: &CleanupResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }
}

/// Print a minimal summary
pub fn print_cleanup_quiet(result: &CleanupResult) {
    println!(
        "{}  {}  {}",
        result.total_bytes_reclaimed,
        result.files_processed,
        result.errors.len()
    );
}

/// Print what a cleanup run is about to do
pub fn print_plan(config: &Config, mode: RunMode) {
    format::print_header(match mode {
        RunMode::Live => "Cleanup plan",
        RunMode::Simulated => "Cleanup plan (dry run)",
    });
    for target in &config.directories_to_clean {
        let rules = if target.large_files {
            format!(
                "older than {} days or larger than {}",
                config.days_old,
                format_size(config.large_file_threshold_bytes())
            )
        } else {
            format!("older than {} days", config.days_old)
        };
        println!("  {} {}  {}", "•".cyan(), target.path.display(), rules.dimmed());
    }
    if !config.preserve_files.is_empty() {
        format::print_kv("Preserved", &config.preserve_files.join(", "));
    }
    println!();
}

/// Print the statistics history
pub fn print_history(records: &[StatsRecord]) {
    println!();
    println!("  {} Cleanup History", "📜");
    println!("{}", "─".repeat(80).dimmed());
    println!();

    if records.is_empty() {
        println!("  No scheduled runs recorded yet.");
        println!();
        return;
    }

    println!(
        "  {:<20} {:>8} {:>12} {:>7}  {:>12}",
        "Time".dimmed(),
        "Files".dimmed(),
        "Reclaimed".dimmed(),
        "Errors".dimmed(),
        "Scanned".dimmed(),
    );
    println!("  {}", "─".repeat(66).dimmed());

    for record in records {
        let result = &record.cleanup_result;
        let errors = if result.errors.is_empty() {
            "0".normal()
        } else {
            result.errors.len().to_string().yellow()
        };
        println!(
            "  {:<20} {:>8} {:>12} {:>7}  {:>12}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            result.files_processed,
            format_size(result.total_bytes_reclaimed),
            errors,
            format_size(snapshot_total(&record.disk_usage)),
        );
    }
    println!();
}

/// Print the history as a JSON array
pub fn print_history_json(records: &[StatsRecord]) {
    match serde_json::to_string_pretty(records) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing history: {}", e),
    }
}
