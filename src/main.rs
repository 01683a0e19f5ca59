use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use invclean::cleaner::{CleanupEngine, ConsoleSink, ReportSink, RunMode, TracingSink};
use invclean::cli::args::{Cli, Commands, ConfigAction, OutputFormat};
use invclean::cli::output;
use invclean::common::config::Config;
use invclean::common::format;
use invclean::daemon::{self, PidFile, Scheduler, StopSignal};
use invclean::scanner::usage;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    // The daemon installs its own file-backed subscriber
    if !matches!(cli.command, Commands::Daemon { .. }) {
        init_cli_logging(cli.verbose);
    }

    match cli.command {
        Commands::Analyze { ref paths } => cmd_analyze(&cli, &config_path, paths),
        Commands::Clean { dry_run, yes } => cmd_clean(&cli, &config_path, dry_run, yes),
        Commands::Daemon {
            interval_hours,
            initial_delay_mins,
            tick_secs,
            ref pid_file,
        } => cmd_daemon(
            &config_path,
            interval_hours,
            initial_delay_mins,
            tick_secs,
            pid_file.as_deref(),
        ),
        Commands::History { limit } => cmd_history(&cli, limit),
        Commands::Config { ref action } => cmd_config(&config_path, action),
        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                invclean::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                invclean::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                invclean::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "invclean", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn init_cli_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("invclean=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ─── Analyze ──────────────────────────────────────────────────────────────────

fn cmd_analyze(cli: &Cli, config_path: &Path, paths: &[PathBuf]) -> Result<()> {
    let directories = if paths.is_empty() {
        Config::load_or_default(config_path).directories_to_scan
    } else {
        paths.to_vec()
    };

    let show_progress = !cli.quiet && matches!(cli.format, OutputFormat::Human);
    let pb = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        pb.set_message(format!("Measuring {} directories...", directories.len()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let snapshot = usage::analyze(&directories);

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match cli.format {
        OutputFormat::Human => output::print_usage(&snapshot),
        OutputFormat::Json => output::print_usage_json(&snapshot),
        OutputFormat::Quiet => output::print_usage_quiet(&snapshot),
    }
    Ok(())
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn cmd_clean(cli: &Cli, config_path: &Path, dry_run: bool, yes: bool) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let mode = if dry_run {
        RunMode::Simulated
    } else {
        RunMode::Live
    };
    let human = matches!(cli.format, OutputFormat::Human);

    if human && !cli.quiet {
        output::print_plan(&config, mode);
    }

    // Confirm unless --yes
    if mode == RunMode::Live && !yes {
        print!(
            "\n  {} Permanently delete eligible files from {} directories? [y/N] ",
            "❓",
            config.directories_to_clean.len()
        );
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("  {} Cancelled", "✗".red());
            return Ok(());
        }
    }

    let console = ConsoleSink;
    let tracing_sink = TracingSink;
    let sink: &dyn ReportSink = if human && !cli.quiet {
        &console
    } else {
        &tracing_sink
    };

    let result = CleanupEngine::new(sink).run(&config, mode);

    match cli.format {
        OutputFormat::Human => output::print_cleanup_result(&result),
        OutputFormat::Json => output::print_cleanup_json(&result),
        OutputFormat::Quiet => output::print_cleanup_quiet(&result),
    }

    if mode == RunMode::Live && result.should_notify(&config) {
        info!(
            target: "invclean::notify",
            "Reclaimed {} from {}",
            format::format_size(result.total_bytes_reclaimed),
            format::format_count(result.files_processed)
        );
    }
    Ok(())
}

// ─── Daemon ───────────────────────────────────────────────────────────────────

fn cmd_daemon(
    config_path: &Path,
    interval_hours: Option<u64>,
    initial_delay_mins: u64,
    tick_secs: u64,
    pid_file: Option<&Path>,
) -> Result<()> {
    Config::init_dirs().context("Failed to create invclean directories")?;

    let file_appender = tracing_appender::rolling::daily(Config::logs_dir(), "invclean-daemon.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    let mut config = Config::load_or_default(config_path);
    if !config_path.exists() {
        if let Err(e) = config.save_to(config_path) {
            tracing::error!("Failed to write default config: {}", e);
        }
    }
    if let Some(hours) = interval_hours {
        config.scan_interval_hours = hours.max(1);
    }

    let _pid = match pid_file {
        Some(path) => Some(PidFile::create(path)?),
        None => None,
    };

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || {
        info!("Received interrupt signal");
        handler_stop.stop();
    })
    .context("Failed to install signal handler")?;

    let scheduler = Scheduler::new(daemon::configured_interval(&config))
        .with_initial_delay(Duration::from_secs(initial_delay_mins.saturating_mul(60)))
        .with_tick(Duration::from_secs(tick_secs.max(1)));

    info!("invclean daemon started");
    daemon::run(&config, &scheduler, &TracingSink, &stop, &Config::stats_path());
    info!("Stopping invclean daemon");
    Ok(())
}

// ─── History ──────────────────────────────────────────────────────────────────

fn cmd_history(cli: &Cli, limit: usize) -> Result<()> {
    let records = daemon::stats::read_recent(&Config::stats_path(), limit)?;
    match cli.format {
        OutputFormat::Human => output::print_history(&records),
        OutputFormat::Json => output::print_history_json(&records),
        OutputFormat::Quiet => println!("{}", records.len()),
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(config_path: &Path, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            Config::init_dirs()?;
            if config_path.exists() {
                println!(
                    "  {} Config already exists at {}",
                    "ℹ️",
                    config_path.display()
                );
            } else {
                Config::default().save_to(config_path)?;
                println!("  {} invclean initialized", "✓".green());
                println!("  Created: {}", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load_from(config_path)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigAction::Reset => {
            Config::default().save_to(config_path)?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(config_path)?;
            config.set_value(key, value)?;
            config.save_to(config_path)?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}
