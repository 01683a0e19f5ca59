use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// invclean: scheduled disk-space reclamation for Linux
#[derive(Parser, Debug)]
#[command(
    name = "invclean",
    version,
    about = "Reclaims disk space by removing old and oversized files",
    long_about = "invclean scans configured directories for files older than a retention\n\
                   threshold or larger than a size threshold, and removes them on demand\n\
                   or on a schedule. Preserve patterns keep matching files untouched.",
    after_help = "EXAMPLES:\n  \
        invclean analyze                      Disk usage of the configured directories\n  \
        invclean analyze /var /home           Disk usage of specific directories\n  \
        invclean clean --dry-run              Show what would be removed\n  \
        invclean clean --yes                  Remove eligible files without prompting\n  \
        invclean daemon                       Clean on the configured schedule\n  \
        invclean history --limit 5            Last five scheduled runs\n  \
        invclean config set days_old 14       Change the retention threshold"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ~/.invclean/config.toml)
    #[arg(long, short, global = true, value_name = "PATH", env = "INVCLEAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure disk usage per directory
    Analyze {
        /// Directories to measure (defaults to directories_to_scan)
        paths: Vec<PathBuf>,
    },

    /// Remove old and oversized files from the configured directories
    Clean {
        /// Simulate: report what would be removed without deleting
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Run cleanups on a fixed schedule until interrupted
    Daemon {
        /// Hours between runs (overrides scan_interval_hours)
        #[arg(long, value_name = "HOURS")]
        interval_hours: Option<u64>,

        /// Minutes before the first run
        #[arg(long, default_value = "5", value_name = "MINUTES")]
        initial_delay_mins: u64,

        /// Seconds between schedule checks
        #[arg(long, default_value = "60", value_name = "SECS", hide = true)]
        tick_secs: u64,

        /// Write the daemon PID to this file while running
        #[arg(long, value_name = "PATH")]
        pid_file: Option<PathBuf>,
    },

    /// Show statistics recorded by scheduled runs
    History {
        /// Number of most recent runs to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value (comma-separated for lists)
        value: String,
    },

    /// Initialize invclean directories and default config
    Init,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
