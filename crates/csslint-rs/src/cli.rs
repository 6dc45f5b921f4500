//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Lints stylesheets for remote and missing resources.
#[derive(Debug, Parser)]
#[command(name = "csslint-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to lint (defaults to the workspace)
    pub paths: Vec<Utf8PathBuf>,

    /// Workspace root: config lookup, exclude matching and root-relative URLs
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Rules to report as warnings (comma-separated ids)
    #[arg(long)]
    pub warnings: Option<String>,

    /// Rules to report as errors (comma-separated ids)
    #[arg(long)]
    pub errors: Option<String>,

    /// Rules to turn off (comma-separated ids)
    #[arg(long)]
    pub ignore: Option<String>,

    /// Glob patterns to exclude, relative to the workspace
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Path to a .csslintrc file
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Do not check local resources against the file system
    #[arg(long = "no-filesystem")]
    pub no_filesystem: bool,

    /// Exit with error on warnings
    #[arg(long = "fail-on-warnings")]
    pub fail_on_warnings: bool,

    /// Watch mode
    #[arg(long)]
    pub watch: bool,

    /// Preserve watch output (don't clear screen)
    #[arg(long = "preserveWatchOutput")]
    pub preserve_watch_output: bool,

    /// List the available rules and exit
    #[arg(long = "list-rules")]
    pub list_rules: bool,

    /// Only print output when there are diagnostics
    #[arg(long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print debug logs
    #[arg(long, short)]
    pub verbose: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Human-readable with code snippets
    HumanVerbose,
    /// JSON output
    Json,
    /// Machine-readable (one line per diagnostic)
    Machine,
}

impl Args {
    /// Returns whether local resources are probed on disk.
    pub fn use_filesystem(&self) -> bool {
        !self.no_filesystem
    }
}
