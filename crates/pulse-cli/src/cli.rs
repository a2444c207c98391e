//! CLI argument definitions for marketpulse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `changes` | Day-over-day changes for the configured watchlist |
//! | `watchlist` | Show the configured instrument set |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Changes for the most recent trading days
//! pulse changes
//!
//! # Changes as of a past date, forcing fresh upstream data
//! pulse changes --date 2024-03-08 --refresh
//!
//! # Strict comparison between two hand-picked dates
//! pulse changes --from 2024-03-01 --to 2024-03-08 --format json --pretty
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Daily market change tracker for indices, currencies, commodities, and
/// yields.
#[derive(Debug, Parser)]
#[command(
    name = "pulse",
    author,
    version,
    about = "Daily market change tracker",
    long_about = "marketpulse fetches two days of closing prices per watchlist \
instrument, normalizes currency quotes, and reports absolute and percentage \
day-over-day changes grouped by category."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format for terminal display.
    Table,
    /// Envelope-wrapped JSON output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute day-over-day changes for the configured watchlist.
    Changes(ChangesArgs),
    /// Show the configured instrument set per category.
    Watchlist,
}

/// Arguments for the `changes` command.
#[derive(Debug, Args)]
pub struct ChangesArgs {
    /// Reference date (YYYY-MM-DD); defaults to today. The two most recent
    /// trading days in the preceding window are compared.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub date: Option<String>,

    /// Explicit comparison start date (YYYY-MM-DD); requires --to. Both
    /// dates must carry trading data, no nearest-date fallback.
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Explicit comparison end date (YYYY-MM-DD); requires --from.
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Discard any cached report and refetch from the provider.
    #[arg(long, default_value_t = false)]
    pub refresh: bool,

    /// Query the live Yahoo Finance API instead of the offline provider.
    #[arg(long, default_value_t = false)]
    pub real: bool,
}
