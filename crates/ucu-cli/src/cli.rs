//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ucu_cli::commands::Assignment;
use ucu_cli::config::TOKEN_ENV_VAR;

#[derive(Parser)]
#[command(
    name = "ucu-filters",
    version,
    about = "Inspect and edit saved analytics page filters",
    long_about = "Inspect and edit the filter state saved for each analytics page.\n\n\
                  Changes go through the same cascade as the dashboard: changing a\n\
                  faculty clears its department and program."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Config file (default: platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding saved page state (overrides the config file).
    #[arg(long = "storage-dir", value_name = "DIR", global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Analytics API root (overrides the config file).
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token for the filter-options service.
    #[arg(long = "token", env = TOKEN_ENV_VAR, hide_env_values = true, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the saved state of a page.
    Show {
        page: String,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Set filters on a page, in order (`key=value`; `key=` clears).
    Set {
        page: String,
        #[arg(value_name = "KEY=VALUE", required = true)]
        assignments: Vec<Assignment>,
    },

    /// Apply a search term (access number, registration number or name).
    Search { page: String, term: String },

    /// Set the active tab (empty to clear).
    Tab { page: String, tab: String },

    /// Set the drilldown selection (empty to clear).
    Drilldown { page: String, value: String },

    /// Drop all filters and the search term, keeping tab and drilldown.
    Reset { page: String },

    /// Remove the saved state of a page.
    Clear { page: String },

    /// List pages with saved state.
    Pages,

    /// Fetch filter option lists from the API.
    Options(OptionsArgs),
}

#[derive(Parser)]
pub struct OptionsArgs {
    /// Scope the lists to this faculty.
    #[arg(long = "faculty-id", value_name = "ID")]
    pub faculty_id: Option<String>,

    /// Scope the lists to this department.
    #[arg(long = "department-id", value_name = "ID")]
    pub department_id: Option<String>,

    /// Only print this filter's list.
    #[arg(long = "only", value_name = "KEY")]
    pub only: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
