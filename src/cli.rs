//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::view::{Navigation, ViewType};

/// OKR Dashboard - progress charts for objectives and key results
///
/// Loads an OKR CSV file and renders the overview or a single goal's
/// details as an HTML page or JSON, or serves the dashboard locally.
///
/// Examples:
///   okr-dashboard
///   okr-dashboard --view goal-details --goal 2 -o goal2.html
///   okr-dashboard --format json -o -
///   okr-dashboard --serve --open
///   okr-dashboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path of the OKR CSV file
    ///
    /// Columns: goal, objective, okr, status. Defaults to index_goals.csv.
    #[arg(short, long, value_name = "FILE", env = "OKR_DASHBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// View to render
    #[arg(long, default_value = "overview", value_name = "VIEW")]
    pub view: ViewType,

    /// Goal to show in the goal-details view
    ///
    /// Defaults to the lowest-numbered goal.
    #[arg(short, long, value_name = "GOAL")]
    pub goal: Option<i64>,

    /// Output format (html, json)
    #[arg(long, default_value = "html", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path, or "-" for stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Page title
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Serve the dashboard over HTTP instead of writing a file
    #[arg(long)]
    pub serve: bool,

    /// Address to bind when serving (e.g. 127.0.0.1:8501)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Open the served dashboard in the default browser
    #[arg(long)]
    pub open: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .okr-dashboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .okr-dashboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for rendered pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// HTML page (default)
    #[default]
    Html,
    /// JSON dashboard model
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.goal.is_some() && self.view != ViewType::GoalDetails {
            return Err("--goal requires --view goal-details".to_string());
        }

        if self.serve {
            if self.output.is_some() {
                return Err("--output cannot be combined with --serve".to_string());
            }
            // The browser picks the view and goal from the sidebar.
            if self.view != ViewType::Overview || self.goal.is_some() {
                return Err("--view and --goal cannot be combined with --serve".to_string());
            }
            if self.format != OutputFormat::Html {
                return Err(
                    "--format cannot be combined with --serve (use /api/dashboard for JSON)"
                        .to_string(),
                );
            }
        } else {
            if self.bind.is_some() {
                return Err("--bind requires --serve".to_string());
            }
            if self.open {
                return Err("--open requires --serve".to_string());
            }
        }

        if let Some(ref bind) = self.bind {
            if bind.parse::<SocketAddr>().is_err() {
                return Err(format!("Invalid bind address: {}", bind));
            }
        }

        Ok(())
    }

    /// Navigation selected on the command line.
    pub fn navigation(&self) -> Navigation {
        Navigation {
            view: self.view,
            goal: self.goal,
        }
    }

    /// Whether output should go to stdout.
    pub fn writes_to_stdout(&self) -> bool {
        self.output.as_deref().is_some_and(|p| p.as_os_str() == "-")
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is `[general] verbose` from the config file;
    /// `--quiet` overrides it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
