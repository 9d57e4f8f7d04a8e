//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.okr-dashboard.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::report::PageAssets;
use crate::view::ViewSettings;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".okr-dashboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input data settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Page presentation settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Local server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file for rendered pages.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "okr_dashboard.html".to_string()
}

/// Input data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path of the OKR CSV file, relative to the working directory.
    #[serde(default = "default_data_path")]
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> String {
    "index_goals.csv".to_string()
}

/// Page presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Page heading and document title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Height of every chart in pixels.
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,

    /// Script URL for Plotly.js.
    #[serde(default = "default_plotly_url")]
    pub plotly_url: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            chart_height: default_chart_height(),
            plotly_url: default_plotly_url(),
        }
    }
}

fn default_title() -> String {
    "OKR Progress Dashboard".to_string()
}

fn default_chart_height() -> u32 {
    400
}

fn default_plotly_url() -> String {
    "https://cdn.plot.ly/plotly-2.35.2.min.js".to_string()
}

/// Local server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Open the dashboard in a browser once the server is listening.
    #[serde(default)]
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            open_browser: false,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.display().to_string();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(ref bind) = args.bind {
            self.server.bind = bind.clone();
        }
        if let Some(ref title) = args.title {
            self.dashboard.title = title.clone();
        }

        // Flags always override
        if args.open {
            self.server.open_browser = true;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Path of the OKR data file.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data.path)
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            title: self.dashboard.title.clone(),
            chart_height: self.dashboard.chart_height,
        }
    }

    pub fn page_assets(&self) -> PageAssets {
        PageAssets {
            plotly_url: self.dashboard.plotly_url.clone(),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
