//! OKR Dashboard - progress charts for objectives and key results
//!
//! A CLI tool that loads an OKR CSV file, aggregates progress per goal
//! and objective, and renders the result as a Plotly-powered HTML page,
//! as JSON, or through a small local web server.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (data unavailable, bad config, write failure, etc.)

mod analysis;
mod cli;
mod config;
mod data;
mod error;
mod models;
mod report;
mod server;
mod view;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use data::DataSource;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // The config file can raise the log level, so it is read first.
    let (mut config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("OKR Dashboard v{}", env!("CARGO_PKG_VERSION"));
    info!("{}", origin);
    debug!("Arguments: {:?}", args);

    match run(&args, &config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .okr-dashboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the data path, title, and server address.");
    Ok(())
}

/// Initialize logging based on verbosity settings; `RUST_LOG` wins when set.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Run the dashboard. Returns the process exit code.
fn run(args: &Args, config: &Config) -> Result<i32> {
    let source = DataSource::new(config.data_path());

    if args.serve {
        server::serve(config, &source)?;
        return Ok(0);
    }

    write_dashboard(args, config, &source)
}

/// Render the selected view once and write it out.
///
/// Returns exit code 1 without writing anything when the data cannot be
/// loaded.
fn write_dashboard(args: &Args, config: &Config, source: &DataSource) -> Result<i32> {
    // Data problems stop everything: no partial dashboard is rendered.
    let table = match source.table() {
        Ok(table) => table,
        Err(e) => {
            error!("{}", e);
            eprintln!("❌ {}", e.user_message());
            return Ok(1);
        }
    };

    let nav = args.navigation();
    let dashboard = view::build_dashboard(table, nav, &config.view_settings());

    let output = match args.format {
        OutputFormat::Html => report::generate_html_page(&dashboard, &config.page_assets()),
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
    };

    if args.writes_to_stdout() {
        print!("{}", output);
        return Ok(0);
    }

    let output_path = std::path::PathBuf::from(&config.general.output);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write dashboard to {}", output_path.display()))?;

    if !args.quiet {
        print_summary(table, &dashboard);
        println!("\n✅ Dashboard saved to: {}", output_path.display());
    }

    Ok(0)
}

/// Print the headline numbers for the rendered view.
fn print_summary(table: &models::Table, dashboard: &view::Dashboard) {
    let summary = analysis::summary_metrics(table);

    println!("📊 OKR Summary:");
    println!("   Goals: {}", summary.total_goals);
    println!("   OKRs: {}", summary.total_okrs);
    println!("   Average completion: {:.1}%", summary.average_completion_pct);

    match &dashboard.page {
        view::Page::GoalDetails(page) => println!(
            "   Goal {}: {} OKRs, {:.1}% complete",
            page.goal, page.metrics.total_okrs, page.metrics.completion_pct
        ),
        view::Page::NoGoals => println!("   No goals to show details for."),
        view::Page::Overview(_) => {}
    }
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so the second value describes where the
/// config came from for the caller to log.
fn load_config(args: &Args) -> Result<(Config, String)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, format!("Loaded config from: {}", config_path.display())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, format!("Loaded default config from {}", CONFIG_FILE))),
        Ok(None) => Ok((
            Config::default(),
            "No config file found, using defaults".to_string(),
        )),
        Err(e) => {
            eprintln!("⚠️  Failed to load config: {:#}", e);
            Ok((Config::default(), "Using default config".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    fn setup(csv: Option<&str>) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("index_goals.csv");
        if let Some(content) = csv {
            fs::write(&data, content).unwrap();
        }

        let mut config = Config::default();
        config.data.path = data.display().to_string();
        config.general.output = dir.path().join("okr_dashboard.html").display().to_string();
        (dir, config)
    }

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["okr-dashboard", "-q"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_write_dashboard_missing_file() {
        let (_dir, config) = setup(None);
        let source = DataSource::new(config.data_path());

        assert_eq!(write_dashboard(&args(&[]), &config, &source).unwrap(), 1);
        assert!(!std::path::Path::new(&config.general.output).exists());
    }

    #[test]
    fn test_write_dashboard_missing_column() {
        let (_dir, config) = setup(Some("goal,objective,okr\n1,1,1.1.1\n"));
        let source = DataSource::new(config.data_path());

        assert_eq!(write_dashboard(&args(&["--format", "json"]), &config, &source).unwrap(), 1);
        assert!(!std::path::Path::new(&config.general.output).exists());
    }

    #[test]
    fn test_write_dashboard_writes_page() {
        let (_dir, config) = setup(Some("goal,objective,okr,status\n1,1,1.1.1,4\n2,1,2.1.1,0\n"));
        let source = DataSource::new(config.data_path());

        let nav = args(&["--view", "goal-details", "--goal", "2"]);
        assert_eq!(write_dashboard(&nav, &config, &source).unwrap(), 0);

        let page = fs::read_to_string(&config.general.output).unwrap();
        assert!(page.contains("Plotly.newPlot"));
    }
}
