#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the farm monitor dashboard.
//!
//! With a subcommand it runs non-interactively (`serve`, `summary`,
//! `export`, `interactive`). Without one it shows a menu so users can pick
//! a tool without memorizing flags.

mod interactive;
mod render;

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use dialoguer::Select;
use farm_monitor_analytics::{export, filter};
use farm_monitor_analytics_models::FilterCriteria;
use farm_monitor_dashboard::{DashboardConfig, Presenter};

#[derive(Parser)]
#[command(name = "farm_monitor", about = "Supplier farm environmental monitoring")]
struct Cli {
    /// TOML config file (defaults to `$FARM_MONITOR_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve,
    /// Print the dashboard for a filter combination
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print the raw aggregate summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write every matching farm as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file (defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Explore the dashboard with live filter prompts
    Interactive,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Case-insensitive substring of the farm name or ID
    #[arg(long)]
    search: Option<String>,
    /// Region name, e.g. "South West"
    #[arg(long)]
    region: Option<String>,
    /// Supplier tier: Gold, Silver or Bronze
    #[arg(long)]
    tier: Option<String>,
    /// Risk level matched against drought or flood risk
    #[arg(long)]
    risk: Option<String>,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_raw(
            self.search.as_deref(),
            self.region.as_deref(),
            self.tier.as_deref(),
            self.risk.as_deref(),
        )
    }
}

/// Top-level tool selection when no subcommand is given.
enum Tool {
    Explore,
    Server,
    Export,
}

impl Tool {
    const ALL: &[Self] = &[Self::Explore, Self::Server, Self::Export];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Explore => "Explore dashboard",
            Self::Server => "Start server",
            Self::Export => "Export all farms",
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let config = DashboardConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Serve) => serve(config)?,
        Some(Commands::Summary { filter, json }) => summary(&config, &filter.criteria(), json)?,
        Some(Commands::Export { filter, out }) => {
            export_csv(&config, &filter.criteria(), out.as_deref())?;
        }
        Some(Commands::Interactive) => interactive::run(&config)?,
        None => menu(config)?,
    }

    Ok(())
}

fn menu(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Farm Monitor");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Explore => interactive::run(&config)?,
        Tool::Server => {
            actix_web::rt::System::new()
                .block_on(farm_monitor_server::interactive::run(config))?;
        }
        Tool::Export => export_csv(&config, &FilterCriteria::default(), None)?,
    }

    Ok(())
}

fn serve(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    actix_web::rt::System::new().block_on(farm_monitor_server::run_server(config))?;
    Ok(())
}

fn summary(
    config: &DashboardConfig,
    criteria: &FilterCriteria,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = config.open_store()?;
    let summary =
        farm_monitor_analytics::run(store.records(), criteria, &config.summary_options());

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let decoration = config.decoration();
    let view = Presenter::new(decoration.as_ref(), store.loaded_at().date_naive())
        .present(&summary, None);
    render::render(&view, &mut std::io::stdout().lock())?;
    Ok(())
}

fn export_csv(
    config: &DashboardConfig,
    criteria: &FilterCriteria,
    out: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = config.open_store()?;
    let subset = filter::apply(store.records(), criteria);

    match out {
        Some(path) => {
            export::write_csv(&subset, File::create(path)?)?;
            log::info!("Exported {} farms to {}", subset.len(), path.display());
        }
        None => export::write_csv(&subset, std::io::stdout().lock())?,
    }

    Ok(())
}
