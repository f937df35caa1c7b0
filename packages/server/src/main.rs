#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone farm monitor API server.
//!
//! Reads configuration from the file named by `FARM_MONITOR_CONFIG` (if
//! set) plus environment overrides, then serves until interrupted.

use farm_monitor_dashboard::DashboardConfig;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = DashboardConfig::load(None)?;
    farm_monitor_server::run_server(config).await?;

    Ok(())
}
