//! Interactive mode for the server.
//!
//! Prompts the user for bind address and port before starting the server.

use dialoguer::{Confirm, Input};
use farm_monitor_dashboard::DashboardConfig;

use crate::ServerError;

/// Runs the server in interactive mode, prompting for the listener.
///
/// The prompts default to the values already in `config`. Invalid or
/// aborted input falls back to those defaults.
///
/// # Errors
///
/// Returns [`ServerError`] if the underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run(mut config: DashboardConfig) -> Result<(), ServerError> {
    println!("Farm Monitor Server");
    println!();

    let default_addr = config.server.bind_addr.clone();
    config.server.bind_addr = Input::<String>::new()
        .with_prompt("Bind address")
        .default(default_addr.clone())
        .interact_text()
        .unwrap_or(default_addr);

    let default_port = config.server.port;
    config.server.port = Input::<u16>::new()
        .with_prompt("Port")
        .default(default_port)
        .interact_text()
        .unwrap_or(default_port);

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{}?",
            config.server.bind_addr, config.server.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(config).await
}
