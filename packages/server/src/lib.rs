#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the farm monitor dashboard.
//!
//! Serves the filter options, the raw aggregate summary, the rendered
//! dashboard view and a CSV export for any filter combination. Every
//! request recomputes from the immutable [`FarmStore`] loaded at startup,
//! so workers share the store without locking.

mod handlers;
pub mod interactive;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use farm_monitor_analytics_models::SummaryOptions;
use farm_monitor_dashboard::{DashboardConfig, Decoration};
use farm_monitor_store::{FarmStore, StoreError};
use thiserror::Error;

/// Errors that can occur while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The farm store could not be built.
    #[error("Failed to load farm data: {0}")]
    Store(#[from] StoreError),

    /// Binding or serving failed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Farm records loaded at startup.
    pub store: FarmStore,
    /// Table row limit and other summary tunables.
    pub options: SummaryOptions,
    /// Provider for the display-only land and biodiversity figures.
    pub decoration: Box<dyn Decoration>,
}

impl AppState {
    /// Opens the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the data source fails or produces invalid
    /// records.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, StoreError> {
        let store = config.open_store()?;
        Ok(Self {
            store,
            options: config.summary_options(),
            decoration: config.decoration(),
        })
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/summary", web::get().to(handlers::summary))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/export", web::get().to(handlers::export)),
    );
}

/// Starts the farm monitor API server.
///
/// Builds the farm store from `config` and serves the API on the
/// configured bind address and port. This is a regular async function;
/// the caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the store cannot be built or the HTTP server
/// fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: DashboardConfig) -> Result<(), ServerError> {
    log::info!("Loading farm data...");
    let state = web::Data::new(AppState::from_config(&config)?);
    log::info!(
        "Loaded {} farms (table limit {})",
        state.store.len(),
        state.options.table_row_limit
    );

    let bind_addr = config.server.bind_addr;
    let port = config.server.port;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
