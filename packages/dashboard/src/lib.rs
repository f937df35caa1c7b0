#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Farm dashboard session layer.
//!
//! Sits between the analytics engine and whatever renders the dashboard
//! (the HTTP API or the interactive terminal):
//!
//! - [`config`] loads settings and opens the [`farm_monitor_store::FarmStore`].
//! - [`presentation`] formats a summary into cards, panels, charts and a
//!   sortable table.
//! - [`controller`] reacts to filter input and dispatches one complete
//!   bundle per effective change.
//! - [`decoration`] supplies the display-only land and biodiversity
//!   figures.

pub mod config;
pub mod controller;
pub mod decoration;
pub mod presentation;

pub use config::{ConfigError, DashboardConfig};
pub use controller::{
    ControllerState, DashboardBundle, DashboardController, DashboardEvent, PresentationSink,
};
pub use decoration::Decoration;
pub use presentation::{DashboardView, Presenter, TableFilter, TableSort};
