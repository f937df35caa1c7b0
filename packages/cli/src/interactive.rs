//! Interactive dashboard explorer.
//!
//! Drives a [`DashboardController`] from `dialoguer` prompts. Every filter
//! change re-renders the whole dashboard to the terminal through
//! [`TerminalSink`].

use std::fs::File;
use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use farm_monitor_analytics::{export, filter};
use farm_monitor_analytics_models::Selector;
use farm_monitor_dashboard::presentation::{SortDirection, TableColumn};
use farm_monitor_dashboard::{
    DashboardConfig, DashboardController, DashboardEvent, PresentationSink, TableSort,
};
use farm_monitor_server_models::{ApiFilterOptions, ApiOption};
use farm_monitor_store::FarmStore;

use crate::render::TerminalSink;

/// Actions offered after each render.
enum Action {
    Search,
    Region,
    Tier,
    Risk,
    Sort,
    Reset,
    Export,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Search,
        Self::Region,
        Self::Tier,
        Self::Risk,
        Self::Sort,
        Self::Reset,
        Self::Export,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Search => "Search farms",
            Self::Region => "Filter by region",
            Self::Tier => "Filter by supplier tier",
            Self::Risk => "Filter by risk level",
            Self::Sort => "Sort table",
            Self::Reset => "Clear all filters",
            Self::Export => "Export data",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the explorer until the user quits.
///
/// # Errors
///
/// Returns an error if the store cannot be built, a prompt fails, or an
/// export cannot be written.
pub fn run(config: &DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = config.open_store()?;
    let decoration = config.decoration();
    let options = ApiFilterOptions::new(&store.regions(), &store.tiers());

    let mut controller = DashboardController::new(
        &store,
        config.summary_options(),
        decoration.as_ref(),
        TerminalSink,
    );

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let event = match Action::ALL[idx] {
            Action::Search => {
                let search: String = Input::new()
                    .with_prompt("Search by farm name or ID")
                    .with_initial_text(controller.criteria().search.clone())
                    .allow_empty(true)
                    .interact_text()?;
                DashboardEvent::Search(search)
            }
            Action::Region => {
                DashboardEvent::Region(Selector::parse(&choose("Region", &options.regions)?))
            }
            Action::Tier => {
                DashboardEvent::Tier(Selector::parse(&choose("Supplier tier", &options.tiers)?))
            }
            Action::Risk => DashboardEvent::Risk(Selector::parse(&choose(
                "Risk level",
                &options.risk_levels,
            )?)),
            Action::Sort => DashboardEvent::Sort(choose_sort()?),
            Action::Reset => DashboardEvent::Reset,
            Action::Export => {
                export_filtered(&store, &controller)?;
                continue;
            }
            Action::Quit => break,
        };

        if !controller.apply(event) {
            println!("Filters unchanged.");
        }
    }

    log::info!(
        "Explorer closed after {} renders",
        controller.generation()
    );
    Ok(())
}

/// Prompts for one of `options` and returns its value.
fn choose(prompt: &str, options: &[ApiOption]) -> Result<String, dialoguer::Error> {
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(options[idx].value.clone())
}

fn choose_sort() -> Result<Option<TableSort>, dialoguer::Error> {
    let mut labels = vec!["Store order"];
    labels.extend(TableColumn::all().iter().map(|c| c.label()));

    let idx = Select::new()
        .with_prompt("Sort by")
        .items(&labels)
        .default(0)
        .interact()?;
    if idx == 0 {
        return Ok(None);
    }

    let descending = Confirm::new()
        .with_prompt("Descending?")
        .default(false)
        .interact()?;

    Ok(Some(TableSort {
        column: TableColumn::all()[idx - 1],
        direction: if descending {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    }))
}

fn export_filtered<S: PresentationSink>(
    store: &FarmStore,
    controller: &DashboardController<'_, S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path: String = Input::new()
        .with_prompt("Export to")
        .default("farm_data.csv".to_string())
        .interact_text()?;
    let path = PathBuf::from(path);

    let subset = filter::apply(store.records(), controller.criteria());
    export::write_csv(&subset, File::create(&path)?)?;

    println!("Exported {} farms to {}", subset.len(), path.display());
    Ok(())
}
