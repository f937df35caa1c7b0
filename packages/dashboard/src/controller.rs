//! Reactive controller.
//!
//! Owns the current [`FilterCriteria`] and turns input events into complete
//! recomputations. Each effective change runs filter, aggregation and
//! presentation to completion and hands the result to the
//! [`PresentationSink`] as a single [`DashboardBundle`]. Batched events are
//! coalesced first, so superseded criteria are never computed or rendered.

use farm_monitor_analytics_models::{
    DashboardSummary, FilterCriteria, Selector, SummaryOptions,
};
use farm_monitor_farm_models::{Region, RiskLevel, SupplierTier};
use farm_monitor_store::FarmStore;
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::decoration::Decoration;
use crate::presentation::{DashboardView, Presenter, TableSort};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, AsRefStr)]
pub enum ControllerState {
    /// Waiting for input.
    #[default]
    Idle,
    /// Running a recomputation pass.
    Recomputing,
}

/// A single user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    Search(String),
    Region(Selector<Region>),
    Tier(Selector<SupplierTier>),
    Risk(Selector<RiskLevel>),
    /// Restores the all-pass criteria.
    Reset,
    /// Reorders the visible table rows. `None` restores store order.
    Sort(Option<TableSort>),
}

/// Everything the renderer receives for one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBundle {
    /// Increments once per dispatched bundle, starting at 1.
    pub generation: u64,
    pub criteria: FilterCriteria,
    pub summary: DashboardSummary,
    pub view: DashboardView,
}

/// Receives completed bundles.
pub trait PresentationSink {
    fn present(&mut self, bundle: &DashboardBundle);
}

impl<F: FnMut(&DashboardBundle)> PresentationSink for F {
    fn present(&mut self, bundle: &DashboardBundle) {
        self(bundle);
    }
}

pub struct DashboardController<'a, S: PresentationSink> {
    store: &'a FarmStore,
    options: SummaryOptions,
    presenter: Presenter<'a>,
    criteria: FilterCriteria,
    sort: Option<TableSort>,
    state: ControllerState,
    generation: u64,
    sink: S,
}

impl<'a, S: PresentationSink> DashboardController<'a, S> {
    /// Creates a controller with all-pass criteria and dispatches the
    /// initial bundle.
    pub fn new(
        store: &'a FarmStore,
        options: SummaryOptions,
        decoration: &'a dyn Decoration,
        sink: S,
    ) -> Self {
        let mut controller = Self {
            store,
            options,
            presenter: Presenter::new(decoration, store.loaded_at().date_naive()),
            criteria: FilterCriteria::default(),
            sort: None,
            state: ControllerState::Idle,
            generation: 0,
            sink,
        };
        controller.recompute();
        controller
    }

    /// Applies one event. Returns `true` if a bundle was dispatched.
    pub fn apply(&mut self, event: DashboardEvent) -> bool {
        self.apply_batch(std::iter::once(event))
    }

    /// Folds `events` into the current criteria and recomputes once if the
    /// result differs from what was last dispatched.
    ///
    /// Returns `true` if a bundle was dispatched.
    pub fn apply_batch(&mut self, events: impl IntoIterator<Item = DashboardEvent>) -> bool {
        let mut criteria = self.criteria.clone();
        let mut sort = self.sort;

        for event in events {
            match event {
                DashboardEvent::Search(search) => criteria.search = search,
                DashboardEvent::Region(region) => criteria.region = region,
                DashboardEvent::Tier(tier) => criteria.tier = tier,
                DashboardEvent::Risk(risk) => criteria.risk = risk,
                DashboardEvent::Reset => criteria = FilterCriteria::default(),
                DashboardEvent::Sort(next) => sort = next,
            }
        }

        if criteria == self.criteria && sort == self.sort {
            log::debug!("Criteria unchanged ({criteria}), skipping recomputation");
            return false;
        }

        self.criteria = criteria;
        self.sort = sort;
        self.recompute();
        true
    }

    /// Replaces the whole criteria at once.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> bool {
        self.apply_batch([
            DashboardEvent::Search(criteria.search),
            DashboardEvent::Region(criteria.region),
            DashboardEvent::Tier(criteria.tier),
            DashboardEvent::Risk(criteria.risk),
        ])
    }

    /// Recomputes and dispatches with the current criteria.
    pub fn refresh(&mut self) {
        self.recompute();
    }

    fn recompute(&mut self) {
        self.state = ControllerState::Recomputing;

        let summary = farm_monitor_analytics::run(
            self.store.records(),
            &self.criteria,
            &self.options,
        );
        let view = self.presenter.present(&summary, self.sort);
        self.generation += 1;

        let bundle = DashboardBundle {
            generation: self.generation,
            criteria: self.criteria.clone(),
            summary,
            view,
        };

        self.state = ControllerState::Idle;
        log::debug!(
            "Dispatching bundle {} ({})",
            bundle.generation,
            bundle.summary.filter_summary
        );
        self.sink.present(&bundle);
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub const fn sort(&self) -> Option<TableSort> {
        self.sort
    }

    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Number of bundles dispatched so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
