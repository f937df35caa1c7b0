//! Presentation adapter.
//!
//! Turns a [`DashboardSummary`] into renderer-ready structures: formatted
//! metric cards, labelled panels, chart traces, and table rows. Nothing
//! here computes a metric; values are only formatted and arranged.

use std::cmp::Ordering;

use farm_monitor_analytics_models::{DashboardSummary, FarmTable, FarmTableRow};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::decoration::Decoration;

pub const TITLE: &str = "UK Dairy Processor";
pub const SUBTITLE: &str = "Environmental Monitoring Dashboard";

/// Shown in place of a chart when the filtered subset is empty.
pub const NO_DATA: &str = "No data available";

/// Shown in place of the farm table when the filtered subset is empty.
pub const NO_MATCHES: &str = "No farms match the selected filters";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub title: String,
    pub subtitle: String,
    /// e.g. "270 Supplier Farms".
    pub portfolio_label: String,
    /// Store load date as `dd/mm/yyyy`.
    pub last_updated: String,
}

/// A headline metric card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub label: String,
    pub value: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelItem {
    pub label: String,
    pub value: String,
}

/// A titled list of labelled values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub title: String,
    pub items: Vec<PanelItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    /// Bars on the primary axis with line traces on a secondary axis.
    BarWithLines,
    StackedBar,
    Donut,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TraceKind {
    Bar,
    Line,
    Slice,
}

/// One data series, aligned with [`Chart::categories`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub name: String,
    pub kind: TraceKind,
    pub secondary_axis: bool,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    pub categories: Vec<String>,
    pub traces: Vec<Trace>,
    /// Set instead of data when the subset is empty.
    pub empty_message: Option<String>,
}

impl Chart {
    fn new(title: &str, kind: ChartKind) -> Self {
        Self {
            title: title.to_string(),
            kind,
            categories: Vec::new(),
            traces: Vec::new(),
            empty_message: None,
        }
    }

    fn empty(mut self) -> Self {
        self.empty_message = Some(NO_DATA.to_string());
        self
    }

    fn trace(mut self, name: &str, kind: TraceKind, secondary_axis: bool, values: Vec<f64>) -> Self {
        self.traces.push(Trace {
            name: name.to_string(),
            kind,
            secondary_axis,
            values,
        });
        self
    }
}

/// Farm table columns, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum TableColumn {
    Name,
    Id,
    Region,
    SupplierTier,
    Size,
    OverallScore,
    Tnfd,
    DroughtRisk,
    FloodRisk,
}

impl TableColumn {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Name,
            Self::Id,
            Self::Region,
            Self::SupplierTier,
            Self::Size,
            Self::OverallScore,
            Self::Tnfd,
            Self::DroughtRisk,
            Self::FloodRisk,
        ]
    }

    /// Column header text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Farm Name",
            Self::Id => "ID",
            Self::Region => "Region",
            Self::SupplierTier => "Tier",
            Self::Size => "Size (ha)",
            Self::OverallScore => "Score",
            Self::Tnfd => "TNFD",
            Self::DroughtRisk => "Drought Risk",
            Self::FloodRisk => "Flood Risk",
        }
    }

    fn compare(self, a: &FarmTableRow, b: &FarmTableRow) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Id => a.id.cmp(&b.id),
            Self::Region => text(&a.region).cmp(text(&b.region)),
            Self::SupplierTier => text(&a.supplier_tier).cmp(text(&b.supplier_tier)),
            Self::Size => a.size.cmp(&b.size),
            Self::OverallScore => a.overall_score.cmp(&b.overall_score),
            Self::Tnfd => text(&a.tnfd).cmp(text(&b.tnfd)),
            Self::DroughtRisk => text(&a.drought_risk).cmp(text(&b.drought_risk)),
            Self::FloodRisk => text(&a.flood_risk).cmp(text(&b.flood_risk)),
        }
    }

    /// The cell text shown for this column in `row`.
    #[must_use]
    pub fn cell_text(self, row: &FarmTableRow) -> String {
        match self {
            Self::Name => row.name.clone(),
            Self::Id => row.id.clone(),
            Self::Region => text(&row.region).to_string(),
            Self::SupplierTier => text(&row.supplier_tier).to_string(),
            Self::Size => row.size.to_string(),
            Self::OverallScore => row.overall_score.to_string(),
            Self::Tnfd => text(&row.tnfd).to_string(),
            Self::DroughtRisk => text(&row.drought_risk).to_string(),
            Self::FloodRisk => text(&row.flood_risk).to_string(),
        }
    }
}

fn text<T: AsRef<str>>(value: &T) -> &str {
    value.as_ref()
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A renderer-requested sort of the visible table rows.
///
/// Sorting reorders only the rows already selected for display; it never
/// changes which records make the cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSort {
    pub column: TableColumn,
    pub direction: SortDirection,
}

impl TableSort {
    /// Sorts `rows` in place. The sort is stable, so ties keep store order.
    pub fn apply(self, rows: &mut [FarmTableRow]) {
        rows.sort_by(|a, b| {
            let ordering = self.column.compare(a, b);
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

/// A renderer-requested filter on one table column.
///
/// Keeps the visible rows whose cell text contains `value`, ignoring case.
/// Like [`TableSort`] it only narrows the rows already selected for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFilter {
    pub column: TableColumn,
    pub value: String,
}

impl TableFilter {
    #[must_use]
    pub fn matches(&self, row: &FarmTableRow) -> bool {
        self.column
            .cell_text(row)
            .to_lowercase()
            .contains(&self.value.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    pub key: TableColumn,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TableView {
    Rows {
        columns: Vec<ColumnHeader>,
        rows: Vec<FarmTableRow>,
    },
    Empty {
        message: String,
    },
}

impl TableView {
    /// Drops visible rows that fail any of `filters`. An empty table stays
    /// empty.
    pub fn retain_matching(&mut self, filters: &[TableFilter]) {
        if let Self::Rows { rows, .. } = self {
            rows.retain(|row| filters.iter().all(|filter| filter.matches(row)));
        }
    }
}

/// The "Showing n of total farms" line and its two counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummaryView {
    pub headline: String,
    pub tnfd_compliant: String,
    pub sfi_enrolled: String,
}

/// Every renderable artifact for one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub header: Header,
    pub cards: Vec<Card>,
    pub land: Panel,
    pub water: Panel,
    pub biodiversity: Panel,
    pub regional_chart: Chart,
    pub risk_chart: Chart,
    pub tier_chart: Chart,
    pub scheme_chart: Chart,
    pub table: TableView,
    pub filter_summary: FilterSummaryView,
}

/// Maps summaries to views.
pub struct Presenter<'a> {
    decoration: &'a dyn Decoration,
    last_updated: String,
}

impl<'a> Presenter<'a> {
    /// `last_updated` is the store load date shown in the header.
    #[must_use]
    pub fn new(decoration: &'a dyn Decoration, last_updated: chrono::NaiveDate) -> Self {
        Self {
            decoration,
            last_updated: last_updated.format("%d/%m/%Y").to_string(),
        }
    }

    #[must_use]
    pub fn present(&self, summary: &DashboardSummary, sort: Option<TableSort>) -> DashboardView {
        let is_empty = summary.cards.total_farms == 0;

        DashboardView {
            header: Header {
                title: TITLE.to_string(),
                subtitle: SUBTITLE.to_string(),
                portfolio_label: format!("{} Supplier Farms", summary.filter_summary.total),
                last_updated: self.last_updated.clone(),
            },
            cards: cards(summary),
            land: self.land_panel(summary),
            water: water_panel(summary),
            biodiversity: self.biodiversity_panel(summary),
            regional_chart: regional_chart(summary, is_empty),
            risk_chart: risk_chart(summary, is_empty),
            tier_chart: tier_chart(summary, is_empty),
            scheme_chart: scheme_chart(summary, is_empty),
            table: table_view(&summary.table, sort),
            filter_summary: FilterSummaryView {
                headline: summary.filter_summary.to_string(),
                tnfd_compliant: format!("{} TNFD Compliant", summary.filter_summary.tnfd_compliant),
                sfi_enrolled: format!("{} SFI Enrolled", summary.filter_summary.sfi_enrolled),
            },
        }
    }

    fn land_panel(&self, summary: &DashboardSummary) -> Panel {
        let decoration = self.decoration.values();
        panel(
            "Land Metrics",
            &[
                (
                    "Natural Habitat Coverage",
                    format!("{:.0} ha", summary.land.natural_habitat_area_ha),
                ),
                (
                    "Soil Health Compliance",
                    format!("{:.1}%", summary.land.soil_health_compliance_pct),
                ),
                (
                    "Peatland Exposure",
                    format!("{} ha", decoration.peatland_exposure_ha),
                ),
            ],
        )
    }

    fn biodiversity_panel(&self, summary: &DashboardSummary) -> Panel {
        let decoration = self.decoration.values();
        panel(
            "Biodiversity Metrics",
            &[
                (
                    "Average Score",
                    format!("{:.0}/100", summary.biodiversity.avg_biodiversity),
                ),
                ("Species Richness", decoration.species_richness.to_string()),
                (
                    "Habitat Connectivity",
                    format!("{}%", decoration.habitat_connectivity_pct),
                ),
            ],
        )
    }
}

fn card(label: &str, value: String, caption: &str) -> Card {
    Card {
        label: label.to_string(),
        value,
        caption: caption.to_string(),
    }
}

fn cards(summary: &DashboardSummary) -> Vec<Card> {
    let cards = &summary.cards;
    vec![
        card("Total Farms", cards.total_farms.to_string(), "suppliers"),
        card(
            "TNFD Compliance",
            format!("{:.1}%", cards.tnfd_compliance_pct),
            "+12% this quarter",
        ),
        card(
            "Avg Score",
            format!("{:.0}/100", cards.avg_score),
            "+8.1 points",
        ),
        card(
            "High Risk Farms",
            format!("{:.1}%", cards.high_risk_pct),
            "-3% vs last quarter",
        ),
    ]
}

fn panel(title: &str, items: &[(&str, String)]) -> Panel {
    Panel {
        title: title.to_string(),
        items: items
            .iter()
            .map(|(label, value)| PanelItem {
                label: (*label).to_string(),
                value: value.clone(),
            })
            .collect(),
    }
}

fn water_panel(summary: &DashboardSummary) -> Panel {
    panel(
        "Water Metrics",
        &[
            (
                "Average Efficiency",
                format!("{:.0}%", summary.water.avg_water_efficiency),
            ),
            (
                "Compliance Rate",
                format!("{:.1}%", summary.water.water_compliance_pct),
            ),
            (
                "Risk Exposure",
                format!("{:.1}%", summary.water.risk_exposure_pct),
            ),
        ],
    )
}

#[allow(clippy::cast_precision_loss)]
fn regional_chart(summary: &DashboardSummary, is_empty: bool) -> Chart {
    let chart = Chart::new("Regional Performance", ChartKind::BarWithLines);
    if is_empty {
        return chart.empty();
    }

    let regional = &summary.regional;
    let mut chart = chart
        .trace(
            "Number of Farms",
            TraceKind::Bar,
            false,
            regional.iter().map(|p| p.farms as f64).collect(),
        )
        .trace(
            "Avg Score",
            TraceKind::Line,
            true,
            regional.iter().map(|p| p.avg_score).collect(),
        )
        .trace(
            "TNFD Compliance %",
            TraceKind::Line,
            true,
            regional.iter().map(|p| p.tnfd_compliance_pct).collect(),
        );
    chart.categories = regional.iter().map(|p| p.region.to_string()).collect();
    chart
}

#[allow(clippy::cast_precision_loss)]
fn risk_chart(summary: &DashboardSummary, is_empty: bool) -> Chart {
    let chart = Chart::new("Risk Assessment", ChartKind::StackedBar);
    if is_empty {
        return chart.empty();
    }

    let risk = &summary.risk;
    let mut chart = chart
        .trace(
            "Drought Risk",
            TraceKind::Bar,
            false,
            risk.iter().map(|b| b.drought as f64).collect(),
        )
        .trace(
            "Flood Risk",
            TraceKind::Bar,
            false,
            risk.iter().map(|b| b.flood as f64).collect(),
        );
    chart.categories = risk.iter().map(|b| b.level.to_string()).collect();
    chart
}

#[allow(clippy::cast_precision_loss)]
fn tier_chart(summary: &DashboardSummary, is_empty: bool) -> Chart {
    let chart = Chart::new("Supplier Tier Distribution", ChartKind::Donut);
    if is_empty {
        return chart.empty();
    }

    let mut chart = chart.trace(
        "Farms",
        TraceKind::Slice,
        false,
        summary.tiers.iter().map(|t| t.count as f64).collect(),
    );
    chart.categories = summary.tiers.iter().map(|t| t.tier.to_string()).collect();
    chart
}

#[allow(clippy::cast_precision_loss)]
fn scheme_chart(summary: &DashboardSummary, is_empty: bool) -> Chart {
    let chart = Chart::new("Environmental Scheme Enrollment", ChartKind::Bar);
    if is_empty {
        return chart.empty();
    }

    let schemes = summary.schemes;
    let mut chart = chart.trace(
        "Number of Farms",
        TraceKind::Bar,
        false,
        vec![schemes.sfi as f64, schemes.cs as f64, schemes.both as f64],
    );
    chart.categories = vec![
        "SFI Enrolled".to_string(),
        "CS Enrolled".to_string(),
        "Both Schemes".to_string(),
    ];
    chart
}

fn table_view(table: &FarmTable, sort: Option<TableSort>) -> TableView {
    match table {
        FarmTable::NoMatches => TableView::Empty {
            message: NO_MATCHES.to_string(),
        },
        FarmTable::Rows { rows } => {
            let mut rows = rows.clone();
            if let Some(sort) = sort {
                sort.apply(&mut rows);
            }
            TableView::Rows {
                columns: TableColumn::all()
                    .iter()
                    .map(|&key| ColumnHeader {
                        key,
                        label: key.label().to_string(),
                    })
                    .collect(),
                rows,
            }
        }
    }
}
