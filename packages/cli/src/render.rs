//! Plain-text rendering of a [`DashboardView`] for the terminal.

use std::io::Write;

use farm_monitor_dashboard::controller::{DashboardBundle, PresentationSink};
use farm_monitor_dashboard::presentation::{Chart, Panel, TableView};
use farm_monitor_dashboard::DashboardView;

/// Column widths for the farm table, matching [`TableColumn::all`] order.
///
/// [`TableColumn::all`]: farm_monitor_dashboard::presentation::TableColumn::all
const WIDTHS: [usize; 9] = [18, 9, 14, 7, 10, 6, 5, 13, 11];

/// Writes `view` to `out`.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn render(view: &DashboardView, out: &mut impl Write) -> std::io::Result<()> {
    let header = &view.header;
    writeln!(out, "{} | {}", header.title, header.subtitle)?;
    writeln!(
        out,
        "{} | Last Updated: {}",
        header.portfolio_label, header.last_updated
    )?;
    writeln!(out)?;

    for card in &view.cards {
        writeln!(out, "  {:<16} {:>8}  {}", card.label, card.value, card.caption)?;
    }
    writeln!(out)?;

    for panel in [&view.land, &view.water, &view.biodiversity] {
        render_panel(panel, out)?;
    }

    for chart in [
        &view.regional_chart,
        &view.risk_chart,
        &view.tier_chart,
        &view.scheme_chart,
    ] {
        render_chart(chart, out)?;
    }

    render_table(&view.table, out)?;

    let summary = &view.filter_summary;
    writeln!(
        out,
        "{} | {} | {}",
        summary.headline, summary.tnfd_compliant, summary.sfi_enrolled
    )
}

fn render_panel(panel: &Panel, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", panel.title)?;
    for item in &panel.items {
        writeln!(out, "  {:<26} {}", item.label, item.value)?;
    }
    writeln!(out)
}

fn render_chart(chart: &Chart, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", chart.title)?;
    if let Some(message) = &chart.empty_message {
        writeln!(out, "  {message}")?;
        return writeln!(out);
    }

    for (i, category) in chart.categories.iter().enumerate() {
        write!(out, "  {category:<16}")?;
        for trace in &chart.traces {
            if let Some(value) = trace.values.get(i) {
                write!(out, "  {}: {value:.1}", trace.name)?;
            }
        }
        writeln!(out)?;
    }
    writeln!(out)
}

fn render_table(table: &TableView, out: &mut impl Write) -> std::io::Result<()> {
    match table {
        TableView::Empty { message } => writeln!(out, "{message}")?,
        TableView::Rows { columns, rows } => {
            let labels: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
            write_row(&labels, out)?;
            for row in rows {
                let size = row.size.to_string();
                let score = row.overall_score.to_string();
                write_row(
                    &[
                        row.name.as_str(),
                        row.id.as_str(),
                        row.region.as_ref(),
                        row.supplier_tier.as_ref(),
                        &size,
                        &score,
                        row.tnfd.as_ref(),
                        row.drought_risk.as_ref(),
                        row.flood_risk.as_ref(),
                    ],
                    out,
                )?;
            }
        }
    }
    writeln!(out)
}

fn write_row(cells: &[&str], out: &mut impl Write) -> std::io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(WIDTHS)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", line.join(" ").trim_end())
}

/// Prints every dispatched bundle to stdout.
pub struct TerminalSink;

impl PresentationSink for TerminalSink {
    fn present(&mut self, bundle: &DashboardBundle) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = render(&bundle.view, &mut stdout) {
            log::error!("Failed to render dashboard: {e}");
        }
    }
}
