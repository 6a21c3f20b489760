//! Occupancy statistics: the dashboard overview and per-lot rates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use parkvision_core::{
    Dashboard, DashboardAggregate, DashboardSnapshot, LotFetchFailure, RankedLot,
};

use crate::cli::{GlobalOpts, OutputFormat, StatsArgs, StatsCommand};
use crate::error::CliError;
use crate::output;

use super::lots::summary_detail;

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Lot")]
    lot: String,
    #[tabled(rename = "Occupied")]
    occupied: String,
    #[tabled(rename = "Spots")]
    spots: u32,
    #[tabled(rename = "Rate")]
    rate: String,
}

impl From<&RankedLot> for RankRow {
    fn from(r: &RankedLot) -> Self {
        Self {
            rank: r.rank,
            lot: r
                .name
                .clone()
                .unwrap_or_else(|| format!("lot {}", r.lot_id)),
            occupied: r.summary.occupied.to_string(),
            spots: r.summary.total_spots,
            rate: output::percent(r.summary.occupancy_rate),
        }
    }
}

/// Machine-readable overview for `-o json` / `-o yaml`.
#[derive(Serialize)]
struct OverviewReport<'a> {
    fetched_at: DateTime<Utc>,
    lots: usize,
    aggregate: &'a DashboardAggregate,
    weighted_occupancy_rate: f64,
    top_lots: Vec<RankedLot>,
    failures: &'a [LotFetchFailure],
}

fn overview_text(snapshot: &DashboardSnapshot, top: &[RankedLot]) -> String {
    let agg = &snapshot.aggregate;
    let mut out = vec![
        format!("Lots:            {}", snapshot.lots.len()),
        format!("Total Spots:     {}", agg.total_spots),
        format!("Occupied:        {}", agg.total_occupied),
        format!("Vacant:          {}", agg.total_vacant),
        format!("Reserved:        {}", agg.total_reserved),
        format!(
            "Average Rate:    {}",
            output::percent(agg.average_occupancy_rate)
        ),
        format!(
            "Weighted Rate:   {}",
            output::percent(agg.weighted_occupancy_rate())
        ),
    ];
    if !top.is_empty() {
        let rows: Vec<RankRow> = top.iter().map(RankRow::from).collect();
        out.push(String::new());
        out.push(output::render_table(&rows));
    }
    out.join("\n")
}

pub async fn handle(
    dashboard: &Dashboard,
    args: StatsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StatsCommand::Overview { top } => {
            let snapshot = dashboard.snapshot().await?;
            let ranked = snapshot.top_lots(top);

            if !global.quiet {
                for failure in &snapshot.failures {
                    eprintln!(
                        "warning: lot {} ({}) left out: {}",
                        failure.lot_id, failure.name, failure.reason
                    );
                }
            }

            let out = match global.output {
                OutputFormat::Table => overview_text(&snapshot, &ranked),
                OutputFormat::Plain => ranked
                    .iter()
                    .map(|r| r.lot_id.to_string())
                    .collect::<Vec<_>>()
                    .join("\n"),
                _ => {
                    let report = OverviewReport {
                        fetched_at: snapshot.fetched_at,
                        lots: snapshot.lots.len(),
                        aggregate: &snapshot.aggregate,
                        weighted_occupancy_rate: snapshot.aggregate.weighted_occupancy_rate(),
                        top_lots: ranked,
                        failures: &snapshot.failures,
                    };
                    output::render_single(&global.output, &report, |_| String::new(), |_| {
                        String::new()
                    })
                }
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StatsCommand::Lot { id } => {
            let color = output::should_color(&global.color);
            let summary = dashboard.lot_summary(id).await?;
            let out = output::render_single(
                &global.output,
                &summary,
                |s| summary_detail(s, color),
                |s| output::percent(s.occupancy_rate),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
