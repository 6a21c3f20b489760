//! Lot command handlers.

use serde::Deserialize;
use tabled::Tabled;

use parkvision_core::{
    Command as CoreCommand, CommandResult, CreateLotRequest, Dashboard, Lot, LotOccupancySummary,
    Spot, SpotPolygon, SpotStatus, SpotStatusChange, UpdateLotRequest, filter_spots,
};

use crate::cli::{GlobalOpts, LotFields, LotsArgs, LotsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LotRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Spaces")]
    spaces: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Lot> for LotRow {
    fn from(l: &Lot) -> Self {
        Self {
            id: l.id.to_string(),
            name: l.name.clone(),
            address: l.address.clone().unwrap_or_default(),
            spaces: l.total_spaces.to_string(),
            updated: util::format_time(l.updated_at.or(l.created_at)),
        }
    }
}

#[derive(Tabled)]
pub(super) struct SpotRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Spot")]
    label: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl SpotRow {
    pub(super) fn new(s: &Spot, color: bool) -> Self {
        Self {
            id: s.id.to_string(),
            label: s.label.clone(),
            status: output::paint_status(s.status, color),
            last_seen: util::format_time(s.last_detected_at),
        }
    }
}

fn detail(l: &Lot) -> String {
    let mut lines = vec![
        format!("ID:          {}", l.id),
        format!("Name:        {}", l.name),
        format!("Address:     {}", l.address.as_deref().unwrap_or("-")),
        format!("Spaces:      {}", l.total_spaces),
    ];
    if let Some(ref d) = l.description {
        lines.push(format!("Description: {d}"));
    }
    if let Some(ref v) = l.video_path {
        lines.push(format!("Video:       {v}"));
    }
    if let Some(ref f) = l.init_frame_path {
        lines.push(format!("Init Frame:  {f}"));
    }
    lines.push(format!("Created:     {}", util::format_time(l.created_at)));
    lines.push(format!("Updated:     {}", util::format_time(l.updated_at)));
    lines.join("\n")
}

/// Per-lot occupancy detail, shared with `stats lot`.
pub(super) fn summary_detail(s: &LotOccupancySummary, color: bool) -> String {
    let line = |status: SpotStatus, count: u32| {
        let label = format!("{status}:");
        let label = format!("{label:<10}");
        format!("{}{count}", output::paint_status_label(status, &label, color))
    };
    [
        format!("Lot:      {}", s.lot_id),
        format!("Spots:    {}", s.total_spots),
        line(SpotStatus::Occupied, s.occupied),
        line(SpotStatus::Vacant, s.vacant),
        line(SpotStatus::Reserved, s.reserved),
        line(SpotStatus::Unknown, s.unknown()),
        format!("Rate:     {}", output::percent(s.occupancy_rate)),
    ]
    .join("\n")
}

// ── File payloads ───────────────────────────────────────────────────

/// `init --from-file` accepts the bare list or the request envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum InitFile {
    Envelope { annotations: Vec<SpotPolygon> },
    Bare(Vec<SpotPolygon>),
}

/// `bulk-update --from-file` accepts the bare list or the request envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum BulkFile {
    Envelope { updates: Vec<SpotStatusChange> },
    Bare(Vec<SpotStatusChange>),
}

fn apply_fields(update: &mut UpdateLotRequest, fields: LotFields) {
    update.address = fields.address.or(update.address.take());
    update.description = fields.description.or(update.description.take());
    update.video_path = fields.video_path.or(update.video_path.take());
    update.init_frame_path = fields.init_frame_path.or(update.init_frame_path.take());
    update.video_start_time = fields.video_start_time.or(update.video_start_time.take());
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    dashboard: &Dashboard,
    args: LotsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        LotsCommand::List => {
            let lots = dashboard.lots().await?;
            let out = output::render_list(&global.output, &lots, |l| LotRow::from(l), |l| {
                l.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LotsCommand::Get { id } => {
            let lot = dashboard.lot(id).await?;
            let out = output::render_single(&global.output, &lot, detail, |l| l.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LotsCommand::Create {
            name,
            total_spaces,
            fields,
            from_file,
        } => {
            let req = if let Some(path) = from_file {
                util::read_json_file::<CreateLotRequest>(&path)?
            } else {
                CreateLotRequest {
                    name: name.unwrap_or_default(),
                    address: fields.address,
                    total_spaces,
                    description: fields.description,
                    video_path: fields.video_path,
                    init_frame_path: fields.init_frame_path,
                    video_start_time: fields.video_start_time,
                }
            };
            let result = dashboard.execute(CoreCommand::CreateLot(req)).await?;
            if let CommandResult::Lot(lot) = result {
                let out =
                    output::render_single(&global.output, &lot, detail, |l| l.id.to_string());
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        LotsCommand::Update {
            id,
            name,
            total_spaces,
            fields,
            from_file,
        } => {
            let mut update = match from_file {
                Some(path) => util::read_json_file::<UpdateLotRequest>(&path)?,
                None => UpdateLotRequest::default(),
            };
            update.name = name.or(update.name.take());
            update.total_spaces = total_spaces.or(update.total_spaces.take());
            apply_fields(&mut update, fields);

            let result = dashboard
                .execute(CoreCommand::UpdateLot { id, update })
                .await?;
            if let CommandResult::Lot(lot) = result {
                let out =
                    output::render_single(&global.output, &lot, detail, |l| l.id.to_string());
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        LotsCommand::Delete { id } => {
            if !util::confirm(
                "lots delete",
                &format!("Delete lot {id} and all of its spots?"),
                global.yes,
            )? {
                return Ok(());
            }
            dashboard.execute(CoreCommand::DeleteLot { id }).await?;
            if !global.quiet {
                eprintln!("Lot {id} deleted");
            }
            Ok(())
        }

        LotsCommand::Status { id } => {
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

        LotsCommand::Spots { id, status } => {
            let spots = dashboard.lot_spots(id).await?;
            let shown: Vec<Spot> = filter_spots(&spots, status).into_iter().cloned().collect();
            let out = output::render_list(
                &global.output,
                &shown,
                |s| SpotRow::new(s, color),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LotsCommand::Init { id, from_file } => {
            let polygons = match util::read_json_file::<InitFile>(&from_file)? {
                InitFile::Envelope { annotations } | InitFile::Bare(annotations) => annotations,
            };
            let result = dashboard
                .execute(CoreCommand::InitLot { id, polygons })
                .await?;
            if let CommandResult::Spots(spots) = result {
                if !global.quiet {
                    eprintln!("Created {} spots in lot {id}", spots.len());
                }
                let out = output::render_list(
                    &global.output,
                    &spots,
                    |s| SpotRow::new(s, color),
                    |s| s.id.to_string(),
                );
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        LotsCommand::BulkUpdate { id, from_file } => {
            let changes = match util::read_json_file::<BulkFile>(&from_file)? {
                BulkFile::Envelope { updates } | BulkFile::Bare(updates) => updates,
            };
            let result = dashboard
                .execute(CoreCommand::BulkUpdateSpots { lot_id: id, changes })
                .await?;
            if let CommandResult::SpotsUpdated(count) = result {
                if !global.quiet {
                    eprintln!("Updated {count} spots in lot {id}");
                }
            }
            Ok(())
        }
    }
}
