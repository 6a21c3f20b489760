//! Spot command handlers.

use parkvision_core::{Command as CoreCommand, CommandResult, Dashboard, SpotReading};

use crate::cli::{GlobalOpts, SpotsArgs, SpotsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(r: &SpotReading, color: bool) -> String {
    [
        format!("Spot:        {}", r.spot_id),
        format!("Status:      {}", output::paint_status(r.status, color)),
        format!("Detected At: {}", util::format_time(r.detected_at)),
    ]
    .join("\n")
}

pub async fn handle(
    dashboard: &Dashboard,
    args: SpotsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        SpotsCommand::Set {
            lot,
            spot,
            status,
            meta,
        } => {
            let meta = util::parse_meta(meta.as_deref())?;
            let result = dashboard
                .execute(CoreCommand::SetSpotStatus {
                    lot_id: lot,
                    spot_id: spot,
                    status,
                    meta,
                })
                .await?;
            if let CommandResult::SpotStatus {
                spot_id,
                status,
                detected_at,
            } = result
            {
                let reading = SpotReading {
                    spot_id,
                    status,
                    detected_at,
                };
                let out = output::render_single(
                    &global.output,
                    &reading,
                    |r| detail(r, color),
                    |r| r.status.to_string(),
                );
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        SpotsCommand::Cycle { lot, spot } => {
            let (previous, next) = dashboard.cycle_spot(lot, spot).await?;
            if !global.quiet {
                println!(
                    "Spot {spot}: {} → {}",
                    output::paint_status(previous, color),
                    output::paint_status(next, color)
                );
            }
            Ok(())
        }

        SpotsCommand::Status { lot, spot } => {
            let reading = dashboard.spot_status(lot, spot).await?;
            let out = output::render_single(
                &global.output,
                &reading,
                |r| detail(r, color),
                |r| r.status.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
