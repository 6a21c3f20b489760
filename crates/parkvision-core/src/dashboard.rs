// ── Dashboard facade ──
//
// Owns the API client and exposes the admin operations in domain terms.
// Reads return domain types, writes go through `execute(Command)`, and
// `snapshot()` performs the per-lot fan-out that feeds the aggregators.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use parkvision_api::ParkClient;
use parkvision_api::types::{
    BulkSpotUpdate, LotCreate, LotUpdate, SpotAnnotation, SpotStatusUpdate, UserUpdate,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandResult, CreateLotRequest, UpdateLotRequest};
use crate::config::ServerConfig;
use crate::convert::parse_timestamp;
use crate::error::CoreError;
use crate::model::{Lot, LotId, Spot, SpotId, SpotStatus, User, UserId};
use crate::occupancy::{
    DashboardAggregate, LotOccupancySummary, RankedLot, aggregate_dashboard,
    aggregate_lot_from_summary, top_lots,
};

/// Latest recorded status of a single spot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotReading {
    pub spot_id: SpotId,
    pub status: SpotStatus,
    pub detected_at: Option<DateTime<Utc>>,
}

/// A lot whose status fetch failed during a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotFetchFailure {
    pub lot_id: LotId,
    pub name: String,
    pub reason: String,
}

/// Everything the overview screen needs, captured at one point in time.
///
/// Immutable: a refresh builds a new snapshot rather than patching this one.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub fetched_at: DateTime<Utc>,
    /// Every lot the backend listed, including ones whose status failed.
    pub lots: Vec<Lot>,
    /// One summary per lot whose status was fetched, in listing order.
    pub summaries: Vec<LotOccupancySummary>,
    pub aggregate: DashboardAggregate,
    pub failures: Vec<LotFetchFailure>,
}

impl DashboardSnapshot {
    /// The `n` busiest lots, joined with their names.
    pub fn top_lots(&self, n: usize) -> Vec<RankedLot> {
        let names: HashMap<LotId, String> = self
            .lots
            .iter()
            .map(|lot| (lot.id, lot.name.clone()))
            .collect();
        top_lots(&self.summaries, &names, n)
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Entry point for every admin operation against one backend.
pub struct Dashboard {
    client: ParkClient,
    config: ServerConfig,
}

impl Dashboard {
    pub fn new(config: ServerConfig) -> Result<Self, CoreError> {
        let client = ParkClient::new(
            config.url.as_str(),
            config.token.as_ref(),
            &config.transport(),
        )?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Exchange credentials for a bearer token.
    ///
    /// The token is returned, not stored: building an authenticated
    /// dashboard from it is the caller's job.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, CoreError> {
        if username.trim().is_empty() || password.expose_secret().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "username and password are required".into(),
            });
        }
        let session = self.client.login(username.trim(), password).await?;
        info!(username = username.trim(), "authenticated");
        Ok(session.token)
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub async fn lots(&self) -> Result<Vec<Lot>, CoreError> {
        let raw = self.client.list_lots().await?;
        Ok(raw.into_iter().map(Lot::from).collect())
    }

    pub async fn lot(&self, id: LotId) -> Result<Lot, CoreError> {
        let raw = self
            .client
            .get_lot(id.get())
            .await
            .map_err(|e| CoreError::from(e).for_entity("Lot", id))?;
        Ok(Lot::from(raw))
    }

    /// Occupancy counts for one lot, from its status map.
    pub async fn lot_summary(&self, id: LotId) -> Result<LotOccupancySummary, CoreError> {
        let resp = self
            .client
            .lot_status(id.get())
            .await
            .map_err(|e| CoreError::from(e).for_entity("Lot", id))?;
        Ok(aggregate_lot_from_summary(id, &resp.summary))
    }

    pub async fn lot_spots(&self, id: LotId) -> Result<Vec<Spot>, CoreError> {
        let raw = self
            .client
            .list_spots(id.get())
            .await
            .map_err(|e| CoreError::from(e).for_entity("Lot", id))?;
        Ok(raw.into_iter().map(Spot::from).collect())
    }

    pub async fn spot_status(&self, lot: LotId, spot: SpotId) -> Result<SpotReading, CoreError> {
        let resp = self
            .client
            .spot_status(lot.get(), spot.get())
            .await
            .map_err(|e| CoreError::from(e).for_entity("Spot", spot))?;
        Ok(SpotReading {
            spot_id: resp.spot_id.map_or(spot, SpotId),
            status: SpotStatus::classify(resp.status.as_deref()),
            detected_at: parse_timestamp(resp.detected_at.as_deref()),
        })
    }

    pub async fn users(&self) -> Result<Vec<User>, CoreError> {
        let raw = self.client.list_users().await?;
        Ok(raw.into_iter().map(User::from).collect())
    }

    pub async fn user(&self, id: UserId) -> Result<User, CoreError> {
        let raw = self
            .client
            .get_user(id.get())
            .await
            .map_err(|e| CoreError::from(e).for_entity("User", id))?;
        Ok(User::from(raw))
    }

    // ── Snapshot (fan-out / fan-in) ──────────────────────────────────

    /// List every lot, fetch all status maps concurrently and aggregate.
    ///
    /// A lot whose status request fails is left out of the aggregate and
    /// reported in [`DashboardSnapshot::failures`]; it never fails the
    /// snapshot. Failing to list lots at all does.
    pub async fn snapshot(&self) -> Result<DashboardSnapshot, CoreError> {
        let lots = self.lots().await?;
        debug!(lots = lots.len(), "fetching lot status maps");

        let fetches = lots.iter().map(|lot| self.client.lot_status(lot.id.get()));
        let results = join_all(fetches).await;

        let mut summaries = Vec::with_capacity(lots.len());
        let mut failures = Vec::new();
        for (lot, result) in lots.iter().zip(results) {
            match result {
                Ok(resp) => summaries.push(aggregate_lot_from_summary(lot.id, &resp.summary)),
                // An expired session fails every lot the same way.
                Err(e) if e.is_auth_expired() => return Err(CoreError::from(e)),
                Err(e) => {
                    warn!(
                        lot_id = %lot.id,
                        error = %e,
                        transient = e.is_transient(),
                        deleted = e.is_not_found(),
                        "lot status fetch failed; omitting from aggregate"
                    );
                    failures.push(LotFetchFailure {
                        lot_id: lot.id,
                        name: lot.name.clone(),
                        reason: CoreError::from(e).to_string(),
                    });
                }
            }
        }

        let aggregate = aggregate_dashboard(&summaries);
        Ok(DashboardSnapshot {
            fetched_at: Utc::now(),
            lots,
            summaries,
            aggregate,
            failures,
        })
    }

    // ── Spot status cycle ────────────────────────────────────────────

    /// Advance a spot one step through the manual cycle.
    ///
    /// The current status is read from the lot's spot listing, the same
    /// source the operator sees. Returns `(previous, new)`.
    pub async fn cycle_spot(
        &self,
        lot: LotId,
        spot: SpotId,
    ) -> Result<(SpotStatus, SpotStatus), CoreError> {
        let spots = self.lot_spots(lot).await?;
        let current = spots
            .iter()
            .find(|s| s.id == spot)
            .map(|s| s.status)
            .ok_or_else(|| CoreError::not_found("Spot", spot))?;

        let next = current.next();
        self.client
            .update_spot(
                lot.get(),
                spot.get(),
                &SpotStatusUpdate {
                    status: next.to_string(),
                    meta: None,
                },
            )
            .await
            .map_err(|e| CoreError::from(e).for_entity("Spot", spot))?;

        info!(lot_id = %lot, spot_id = %spot, from = %current, to = %next, "spot status cycled");
        Ok((current, next))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Validate and run one write operation.
    #[allow(clippy::too_many_lines)]
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        match cmd {
            Command::CreateLot(req) => {
                let body = lot_create(req)?;
                let raw = self.client.create_lot(&body).await?;
                Ok(CommandResult::Lot(Lot::from(raw)))
            }
            Command::UpdateLot { id, update } => {
                let body = lot_update(update)?;
                let raw = self
                    .client
                    .update_lot(id.get(), &body)
                    .await
                    .map_err(|e| CoreError::from(e).for_entity("Lot", id))?;
                Ok(CommandResult::Lot(Lot::from(raw)))
            }
            Command::DeleteLot { id } => {
                self.client
                    .delete_lot(id.get())
                    .await
                    .map_err(|e| CoreError::from(e).for_entity("Lot", id))?;
                Ok(CommandResult::Ok)
            }
            Command::InitLot { id, polygons } => {
                if let Some(bad) = polygons.iter().position(|p| p.points.len() < 3) {
                    return Err(CoreError::ValidationFailed {
                        message: format!("polygon {bad} needs at least three points"),
                    });
                }
                let annotations = polygons
                    .into_iter()
                    .map(|p| SpotAnnotation { points: p.points })
                    .collect();
                let raw = self
                    .client
                    .init_lot(id.get(), annotations)
                    .await
                    .map_err(|e| CoreError::from(e).for_entity("Lot", id))?;
                Ok(CommandResult::Spots(raw.into_iter().map(Spot::from).collect()))
            }
            Command::SetSpotStatus {
                lot_id,
                spot_id,
                status,
                meta,
            } => {
                require_known(status)?;
                let resp = self
                    .client
                    .update_spot(
                        lot_id.get(),
                        spot_id.get(),
                        &SpotStatusUpdate {
                            status: status.to_string(),
                            meta,
                        },
                    )
                    .await
                    .map_err(|e| CoreError::from(e).for_entity("Spot", spot_id))?;
                Ok(CommandResult::SpotStatus {
                    spot_id,
                    status: resp
                        .status
                        .as_deref()
                        .map_or(status, |raw| SpotStatus::classify(Some(raw))),
                    detected_at: parse_timestamp(resp.detected_at.as_deref()),
                })
            }
            Command::BulkUpdateSpots { lot_id, changes } => {
                if changes.is_empty() {
                    return Err(CoreError::ValidationFailed {
                        message: "bulk update needs at least one change".into(),
                    });
                }
                for change in &changes {
                    require_known(change.status)?;
                }
                let count = changes.len();
                let updates = changes
                    .into_iter()
                    .map(|c| BulkSpotUpdate {
                        spot_id: c.spot_id.get(),
                        status: c.status.to_string(),
                        meta: c.meta,
                    })
                    .collect();
                self.client
                    .bulk_update_spots(lot_id.get(), updates)
                    .await
                    .map_err(|e| CoreError::from(e).for_entity("Lot", lot_id))?;
                Ok(CommandResult::SpotsUpdated(count))
            }
            Command::CreateUser(req) => {
                if req.username.trim().is_empty() || req.email.trim().is_empty() {
                    return Err(CoreError::ValidationFailed {
                        message: "username and email are required".into(),
                    });
                }
                if req.password.expose_secret().is_empty() {
                    return Err(CoreError::ValidationFailed {
                        message: "password must not be empty".into(),
                    });
                }
                let raw = self
                    .client
                    .register(req.username.trim(), req.email.trim(), &req.password)
                    .await?;
                Ok(CommandResult::User(User::from(raw)))
            }
            Command::UpdateUser { id, update } => {
                if update.is_empty() {
                    return Err(CoreError::ValidationFailed {
                        message: "nothing to update".into(),
                    });
                }
                let body = UserUpdate {
                    username: update.username,
                    email: update.email,
                };
                let raw = self
                    .client
                    .update_user(id.get(), &body, update.password.as_ref())
                    .await
                    .map_err(|e| CoreError::from(e).for_entity("User", id))?;
                Ok(CommandResult::User(User::from(raw)))
            }
            Command::DeleteUser { id } => {
                self.client
                    .delete_user(id.get())
                    .await
                    .map_err(|e| CoreError::from(e).for_entity("User", id))?;
                Ok(CommandResult::Ok)
            }
        }
    }
}

// ── Request mapping ──────────────────────────────────────────────────

fn require_known(status: SpotStatus) -> Result<(), CoreError> {
    if status.is_known() {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed {
            message: "a spot can only be set to vacant, occupied or reserved".into(),
        })
    }
}

fn lot_create(req: CreateLotRequest) -> Result<LotCreate, CoreError> {
    let name = req.name.trim().to_owned();
    if name.is_empty() {
        return Err(CoreError::ValidationFailed {
            message: "lot name must not be empty".into(),
        });
    }
    Ok(LotCreate {
        name,
        address: req.address,
        total_spaces: i64::from(req.total_spaces),
        description: req.description,
        init_frame_path: req.init_frame_path,
        video_path: req.video_path,
        video_start_time: req.video_start_time,
    })
}

fn lot_update(req: UpdateLotRequest) -> Result<LotUpdate, CoreError> {
    if req.is_empty() {
        return Err(CoreError::ValidationFailed {
            message: "nothing to update".into(),
        });
    }
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(CoreError::ValidationFailed {
            message: "lot name must not be empty".into(),
        });
    }
    Ok(LotUpdate {
        name: req.name.map(|n| n.trim().to_owned()),
        address: req.address,
        total_spaces: req.total_spaces.map(i64::from),
        description: req.description,
        init_frame_path: req.init_frame_path,
        video_path: req.video_path,
        video_start_time: req.video_start_time,
    })
}
