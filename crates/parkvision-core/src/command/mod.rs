// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The dashboard
// validates each command, maps it onto the backend's request bodies and
// returns the affected entity as a `CommandResult`.

pub mod requests;

use chrono::{DateTime, Utc};

use crate::model::{Lot, LotId, Spot, SpotId, SpotStatus, User, UserId};

pub use requests::{
    CreateLotRequest, CreateUserRequest, SpotPolygon, SpotStatusChange, UpdateLotRequest,
    UpdateUserRequest,
};

/// All write operations against a ParkVision backend.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Lot operations ───────────────────────────────────────────────
    CreateLot(CreateLotRequest),
    UpdateLot {
        id: LotId,
        update: UpdateLotRequest,
    },
    DeleteLot {
        id: LotId,
    },
    /// Create a lot's spots from polygon outlines.
    InitLot {
        id: LotId,
        polygons: Vec<SpotPolygon>,
    },

    // ── Spot operations ──────────────────────────────────────────────
    SetSpotStatus {
        lot_id: LotId,
        spot_id: SpotId,
        status: SpotStatus,
        meta: Option<serde_json::Value>,
    },
    BulkUpdateSpots {
        lot_id: LotId,
        changes: Vec<SpotStatusChange>,
    },

    // ── User operations ──────────────────────────────────────────────
    CreateUser(CreateUserRequest),
    UpdateUser {
        id: UserId,
        update: UpdateUserRequest,
    },
    DeleteUser {
        id: UserId,
    },
}

/// What a successful command produced.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Ok,
    Lot(Lot),
    Spots(Vec<Spot>),
    SpotStatus {
        spot_id: SpotId,
        status: SpotStatus,
        detected_at: Option<DateTime<Utc>>,
    },
    /// Number of spot changes the backend accepted.
    SpotsUpdated(usize),
    User(User),
}
