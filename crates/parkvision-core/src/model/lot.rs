// ── Lot and spot domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{LotId, SpotId};
use super::status::SpotStatus;

/// A parking facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub id: LotId,
    pub name: String,
    pub address: Option<String>,
    /// Capacity as configured by an administrator. Not necessarily the
    /// number of spots the backend has records for.
    pub total_spaces: u32,
    pub description: Option<String>,
    pub video_path: Option<String>,
    pub init_frame_path: Option<String>,
    pub video_start_time: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Axis-aligned bounding box of a spot in the camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotBounds {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// An individual parking space with its resolved status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: SpotId,
    pub lot_id: Option<LotId>,
    /// Operator-facing label (e.g. "A12"). Falls back to the id when the
    /// backend has none.
    pub label: String,
    pub status: SpotStatus,
    pub last_detected_at: Option<DateTime<Utc>>,
    pub bounds: Option<SpotBounds>,
    pub polygon: Option<Vec<[f64; 2]>>,
}
