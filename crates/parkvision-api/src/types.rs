// Wire types for the ParkVision backend.
//
// Field names mirror the JSON exactly. Timestamps stay as strings here: the
// backend emits naive ISO-8601 values without an offset, so parsing into
// `chrono` types happens in `parkvision-core` where the fallback policy lives.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Lots ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingLot {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub total_spaces: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub init_frame_path: Option<String>,
    #[serde(default)]
    pub video_path: Option<String>,
    #[serde(default)]
    pub video_start_time: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /lots/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub total_spaces: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_frame_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_start_time: Option<f64>,
}

/// Body of `PUT /lots/{id}`. Only set fields are sent, so the backend's
/// `exclude_unset` update leaves the rest untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LotUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_spaces: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_frame_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_start_time: Option<f64>,
}

impl LotUpdate {
    /// `true` when no field is set (the request would be a no-op).
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.total_spaces.is_none()
            && self.description.is_none()
            && self.init_frame_path.is_none()
            && self.video_path.is_none()
            && self.video_start_time.is_none()
    }
}

/// `GET /lots/{id}/status` -- spot key to raw status string.
///
/// Values are kept as raw JSON: the backend stores free-form strings and may
/// emit `null` for spots that were never observed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LotStatusResponse {
    #[serde(default)]
    pub lot_id: Option<i64>,
    #[serde(default)]
    pub summary: HashMap<String, Value>,
}

// ── Spots ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub id: i64,
    #[serde(default)]
    pub lot_id: Option<i64>,
    #[serde(default)]
    pub parking_lot_id: Option<i64>,
    #[serde(default)]
    pub spot_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_status: Option<String>,
    #[serde(default)]
    pub last_status: Option<String>,
    #[serde(default)]
    pub last_detected_at: Option<String>,
    #[serde(default)]
    pub last_meta: Option<Value>,
    #[serde(default)]
    pub x: Option<i64>,
    #[serde(default)]
    pub y: Option<i64>,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub polygon: Option<Value>,
    #[serde(default)]
    pub annotation_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `GET /lots/{id}/spots` -- normally `{lot_id, spots}`, but older backends
/// return the bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpotsResponse {
    Wrapped {
        #[serde(default)]
        lot_id: Option<i64>,
        spots: Vec<ParkingSpot>,
    },
    Bare(Vec<ParkingSpot>),
}

impl SpotsResponse {
    pub fn into_spots(self) -> Vec<ParkingSpot> {
        match self {
            Self::Wrapped { spots, .. } | Self::Bare(spots) => spots,
        }
    }
}

/// One polygon annotation used to initialise a lot's spots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotAnnotation {
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitLotRequest {
    pub annotations: Vec<SpotAnnotation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitLotResponse {
    #[serde(default)]
    pub parking_spots: Vec<ParkingSpot>,
}

/// Body of `POST /lots/{lot}/spots/{spot}/update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotStatusUpdate {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// One entry of a bulk update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSpotUpdate {
    pub spot_id: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateRequest {
    pub updates: Vec<BulkSpotUpdate>,
}

/// Response of a single spot update and of `GET .../spots/{spot}/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotStatusResponse {
    #[serde(default, alias = "parking_spot_id")]
    pub spot_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub detected_at: Option<String>,
    #[serde(default)]
    pub meta: Option<Value>,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

/// Body of `PUT /auth/users/{id}` (without the password, which is added
/// by [`ParkClient::update_user`](crate::ParkClient::update_user)).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}
