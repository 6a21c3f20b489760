// ── Typed request structs for Command payloads ──
//
// Lot and spot payloads are deserializable so the CLI can read them straight
// from `--from-file` JSON. User payloads carry a password and are built in code.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::model::{SpotId, SpotStatus};

// ── Lots ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLotRequest {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub total_spaces: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_path: Option<String>,
    #[serde(default)]
    pub init_frame_path: Option<String>,
    #[serde(default)]
    pub video_start_time: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLotRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_spaces: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_frame_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_start_time: Option<f64>,
}

impl UpdateLotRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ── Spots ──────────────────────────────────────────────────────────

/// Outline of one spot in camera-frame pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotPolygon {
    pub points: Vec<[f64; 2]>,
}

/// One entry of a bulk status update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotStatusChange {
    pub spot_id: SpotId,
    pub status: SpotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

// ── Users ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}
