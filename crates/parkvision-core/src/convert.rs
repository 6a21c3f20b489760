// ── API-to-domain type conversions ──
//
// Bridges raw `parkvision_api` wire types into canonical `model` types.
// Each `From` impl normalizes alternate field names, parses timestamps and
// resolves a spot's status once so every consumer sees the same answer.

use chrono::{DateTime, NaiveDateTime, Utc};

use parkvision_api::types::{ParkingLot, ParkingSpot, UserRecord};

use crate::model::{
    Lot, LotId, Spot, SpotBounds, SpotId, User, UserId, resolve_spot_status,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a backend timestamp.
///
/// RFC 3339 first; the backend's usual naive ISO-8601 form (no offset) is
/// taken as UTC. Anything unparseable is dropped.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Clamp a signed count into `u32`; negatives become zero.
fn clamp_count(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

// ── Lot ────────────────────────────────────────────────────────────

impl From<ParkingLot> for Lot {
    fn from(raw: ParkingLot) -> Self {
        Self {
            id: LotId(raw.id),
            total_spaces: clamp_count(raw.total_spaces),
            created_at: parse_timestamp(raw.created_at.as_deref()),
            updated_at: parse_timestamp(raw.updated_at.as_deref()),
            name: raw.name,
            address: raw.address,
            description: raw.description,
            video_path: raw.video_path,
            init_frame_path: raw.init_frame_path,
            video_start_time: raw.video_start_time,
        }
    }
}

// ── Spot ───────────────────────────────────────────────────────────

impl From<ParkingSpot> for Spot {
    fn from(raw: ParkingSpot) -> Self {
        let status = resolve_spot_status(
            raw.current_status.as_deref(),
            raw.last_status.as_deref(),
            raw.status.as_deref(),
        );

        let bounds = match (raw.x, raw.y, raw.width, raw.height) {
            (Some(x), Some(y), Some(width), Some(height)) => Some(SpotBounds {
                x,
                y,
                width,
                height,
            }),
            _ => None,
        };

        let polygon = raw
            .polygon
            .and_then(|value| serde_json::from_value::<Vec<[f64; 2]>>(value).ok())
            .filter(|points| !points.is_empty());

        let label = raw
            .spot_number
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| raw.id.to_string());

        Self {
            id: SpotId(raw.id),
            lot_id: raw.lot_id.or(raw.parking_lot_id).map(LotId),
            label,
            status,
            last_detected_at: parse_timestamp(raw.last_detected_at.as_deref()),
            bounds,
            polygon,
        }
    }
}

// ── User ───────────────────────────────────────────────────────────

impl From<UserRecord> for User {
    fn from(raw: UserRecord) -> Self {
        Self {
            id: UserId(raw.id),
            created_at: parse_timestamp(raw.created_at.as_deref()),
            last_login: parse_timestamp(raw.last_login.as_deref()),
            username: raw.username,
            email: raw.email,
            is_admin: raw.is_admin,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::SpotStatus;

    fn raw_spot(value: serde_json::Value) -> ParkingSpot {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let dt = parse_timestamp(Some("2024-05-01T10:30:00.123456")).unwrap();
        assert_eq!((dt.year(), dt.hour(), dt.minute()), (2024, 10, 30));

        let spaced = parse_timestamp(Some("2024-05-01 10:30:00")).unwrap();
        assert_eq!(spaced.hour(), 10);

        let offset = parse_timestamp(Some("2024-05-01T10:30:00+02:00")).unwrap();
        assert_eq!(offset.hour(), 8);
    }

    #[test]
    fn garbage_timestamps_are_dropped() {
        assert_eq!(parse_timestamp(Some("yesterday")), None);
        assert_eq!(parse_timestamp(Some("")), None);
        assert_eq!(parse_timestamp(None), None);
    }

    #[test]
    fn spot_status_prefers_current_then_last() {
        let spot = Spot::from(raw_spot(json!({
            "id": 7,
            "current_status": "occupied",
            "last_status": "vacant",
        })));
        assert_eq!(spot.status, SpotStatus::Occupied);

        let spot = Spot::from(raw_spot(json!({"id": 7, "last_status": "reserved"})));
        assert_eq!(spot.status, SpotStatus::Reserved);

        let spot = Spot::from(raw_spot(json!({"id": 7})));
        assert_eq!(spot.status, SpotStatus::Unknown);
    }

    #[test]
    fn spot_geometry_and_label() {
        let spot = Spot::from(raw_spot(json!({
            "id": 3,
            "parking_lot_id": 12,
            "spot_number": "A3",
            "x": 10, "y": 20, "width": 30, "height": 40,
            "polygon": [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
        })));
        assert_eq!(spot.lot_id, Some(LotId(12)));
        assert_eq!(spot.label, "A3");
        assert_eq!(
            spot.bounds,
            Some(SpotBounds { x: 10, y: 20, width: 30, height: 40 })
        );
        assert_eq!(spot.polygon.unwrap().len(), 3);

        let bare = Spot::from(raw_spot(json!({"id": 4, "x": 1, "polygon": "junk"})));
        assert_eq!(bare.label, "4");
        assert_eq!(bare.bounds, None);
        assert_eq!(bare.polygon, None);
    }

    #[test]
    fn negative_capacity_clamps_to_zero() {
        let lot: ParkingLot =
            serde_json::from_value(json!({"id": 1, "name": "North", "total_spaces": -3})).unwrap();
        assert_eq!(Lot::from(lot).total_spaces, 0);
    }
}
