// ── Spot status ──
//
// Classification of raw status strings and the manual status cycle.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Occupancy state of a single spot.
///
/// Only `vacant`, `occupied` and `reserved` are meaningful to the backend;
/// anything else it reports (including nothing) is [`Unknown`](Self::Unknown).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SpotStatus {
    Vacant,
    Occupied,
    Reserved,
    Unknown,
}

impl SpotStatus {
    /// The operator's manual cycle, in order.
    pub const CYCLE: [SpotStatus; 3] = [Self::Vacant, Self::Occupied, Self::Reserved];

    /// Classify a raw status value. Total: never fails.
    ///
    /// Matching is exact and case-sensitive; `None`, typos and other casing
    /// all become `Unknown`.
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            Some("vacant") => Self::Vacant,
            Some("occupied") => Self::Occupied,
            Some("reserved") => Self::Reserved,
            _ => Self::Unknown,
        }
    }

    /// Status after one manual tap: `vacant → occupied → reserved → vacant`.
    ///
    /// `Unknown` is not part of the cycle and restarts it at `Vacant`.
    pub fn next(self) -> Self {
        let position = Self::CYCLE.iter().position(|s| *s == self);
        match position {
            Some(i) => Self::CYCLE[(i + 1) % Self::CYCLE.len()],
            None => Self::CYCLE[0],
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Resolve a spot record's status from whichever field the backend filled.
///
/// Precedence: `current_status`, then `last_status`, then `status`. Empty
/// strings count as absent.
pub fn resolve_spot_status(
    current_status: Option<&str>,
    last_status: Option<&str>,
    status: Option<&str>,
) -> SpotStatus {
    let raw = [current_status, last_status, status]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty());
    SpotStatus::classify(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn classifies_recognised_values() {
        assert_eq!(SpotStatus::classify(Some("vacant")), SpotStatus::Vacant);
        assert_eq!(SpotStatus::classify(Some("occupied")), SpotStatus::Occupied);
        assert_eq!(SpotStatus::classify(Some("reserved")), SpotStatus::Reserved);
    }

    #[test]
    fn everything_else_is_unknown() {
        for raw in [None, Some(""), Some("garbage"), Some("Occupied"), Some(" vacant")] {
            assert_eq!(SpotStatus::classify(raw), SpotStatus::Unknown, "{raw:?}");
        }
    }

    #[test]
    fn cycle_order() {
        assert_eq!(SpotStatus::Vacant.next(), SpotStatus::Occupied);
        assert_eq!(SpotStatus::Occupied.next(), SpotStatus::Reserved);
        assert_eq!(SpotStatus::Reserved.next(), SpotStatus::Vacant);
    }

    #[test]
    fn unknown_restarts_cycle_and_is_never_produced() {
        assert_eq!(SpotStatus::Unknown.next(), SpotStatus::Vacant);
        for status in SpotStatus::CYCLE {
            assert!(status.next().is_known());
        }
    }

    #[test]
    fn string_forms_are_lowercase() {
        assert_eq!(SpotStatus::Reserved.to_string(), "reserved");
        assert_eq!("occupied".parse::<SpotStatus>().unwrap(), SpotStatus::Occupied);
        assert_eq!(
            serde_json::to_string(&SpotStatus::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn resolve_prefers_current_then_last_then_status() {
        assert_eq!(
            resolve_spot_status(Some("reserved"), Some("occupied"), Some("vacant")),
            SpotStatus::Reserved
        );
        assert_eq!(
            resolve_spot_status(None, Some("occupied"), Some("vacant")),
            SpotStatus::Occupied
        );
        assert_eq!(
            resolve_spot_status(Some(""), None, Some("vacant")),
            SpotStatus::Vacant
        );
        assert_eq!(resolve_spot_status(None, None, None), SpotStatus::Unknown);
    }
}
